use approx::assert_abs_diff_eq;
use std::time::{Duration, Instant};

use webcam_ppg::config::Config;
use webcam_ppg::error::{PpgError, Result};
use webcam_ppg::processing::gate::state_for_boundary;
use webcam_ppg::sources::SimulatedFrameSource;
use webcam_ppg::{
    detrend, ChartFeed, ChartPoint, DisplaySink, Frame, FrameSource, GateState, PpgPipeline, Sample,
    Scheduler, TickOutcome, WindowBuffer,
};

/// Every frame has red at 127.5/255 on average, i.e. a sample of 0.5.
struct ConstantSource;

impl FrameSource for ConstantSource {
    fn current_frame(&mut self) -> Result<Option<Frame>> {
        Ok(Some(Frame::new(2, 1, vec![127, 0, 0, 255, 128, 0, 0, 255])))
    }

    fn is_paused(&self) -> bool {
        false
    }
}

#[derive(Default)]
struct LastSnapshot {
    points: Vec<ChartPoint>,
    is_signal_present: bool,
}

impl DisplaySink for LastSnapshot {
    fn on_data_changed(&mut self, series: &[ChartPoint], is_signal_present: bool) {
        self.points = series.to_vec();
        self.is_signal_present = is_signal_present;
    }
}

#[test]
fn linear_sequences_detrend_to_zero() {
    for n in 2..64 {
        let window: Vec<f64> = (0..n).map(|i| 0.25 - 0.003 * i as f64).collect();
        let detrended = detrend(&window).unwrap();
        assert_eq!(detrended.len(), n);
        assert!(detrended.iter().all(|v| v.abs() < 1e-9));
    }
}

#[test]
fn degenerate_windows_fail_instead_of_nan() {
    for window in [vec![], vec![0.5]] {
        match detrend(&window) {
            Err(PpgError::InvalidWindowSize { len }) => assert_eq!(len, window.len()),
            other => panic!("expected InvalidWindowSize, got {:?}", other),
        }
    }
}

#[test]
fn window_buffer_wraps_to_slot_zero() {
    let mut window = WindowBuffer::new(300, 0.5).unwrap();
    for i in 0..300 {
        window.record(i as f64, i);
    }
    let expected: Vec<f64> = (0..300).map(|i| i as f64).collect();
    assert_eq!(window.as_slice(), expected.as_slice());

    window.record(-1.0, 300);
    assert_eq!(window.get(0), Some(-1.0));
}

#[test]
fn chart_feed_keeps_last_hundred() {
    let mut feed = ChartFeed::new(100);
    for i in 0..150 {
        feed.append(ChartPoint {
            time: i as f64,
            value: i as f64 * 0.01,
            signal_present: false,
        });
    }
    let times: Vec<f64> = feed.points().iter().map(|p| p.time).collect();
    let expected: Vec<f64> = (50..150).map(|i| i as f64).collect();
    assert_eq!(times, expected);
}

#[test]
fn gate_alternates_on_window_boundaries() {
    let pattern: Vec<GateState> = [0, 300, 600, 900, 1200]
        .iter()
        .map(|&i| state_for_boundary(i, 100))
        .collect();
    assert_eq!(
        pattern,
        vec![
            GateState::Active,
            GateState::Held,
            GateState::Active,
            GateState::Held,
            GateState::Active
        ]
    );

    let mut pipeline = PpgPipeline::new(Config::default()).unwrap();
    let mut seen = Vec::new();
    for i in 0..=900 {
        let state = pipeline.push_sample(Sample {
            timestamp: i as f64 / 60.0,
            value: 0.5 + 0.01 * ((i % 7) as f64),
        });
        if i % 300 == 0 {
            seen.push((i, state.is_signal_present));
        }
    }
    assert_eq!(seen, vec![(0, true), (300, false), (600, true), (900, false)]);
}

#[test]
fn constant_source_detrends_to_zero_end_to_end() {
    let mut pipeline = PpgPipeline::new(Config::default()).unwrap();
    let mut source = ConstantSource;
    let start = Instant::now();

    for tick in 0..=600u64 {
        pipeline.tick(&mut source, start + Duration::from_millis(tick * 16));
    }

    // index 600 is the first ACTIVE boundary after warm-up
    assert_eq!(pipeline.gate().state(), GateState::Active);
    for value in pipeline.gate().output_window() {
        assert_abs_diff_eq!(*value, 0.0, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(pipeline.gate().held_mean(), 0.0, epsilon = 1e-9);
    assert!(pipeline.state().is_signal_present);

    for tick in 601..=900u64 {
        pipeline.tick(&mut source, start + Duration::from_millis(tick * 16));
    }
    assert_eq!(pipeline.gate().state(), GateState::Held);
    assert_abs_diff_eq!(pipeline.state().current_value, 0.0, epsilon = 1e-9);
    assert!(!pipeline.state().is_signal_present);
}

#[test]
fn first_boundary_after_warmup_holds_dummy_value() {
    let mut pipeline = PpgPipeline::new(Config::default()).unwrap();
    let mut source = ConstantSource;
    let now = Instant::now();

    let mut last = None;
    for _ in 0..=300 {
        last = Some(pipeline.tick(&mut source, now));
    }
    match last {
        Some(TickOutcome::Processed(state)) => {
            assert_eq!(state.current_value, 0.008);
            assert!(!state.is_signal_present);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn simulated_session_drives_chart() {
    // default tick delay of 0 ms; the source's 60 fps sets the pace
    let config = Config::default();
    let source = SimulatedFrameSource::new(config.simulation.clone());
    let pipeline = PpgPipeline::new(config).unwrap();
    let start = Instant::now();
    let mut scheduler = Scheduler::starting_at(pipeline, source, LastSnapshot::default(), start);

    // 12 simulated seconds at 1 ms resolution
    for ms in 0..12_000u64 {
        scheduler.step(start + Duration::from_millis(ms));
    }

    let stats = scheduler.pipeline().stats();
    assert_eq!(scheduler.pipeline().frame_index(), 706);
    assert!(stats.windows_completed >= 2);
    assert_eq!(stats.dropped_frames, 0);
    assert_eq!(scheduler.sink().points.len(), 100);

    // the active window at index 600 carries a pulsatile detrended signal
    let active: Vec<f64> = scheduler
        .sink()
        .points
        .iter()
        .filter(|p| p.signal_present)
        .map(|p| p.value)
        .collect();
    assert!(!active.is_empty());
    let spread = active.iter().cloned().fold(f64::MIN, f64::max)
        - active.iter().cloned().fold(f64::MAX, f64::min);
    assert!(spread > 0.01, "spread {}", spread);
}
