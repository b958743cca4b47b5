use super::acquisition::FrameSource;
use super::pipeline::{PpgPipeline, TickOutcome};
use crate::visualization::chart_feed::ChartFeed;
use crate::visualization::DisplaySink;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Cancels a running scheduler. Cancelling suppresses the next tick; a tick
/// already in progress finishes normally.
#[derive(Clone, Debug, Default)]
pub struct SchedulerHandle {
    cancelled: Arc<AtomicBool>,
}

impl SchedulerHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub tick: Option<TickOutcome>,
    pub redrawn: bool,
}

/// Drives acquisition and chart redraw on independent cadences from a single
/// loop, so frame ticks never overlap and `frame_index` follows tick order.
pub struct Scheduler<S: FrameSource, D: DisplaySink> {
    pipeline: PpgPipeline,
    source: S,
    sink: D,
    chart: ChartFeed,
    tick_delay: Duration,
    redraw_interval: Duration,
    started_at: Instant,
    next_tick: Instant,
    next_redraw: Instant,
    handle: SchedulerHandle,
}

impl<S: FrameSource, D: DisplaySink> Scheduler<S, D> {
    pub fn new(pipeline: PpgPipeline, source: S, sink: D) -> Self {
        Self::starting_at(pipeline, source, sink, Instant::now())
    }

    pub fn starting_at(pipeline: PpgPipeline, source: S, sink: D, started_at: Instant) -> Self {
        let config = pipeline.config();
        let tick_delay = Duration::from_millis(config.acquisition.tick_delay_ms);
        let redraw_interval = Duration::from_millis(config.chart.redraw_interval_ms);

        let mut chart = ChartFeed::new(config.chart.max_points);
        if config.chart.seed_on_start {
            chart.seed(0.0, config.window.baseline, redraw_interval.as_secs_f64());
        }

        Self {
            pipeline,
            source,
            sink,
            chart,
            tick_delay,
            redraw_interval,
            started_at,
            next_tick: started_at,
            next_redraw: started_at + redraw_interval,
            handle: SchedulerHandle::default(),
        }
    }

    pub fn handle(&self) -> SchedulerHandle {
        self.handle.clone()
    }

    /// Runs whatever is due at `now`: first the acquisition tick, then the
    /// chart redraw.
    pub fn step(&mut self, now: Instant) -> StepReport {
        let mut report = StepReport::default();
        if self.handle.is_cancelled() {
            return report;
        }

        if now >= self.next_tick {
            report.tick = Some(self.pipeline.tick(&mut self.source, now));
            self.next_tick = now + self.tick_period();
        }

        if now >= self.next_redraw {
            let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
            report.redrawn = self.chart.on_timer(
                self.source.is_active(),
                self.pipeline.state(),
                elapsed,
                &mut self.sink,
            );
            self.next_redraw += self.redraw_interval;
            if self.next_redraw <= now {
                // fell behind; skip missed redraws rather than bursting
                self.next_redraw = now + self.redraw_interval;
            }
        }

        report
    }

    /// The configured delay, stretched to the source's frame interval.
    fn tick_period(&self) -> Duration {
        self.source
            .frame_interval()
            .map_or(self.tick_delay, |interval| interval.max(self.tick_delay))
    }

    fn next_deadline(&self) -> Instant {
        if self.source.is_active() {
            self.next_tick.min(self.next_redraw)
        } else {
            self.next_redraw
        }
    }

    /// Loops until cancelled or until the source is released.
    pub fn run(&mut self) {
        while !self.handle.is_cancelled() && !self.source.is_released() {
            self.step(Instant::now());
            let wait = self.next_deadline().saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }

        if let Err(e) = self.pipeline.flush() {
            eprintln!("Failed to flush sample recording: {}", e);
        }
    }

    pub fn pipeline(&self) -> &PpgPipeline {
        &self.pipeline
    }

    pub fn chart(&self) -> &ChartFeed {
        &self.chart
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }
}

impl<S, D> Scheduler<S, D>
where
    S: FrameSource + Send + 'static,
    D: DisplaySink + Send + 'static,
{
    /// Runs the loop on a background thread and hands the scheduler back when
    /// it stops.
    pub fn spawn(mut self) -> (SchedulerHandle, JoinHandle<Self>) {
        let handle = self.handle();
        let join = thread::spawn(move || {
            self.run();
            self
        });
        (handle, join)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::Result;
    use crate::processing::acquisition::Frame;
    use crate::visualization::ChartPoint;

    struct FlatSource {
        paused: bool,
        released_after: Option<usize>,
        served: usize,
    }

    impl FlatSource {
        fn new() -> Self {
            Self {
                paused: false,
                released_after: None,
                served: 0,
            }
        }
    }

    impl FrameSource for FlatSource {
        fn current_frame(&mut self) -> Result<Option<Frame>> {
            self.served += 1;
            Ok(Some(Frame::uniform(2, 2, [128, 0, 0, 255])))
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn is_released(&self) -> bool {
            self.released_after.map_or(false, |n| self.served >= n)
        }
    }

    #[derive(Default)]
    struct CountingSink {
        renders: usize,
        last_len: usize,
    }

    impl DisplaySink for CountingSink {
        fn on_data_changed(&mut self, series: &[ChartPoint], _is_signal_present: bool) {
            self.renders += 1;
            self.last_len = series.len();
        }
    }

    fn pipeline(warmup_ticks: usize, tick_delay_ms: u64) -> PpgPipeline {
        let mut config = Config::default();
        config.acquisition.warmup_ticks = warmup_ticks;
        config.acquisition.tick_delay_ms = tick_delay_ms;
        PpgPipeline::new(config).unwrap()
    }

    #[test]
    fn tick_and_redraw_follow_their_own_cadence() {
        let start = Instant::now();
        let mut scheduler =
            Scheduler::starting_at(pipeline(0, 10), FlatSource::new(), CountingSink::default(), start);

        let mut ticks = 0;
        let mut redraws = 0;
        for ms in 0..=1000u64 {
            let report = scheduler.step(start + Duration::from_millis(ms));
            ticks += report.tick.is_some() as usize;
            redraws += report.redrawn as usize;
        }

        assert_eq!(ticks, 101);
        assert_eq!(redraws, 10);
        assert_eq!(scheduler.pipeline().frame_index(), 101);
        assert_eq!(scheduler.sink().renders, 10);
        assert_eq!(scheduler.sink().last_len, 100);
    }

    #[test]
    fn paused_source_skips_redraw_and_index() {
        let start = Instant::now();
        let mut source = FlatSource::new();
        source.paused = true;
        let mut scheduler =
            Scheduler::starting_at(pipeline(0, 0), source, CountingSink::default(), start);

        for ms in 0..500u64 {
            let report = scheduler.step(start + Duration::from_millis(ms));
            assert!(!report.redrawn);
        }
        assert_eq!(scheduler.pipeline().frame_index(), 0);
        assert_eq!(scheduler.sink().renders, 0);
        assert_eq!(scheduler.chart().len(), 100);

        scheduler.source_mut().paused = false;
        let report = scheduler.step(start + Duration::from_millis(600));
        assert!(report.redrawn);
        assert_eq!(scheduler.pipeline().frame_index(), 1);
    }

    #[test]
    fn simulated_source_paces_ticks_at_default_delay() {
        use crate::sources::SimulatedFrameSource;

        let config = Config::default();
        assert_eq!(config.acquisition.tick_delay_ms, 0);
        let source = SimulatedFrameSource::new(config.simulation.clone());
        let start = Instant::now();
        let mut scheduler =
            Scheduler::starting_at(PpgPipeline::new(config).unwrap(), source, CountingSink::default(), start);

        // one step per millisecond for 3 s; 60 fps allows a tick every 17 ms
        for ms in 0..3000u64 {
            scheduler.step(start + Duration::from_millis(ms));
        }

        assert_eq!(scheduler.pipeline().frame_index(), 177);
        // ticks 0..=100 are warm-up and read no frame
        assert_eq!(scheduler.source().frame_count(), 76);
    }

    #[test]
    fn cancelled_scheduler_does_nothing() {
        let start = Instant::now();
        let mut scheduler =
            Scheduler::starting_at(pipeline(0, 0), FlatSource::new(), CountingSink::default(), start);
        scheduler.handle().cancel();

        let report = scheduler.step(start + Duration::from_secs(1));
        assert_eq!(report, StepReport::default());
        assert_eq!(scheduler.source().served, 0);
    }

    #[test]
    fn spawned_loop_stops_when_source_is_released() {
        let mut source = FlatSource::new();
        source.released_after = Some(400);
        let scheduler = Scheduler::new(pipeline(0, 0), source, CountingSink::default());

        let (_handle, join) = scheduler.spawn();
        let scheduler = join.join().unwrap();
        assert_eq!(scheduler.source().served, 400);
        // the first tick is the warm-up tick and reads no frame
        assert_eq!(scheduler.pipeline().frame_index(), 401);
    }

    #[test]
    fn spawned_loop_stops_on_cancel() {
        let scheduler = Scheduler::new(pipeline(0, 1), FlatSource::new(), CountingSink::default());
        let (handle, join) = scheduler.spawn();
        thread::sleep(Duration::from_millis(30));
        handle.cancel();
        let scheduler = join.join().unwrap();
        assert!(scheduler.pipeline().frame_index() > 0);
    }
}
