use super::acquisition::{FrameSource, Sample, SampleAcquirer};
use super::gate::{GateState, SignalGate, SignalState};
use super::window::WindowBuffer;
use crate::config::Config;
use crate::error::Result;
use crate::utils::log::{log_csv, log_to_file};
use crate::utils::recorder::SampleRecorder;
use std::time::{Duration, Instant};

// -----------------------------------------------------------------------------
// PIPELINE CONTEXT
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Source paused or released; the frame index does not move.
    Paused,
    WarmingUp,
    /// No usable frame this tick; the previous value is held.
    Dropped,
    Processed(SignalState),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineStats {
    pub frames_processed: usize,
    pub windows_completed: usize,
    pub detrend_failures: usize,
    pub dropped_frames: usize,
    pub elapsed: Duration,
}

impl PipelineStats {
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames_processed as f64 / secs
        } else {
            0.0
        }
    }
}

pub struct PpgPipeline {
    config: Config,
    frame_index: usize,
    started_at: Instant,
    acquirer: SampleAcquirer,
    window: WindowBuffer,
    gate: SignalGate,
    stats: PipelineStats,
    recorder: Option<SampleRecorder>,
}

impl PpgPipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let window = WindowBuffer::new(config.window.capacity, config.window.baseline)?;
        let recorder = if config.logging.record_samples {
            Some(SampleRecorder::create(config.logging.samples_path())?)
        } else {
            None
        };

        Ok(Self {
            acquirer: SampleAcquirer::new(config.acquisition.channel, config.acquisition.invert),
            gate: Self::build_gate(&config),
            window,
            frame_index: 0,
            started_at: Instant::now(),
            stats: PipelineStats::default(),
            recorder,
            config,
        })
    }

    fn build_gate(config: &Config) -> SignalGate {
        SignalGate::new(
            config.window.capacity,
            config.window.baseline,
            config.window.alternation_divisor,
            config.window.initial_held_value,
        )
    }

    /// Back to the freshly constructed state. An open sample recording keeps
    /// appending.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.started_at = Instant::now();
        self.window.reset(self.config.window.baseline);
        self.gate = Self::build_gate(&self.config);
        self.stats = PipelineStats::default();
        self.debug_log("pipeline reset");
    }

    pub fn tick(&mut self, source: &mut dyn FrameSource, now: Instant) -> TickOutcome {
        if !source.is_active() {
            return TickOutcome::Paused;
        }

        if self.frame_index <= self.config.acquisition.warmup_ticks {
            self.frame_index += 1;
            return TickOutcome::WarmingUp;
        }

        let timestamp = now.saturating_duration_since(self.started_at).as_secs_f64();
        let sample = source
            .current_frame()
            .and_then(|frame| frame.map(|f| self.acquirer.acquire(&f, timestamp)).transpose());

        match sample {
            Ok(Some(sample)) => {
                self.stats.elapsed = now.saturating_duration_since(self.started_at);
                TickOutcome::Processed(self.push_sample(sample))
            }
            Ok(None) => {
                self.drop_frame("no frame available");
                TickOutcome::Dropped
            }
            Err(e) => {
                self.drop_frame(&e.to_string());
                TickOutcome::Dropped
            }
        }
    }

    /// A dropped frame records nothing, but a boundary at its index is still
    /// evaluated against the window as it stands.
    fn drop_frame(&mut self, reason: &str) {
        let index = self.frame_index;
        self.stats.dropped_frames += 1;
        self.debug_log(&format!("index: {}, frame dropped: {}", index, reason));

        if index % self.window.capacity() == 0 {
            self.complete_window(index);
            self.gate.current_output(index);
        }
        self.frame_index += 1;
    }

    /// Feeds one already-acquired sample through window, detrender and gate.
    pub fn push_sample(&mut self, sample: Sample) -> SignalState {
        let index = self.frame_index;
        self.window.record(sample.value, index);

        if index % self.window.capacity() == 0 {
            self.complete_window(index);
        }

        self.gate.current_output(index);
        self.stats.frames_processed += 1;

        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.record(&sample) {
                eprintln!("Failed to record sample: {}", e);
            }
        }

        self.frame_index += 1;
        self.gate.signal_state()
    }

    fn complete_window(&mut self, index: usize) {
        self.stats.windows_completed += 1;
        let window_number = index / self.window.capacity();
        let label = match self.gate.on_window_boundary(self.window.as_slice(), index) {
            Ok(state) => {
                let label = match state {
                    GateState::Active => "active",
                    GateState::Held => "held",
                };
                self.debug_log(&format!(
                    "index: {}, window: {}, state: {}, held_mean: {}",
                    index,
                    window_number,
                    label,
                    self.gate.held_mean()
                ));
                label
            }
            Err(e) => {
                self.stats.detrend_failures += 1;
                self.debug_log(&format!(
                    "index: {}, window skipped, holding {}: {}",
                    index,
                    self.gate.held_mean(),
                    e
                ));
                "skipped"
            }
        };
        self.log_window_row(index, window_number, label);
    }

    fn log_window_row(&self, index: usize, window_number: usize, label: &str) {
        if !self.config.logging.enable_debug_logging {
            return;
        }
        let logging = &self.config.logging;
        let row = [
            index.to_string(),
            window_number.to_string(),
            label.to_string(),
            self.gate.held_mean().to_string(),
        ];
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        if let Err(e) = log_csv(
            &logging.log_dir,
            &logging.windows_file,
            &["index", "window", "state", "held_mean"],
            &row,
        ) {
            eprintln!("Failed to write window summary: {}", e);
        }
    }

    fn debug_log(&self, message: &str) {
        if !self.config.logging.enable_debug_logging {
            return;
        }
        let logging = &self.config.logging;
        if let Err(e) = log_to_file(&logging.log_dir, &logging.log_file, message) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.flush()?;
        }
        Ok(())
    }

    pub fn state(&self) -> SignalState {
        self.gate.signal_state()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }

    pub fn gate(&self) -> &SignalGate {
        &self.gate
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }
}
