use crate::config::SimulationConfig;
use crate::error::Result;
use crate::processing::acquisition::{Frame, FrameSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;
use std::time::Duration;

// -----------------------------------------------------------------------------
// SETUP FOR THE SIMULATED FINGERTIP SIGNAL
// -----------------------------------------------------------------------------

const BASELINE_RED: f64 = 0.55;
const DICROTIC_RATIO: f64 = 0.35;

/// Synthetic fingertip-over-camera frames: a pulsatile red level with slow
/// drift and per-pixel noise. Time advances one frame period per frame, so
/// runs are reproducible for a given seed.
pub struct SimulatedFrameSource {
    config: SimulationConfig,
    rng: StdRng,
    frame_count: u64,
    paused: bool,
    released: bool,
    frame_limit: Option<u64>,
}

impl SimulatedFrameSource {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            frame_count: 0,
            paused: false,
            released: false,
            frame_limit: None,
        }
    }

    /// Releases the source after `frames` frames have been produced.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn release(&mut self) {
        self.released = true;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Red level in [0, 1] at simulated time `t`, before noise.
    pub fn red_level(&self, t: f64) -> f64 {
        let phase = 2.0 * PI * self.config.heart_rate_bpm / 60.0 * t;
        // systolic peak plus a smaller dicrotic wave; more blood means less red
        let pulse = phase.sin() + DICROTIC_RATIO * (2.0 * phase).sin();
        BASELINE_RED + self.config.drift_per_sec * t - self.config.pulse_amplitude * pulse
    }
}

impl FrameSource for SimulatedFrameSource {
    fn current_frame(&mut self) -> Result<Option<Frame>> {
        if self.released {
            return Ok(None);
        }

        let t = self.frame_count as f64 / self.config.fps;
        let level = self.red_level(t);
        let pixels = self.config.width as usize * self.config.height as usize;

        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            let noise = if self.config.noise > 0.0 {
                self.rng.gen_range(-self.config.noise..self.config.noise)
            } else {
                0.0
            };
            let red = ((level + noise).clamp(0.0, 1.0) * 255.0).round() as u8;
            let green = self.rng.gen_range(10..30);
            data.extend_from_slice(&[red, green, 8, 255]);
        }

        self.frame_count += 1;
        if self.frame_limit.map_or(false, |limit| self.frame_count >= limit) {
            self.released = true;
        }

        Ok(Some(Frame::new(self.config.width, self.config.height, data)))
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_released(&self) -> bool {
        self.released
    }

    /// Simulated time advances one frame period per frame, so frames must not
    /// be pulled faster than the configured rate.
    fn frame_interval(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(1.0 / self.config.fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::acquisition::{ColorChannel, SampleAcquirer};

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            width: 8,
            height: 6,
            noise: 0.0,
            drift_per_sec: 0.0,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn frames_have_requested_shape() {
        let mut source = SimulatedFrameSource::new(quiet_config());
        let frame = source.current_frame().unwrap().unwrap();
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 6);
        assert_eq!(frame.data.len(), 8 * 6 * 4);
        assert_eq!(source.frame_count(), 1);
    }

    #[test]
    fn red_channel_pulses_at_heart_rate() {
        let config = quiet_config();
        let fps = config.fps;
        let mut source = SimulatedFrameSource::new(config);
        let acquirer = SampleAcquirer::new(ColorChannel::Red, true);

        // 72 bpm = 1.2 Hz; one beat is 50 frames at 60 fps
        let values: Vec<f64> = (0..100)
            .map(|i| {
                let frame = source.current_frame().unwrap().unwrap();
                acquirer.acquire(&frame, i as f64 / fps).unwrap().value
            })
            .collect();

        let spread = values.iter().cloned().fold(f64::MIN, f64::max)
            - values.iter().cloned().fold(f64::MAX, f64::min);
        assert!(spread > 0.02, "spread {}", spread);
        assert!((values[0] - values[50]).abs() < 0.005);
    }

    #[test]
    fn same_seed_same_frames() {
        let config = SimulationConfig::default();
        let mut a = SimulatedFrameSource::new(config.clone());
        let mut b = SimulatedFrameSource::new(config);
        for _ in 0..5 {
            assert_eq!(a.current_frame().unwrap(), b.current_frame().unwrap());
        }
    }

    #[test]
    fn frame_limit_releases_source() {
        let mut source = SimulatedFrameSource::new(quiet_config()).with_frame_limit(2);
        assert!(source.current_frame().unwrap().is_some());
        assert!(!source.is_released());
        assert!(source.current_frame().unwrap().is_some());
        assert!(source.is_released());
        assert!(source.current_frame().unwrap().is_none());
        assert!(!source.is_active());
    }

    #[test]
    fn reports_frame_period() {
        let source = SimulatedFrameSource::new(quiet_config());
        let interval = source.frame_interval().unwrap();
        assert!((interval.as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn pause_and_resume() {
        let mut source = SimulatedFrameSource::new(quiet_config());
        source.pause();
        assert!(!source.is_active());
        source.resume();
        assert!(source.is_active());
    }
}
