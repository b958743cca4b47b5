// src/config/mod.rs
use crate::error::{PpgError, Result};
use crate::processing::acquisition::ColorChannel;
use crate::visualization::VisualizationConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub acquisition: AcquisitionConfig,
    pub window: WindowConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
    pub visualization: VisualizationConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub channel: ColorChannel,
    /// Report `1 - intensity` so that pulses plot upwards.
    pub invert: bool,
    /// Delay between acquisition ticks; 0 runs as fast as the loop allows.
    pub tick_delay_ms: u64,
    /// Ticks skipped at start-up while the camera exposure settles.
    pub warmup_ticks: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            channel: ColorChannel::Red,
            invert: true,
            tick_delay_ms: 0,
            warmup_ticks: 100,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub capacity: usize,
    pub baseline: f64,
    pub alternation_divisor: usize,
    pub initial_held_value: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: 300, // 5 s at 60 samples/s
            baseline: 0.5,
            alternation_divisor: 100,
            initial_held_value: 0.008,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    pub max_points: usize,
    pub redraw_interval_ms: u64,
    pub seed_on_start: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            max_points: 100,
            redraw_interval_ms: 100,
            seed_on_start: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enable_debug_logging: bool,
    pub log_dir: PathBuf,
    pub log_file: String,
    /// Per-window summary rows, written alongside the debug log.
    pub windows_file: String,
    pub record_samples: bool,
    pub samples_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_debug_logging: false,
            log_dir: PathBuf::from("logs"),
            log_file: "ppg.log".to_string(),
            windows_file: "windows.csv".to_string(),
            record_samples: false,
            samples_file: "samples.csv".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn samples_path(&self) -> PathBuf {
        self.log_dir.join(&self.samples_file)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub heart_rate_bpm: f64,
    pub pulse_amplitude: f64,
    pub drift_per_sec: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 24,
            fps: 60.0,
            heart_rate_bpm: 72.0,
            pulse_amplitude: 0.02,
            drift_per_sec: 0.001,
            noise: 0.002,
            seed: 7,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.window.capacity == 0 {
            return Err(PpgError::ZeroCapacity);
        }
        if self.window.alternation_divisor == 0 {
            return Err(PpgError::InvalidConfig(
                "window.alternation_divisor must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.window.baseline) {
            return Err(PpgError::InvalidConfig(format!(
                "window.baseline must be within [0, 1], got {}",
                self.window.baseline
            )));
        }
        if self.chart.max_points == 0 {
            return Err(PpgError::InvalidConfig(
                "chart.max_points must be greater than zero".to_string(),
            ));
        }
        if self.chart.redraw_interval_ms == 0 {
            return Err(PpgError::InvalidConfig(
                "chart.redraw_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.simulation.fps <= 0.0 {
            return Err(PpgError::InvalidConfig(format!(
                "simulation.fps must be positive, got {}",
                self.simulation.fps
            )));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config_str = fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)?;
    Ok(())
}
