// src/visualization/mod.rs

pub mod chart_feed;
pub mod console;
#[cfg(feature = "visualization")]
pub mod window;

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct VisualizationConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub plot_height: u32,
    pub show_signal_flag: bool,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            window_width: 1000,
            window_height: 500,
            plot_height: 360,
            show_signal_flag: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    /// Seconds since the chart started.
    pub time: f64,
    pub value: f64,
    pub signal_present: bool,
}

/// Receives "data changed" notifications; all drawing happens on this side.
pub trait DisplaySink {
    fn on_data_changed(&mut self, series: &[ChartPoint], is_signal_present: bool);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSnapshot {
    pub points: Vec<ChartPoint>,
    pub is_signal_present: bool,
    pub revision: u64,
}

pub type SharedChart = Arc<Mutex<ChartSnapshot>>;

pub fn create_shared_chart() -> SharedChart {
    Arc::new(Mutex::new(ChartSnapshot::default()))
}

/// Sink that publishes snapshots for a UI running on another thread.
pub struct SharedChartSink {
    chart: SharedChart,
}

impl SharedChartSink {
    pub fn new(chart: SharedChart) -> Self {
        Self { chart }
    }
}

impl DisplaySink for SharedChartSink {
    fn on_data_changed(&mut self, series: &[ChartPoint], is_signal_present: bool) {
        if let Ok(mut snapshot) = self.chart.lock() {
            snapshot.points.clear();
            snapshot.points.extend_from_slice(series);
            snapshot.is_signal_present = is_signal_present;
            snapshot.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_sink_replaces_snapshot() {
        let chart = create_shared_chart();
        let mut sink = SharedChartSink::new(chart.clone());
        let point = ChartPoint {
            time: 0.1,
            value: 0.02,
            signal_present: true,
        };

        sink.on_data_changed(&[point, point], true);
        sink.on_data_changed(&[point], false);

        let snapshot = chart.lock().unwrap();
        assert_eq!(snapshot.points, vec![point]);
        assert!(!snapshot.is_signal_present);
        assert_eq!(snapshot.revision, 2);
    }
}
