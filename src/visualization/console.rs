use super::{ChartPoint, DisplaySink};
use colored::Colorize;

/// Draws the newest point as a horizontal bar on stdout.
pub struct ConsoleSink {
    /// Output value mapped to a full-width bar.
    full_scale: f64,
    width: usize,
}

impl ConsoleSink {
    pub fn new(full_scale: f64, width: usize) -> Self {
        Self { full_scale, width }
    }

    pub fn format_point(&self, point: &ChartPoint, is_signal_present: bool) -> String {
        // centre the bar so negative excursions stay visible
        let half = self.width / 2;
        let scaled = (point.value / self.full_scale * half as f64).round();
        let len = (half as f64 + scaled).clamp(0.0, self.width as f64) as usize;

        let status = if is_signal_present {
            "SIGNAL".green()
        } else {
            "HOLD  ".yellow()
        };
        let bar = "|".repeat(len);
        let bar = if is_signal_present { bar.red() } else { bar.white() };

        format!("{:>8.2}s {} {:+.5} {}", point.time, status, point.value, bar)
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(0.05, 60)
    }
}

impl DisplaySink for ConsoleSink {
    fn on_data_changed(&mut self, series: &[ChartPoint], is_signal_present: bool) {
        if let Some(point) = series.last() {
            println!("{}", self.format_point(point, is_signal_present));
        }
    }
}
