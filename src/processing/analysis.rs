use super::detrend::{detrend, fit_trend, window_mean};
use crate::error::Result;
use rayon::prelude::*;

/// Per-window DC level and AC amplitude of a recorded signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSummary {
    pub index: usize,
    /// Mean raw intensity (DC component).
    pub dc: f64,
    /// Peak-to-peak of the detrended window (AC component).
    pub ac: f64,
    pub slope: f64,
}

/// Offline pass over complete windows of a recording. Trailing samples that do
/// not fill a window are ignored.
pub fn analyze_recording(values: &[f64], window_size: usize) -> Result<Vec<WindowSummary>> {
    if window_size < 2 {
        return Err(crate::error::PpgError::InvalidWindowSize { len: window_size });
    }

    values
        .par_chunks_exact(window_size)
        .enumerate()
        .map(|(index, window)| -> Result<WindowSummary> {
            let trend = fit_trend(window)?;
            let detrended = detrend(window)?;
            let (min, max) = detrended
                .iter()
                .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            Ok(WindowSummary {
                index,
                dc: window_mean(window),
                ac: max - min,
                slope: trend.slope,
            })
        })
        .collect()
}
