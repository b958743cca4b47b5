use crate::error::{PpgError, Result};

/// Least-squares line `y = intercept + slope * x` over `x = 0..n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

pub fn fit_trend(window: &[f64]) -> Result<LinearTrend> {
    let n = window.len();
    if n < 2 {
        return Err(PpgError::InvalidWindowSize { len: n });
    }

    let (mut sx, mut sy, mut sxy, mut sxx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in window.iter().enumerate() {
        let x = i as f64;
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }

    let n = n as f64;
    // Non-zero for n >= 2 since x is strictly increasing.
    let xx = n * sxx - sx * sx;
    let xy = n * sxy - sx * sy;
    let slope = xy / xx;
    let intercept = sy / n - slope * sx / n;

    Ok(LinearTrend { slope, intercept })
}

/// Removes the least-squares linear trend, keeping only the fluctuation (AC)
/// around it.
pub fn detrend(window: &[f64]) -> Result<Vec<f64>> {
    let trend = fit_trend(window)?;
    Ok(window
        .iter()
        .enumerate()
        .map(|(i, &y)| y - trend.at(i as f64))
        .collect())
}

pub fn window_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
