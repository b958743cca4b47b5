// src/visualization/chart_feed.rs

use super::{ChartPoint, DisplaySink};
use crate::processing::gate::SignalState;
use std::collections::VecDeque;

pub struct ChartFeed {
    max_points: usize,
    series: VecDeque<ChartPoint>,
    is_signal_present: bool,
}

impl ChartFeed {
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points,
            series: VecDeque::with_capacity(max_points + 1),
            is_signal_present: false,
        }
    }

    /// Fills the series with baseline points ending at `now`, spaced one
    /// redraw interval apart, so the first frame draws a full-width line.
    pub fn seed(&mut self, now: f64, baseline: f64, interval_secs: f64) {
        self.series.clear();
        for i in 0..self.max_points {
            self.series.push_back(ChartPoint {
                time: now - (self.max_points - i) as f64 * interval_secs,
                value: baseline,
                signal_present: self.is_signal_present,
            });
        }
    }

    pub fn append(&mut self, point: ChartPoint) {
        self.is_signal_present = point.signal_present;
        self.series.push_back(point);
        if self.series.len() > self.max_points {
            self.series.pop_front();
        }
    }

    pub fn render(&mut self, sink: &mut dyn DisplaySink) {
        let points = self.series.make_contiguous();
        sink.on_data_changed(points, self.is_signal_present);
    }

    /// Periodic redraw. Returns whether anything was appended; a stalled source
    /// appends nothing so no stale point is drawn.
    pub fn on_timer(
        &mut self,
        source_active: bool,
        state: SignalState,
        now: f64,
        sink: &mut dyn DisplaySink,
    ) -> bool {
        if !source_active {
            return false;
        }
        self.append(ChartPoint {
            time: now,
            value: state.current_value,
            signal_present: state.is_signal_present,
        });
        self.render(sink);
        true
    }

    pub fn points(&self) -> Vec<ChartPoint> {
        self.series.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn is_signal_present(&self) -> bool {
        self.is_signal_present
    }

    pub fn time_range(&self) -> Option<(f64, f64)> {
        let min_time = self.series.front().map(|p| p.time)?;
        let max_time = self.series.back().map(|p| p.time)?;
        Some((min_time, max_time))
    }

    pub fn clear(&mut self) {
        self.series.clear();
        self.is_signal_present = false;
    }
}
