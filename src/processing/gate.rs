use super::detrend::{detrend, window_mean};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Detrended samples are passed through.
    Active,
    /// The mean of the last active window is held.
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalState {
    pub current_value: f64,
    pub is_signal_present: bool,
}

/// ACTIVE when `(frame_index / divisor)` is even. With the default divisor of
/// 100 and window capacity of 300 the boundaries alternate 0 ACTIVE, 300 HELD,
/// 600 ACTIVE, 900 HELD.
pub fn state_for_boundary(frame_index: usize, alternation_divisor: usize) -> GateState {
    if (frame_index / alternation_divisor) % 2 == 0 {
        GateState::Active
    } else {
        GateState::Held
    }
}

pub struct SignalGate {
    alternation_divisor: usize,
    gate_state: GateState,
    output: Vec<f64>,
    held_mean: f64,
    signal: SignalState,
}

impl SignalGate {
    pub fn new(
        capacity: usize,
        baseline: f64,
        alternation_divisor: usize,
        initial_held_value: f64,
    ) -> Self {
        Self {
            alternation_divisor,
            gate_state: GateState::Held,
            output: vec![baseline; capacity],
            held_mean: initial_held_value,
            signal: SignalState {
                current_value: initial_held_value,
                is_signal_present: false,
            },
        }
    }

    /// Recomputes the gate for a completed window. On a detrending failure the
    /// gate falls back to HELD with the previous held value and the error is
    /// returned for the caller to report.
    pub fn on_window_boundary(&mut self, window: &[f64], frame_index: usize) -> Result<GateState> {
        match state_for_boundary(frame_index, self.alternation_divisor) {
            GateState::Active => match detrend(window) {
                Ok(detrended) => {
                    self.held_mean = window_mean(&detrended);
                    self.output = detrended;
                    self.gate_state = GateState::Active;
                }
                Err(e) => {
                    self.hold();
                    return Err(e);
                }
            },
            GateState::Held => self.hold(),
        }
        Ok(self.gate_state)
    }

    fn hold(&mut self) {
        self.output.fill(self.held_mean);
        self.gate_state = GateState::Held;
    }

    pub fn current_output(&mut self, frame_index: usize) -> f64 {
        let value = self.output[frame_index % self.output.len()];
        self.signal = SignalState {
            current_value: value,
            is_signal_present: self.gate_state == GateState::Active,
        };
        value
    }

    pub fn state(&self) -> GateState {
        self.gate_state
    }

    pub fn signal_state(&self) -> SignalState {
        self.signal
    }

    pub fn held_mean(&self) -> f64 {
        self.held_mean
    }

    /// Output window for the current cycle: detrended samples when ACTIVE,
    /// the held mean repeated when HELD.
    pub fn output_window(&self) -> &[f64] {
        &self.output
    }
}
