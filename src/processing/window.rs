use crate::error::{PpgError, Result};

// WINDOW BUFFER COMPONENT -----------------------------------------------------
#[derive(Clone, Debug)]
pub struct WindowBuffer {
    buffer: Vec<f64>,
    capacity: usize,
}

impl WindowBuffer {
    pub fn new(capacity: usize, baseline: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(PpgError::ZeroCapacity);
        }
        Ok(Self {
            buffer: vec![baseline; capacity],
            capacity,
        })
    }

    /// Overwrites the slot owned by `frame_index`.
    pub fn record(&mut self, value: f64, frame_index: usize) {
        self.buffer[frame_index % self.capacity] = value;
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.buffer.get(slot).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.buffer
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn reset(&mut self, baseline: f64) {
        self.buffer.fill(baseline);
    }
}
