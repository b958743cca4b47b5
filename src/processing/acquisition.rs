use crate::error::{PpgError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the pipeline started.
    pub timestamp: f64,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

impl ColorChannel {
    fn offset(self) -> usize {
        match self {
            ColorChannel::Red => 0,
            ColorChannel::Green => 1,
            ColorChannel::Blue => 2,
        }
    }
}

/// One RGBA frame as handed over by the frame source.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Frame where every pixel has the same colour.
    pub fn uniform(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize).saturating_mul(height as usize);
        let data = rgba.iter().copied().cycle().take(pixels.saturating_mul(4)).collect();
        Self::new(width, height, data)
    }

    /// `None` when the dimensions do not fit in `usize`.
    pub fn pixel_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    fn validate(&self) -> Result<()> {
        let expected = match self.pixel_count() {
            Some(0) => return Err(PpgError::EmptyFrame),
            Some(pixels) => pixels.checked_mul(4),
            None => None,
        };
        let expected = expected.ok_or(PpgError::FrameSizeMismatch {
            expected: usize::MAX,
            actual: self.data.len(),
        })?;
        if self.data.len() != expected {
            return Err(PpgError::FrameSizeMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// External collaborator providing camera frames. Permissions and device
/// selection stay on the other side of this trait.
pub trait FrameSource {
    fn current_frame(&mut self) -> Result<Option<Frame>>;

    fn is_paused(&self) -> bool;

    /// A released source never produces frames again.
    fn is_released(&self) -> bool {
        false
    }

    fn is_active(&self) -> bool {
        !self.is_paused() && !self.is_released()
    }

    /// Shortest time between two new frames. Sources that produce a frame on
    /// every request return `None`.
    fn frame_interval(&self) -> Option<Duration> {
        None
    }
}

pub struct SampleAcquirer {
    channel: ColorChannel,
    invert: bool,
}

impl SampleAcquirer {
    pub fn new(channel: ColorChannel, invert: bool) -> Self {
        Self { channel, invert }
    }

    /// Mean intensity of the configured channel, normalised to [0, 1].
    pub fn acquire(&self, frame: &Frame, timestamp: f64) -> Result<Sample> {
        frame.validate()?;

        let offset = self.channel.offset();
        let sum: u64 = frame
            .data
            .chunks_exact(4)
            .map(|pixel| pixel[offset] as u64)
            .sum();
        let pixels = frame.data.len() / 4;
        let mean = sum as f64 / (pixels as f64 * 255.0);

        let value = if self.invert { 1.0 - mean } else { mean };
        Ok(Sample { timestamp, value })
    }
}
