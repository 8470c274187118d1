//! Configuration for sonic-dispatch

use crate::error::{DispatcherError, Result};
use rand::Rng;

/// Inclusive `[low, high]` interval a random effect pitch is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRange {
    low: f32,
    high: f32,
}

impl PitchRange {
    pub const DEFAULT_LOW: f32 = 0.95;
    pub const DEFAULT_HIGH: f32 = 1.05;

    /// Both bounds must be finite, `low` must be positive, and `low <= high`.
    /// A degenerate range (`low == high`) is allowed and always yields that
    /// pitch.
    pub fn new(low: f32, high: f32) -> Result<Self> {
        if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
            return Err(DispatcherError::InvalidPitchRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }

    pub fn contains(&self, pitch: f32) -> bool {
        pitch >= self.low && pitch <= self.high
    }

    /// Draw a pitch uniformly from the inclusive range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(self.low..=self.high)
    }
}

impl Default for PitchRange {
    fn default() -> Self {
        Self {
            low: Self::DEFAULT_LOW,
            high: Self::DEFAULT_HIGH,
        }
    }
}

/// What re-enabling music does to the music channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicResume {
    /// Continue from wherever the channel was stopped
    #[default]
    Resume,
    /// Re-assign the last music clip so playback starts over
    Restart,
}

/// Configuration descriptor for an [`AudioDispatcher`](crate::AudioDispatcher)
#[derive(Debug, Clone, Default)]
pub struct DispatcherDesc {
    /// Range used by `play_random_effect` when the call does not override it
    pub pitch_range: PitchRange,
    /// Behavior of `toggle_music` when turning music back on
    pub music_resume: MusicResume,
    /// Fixed seed for effect randomization (None = seed from entropy)
    pub rng_seed: Option<u64>,
}

impl DispatcherDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pitch_range(mut self, range: PitchRange) -> Self {
        self.pitch_range = range;
        self
    }

    pub fn music_resume(mut self, resume: MusicResume) -> Self {
        self.music_resume = resume;
        self
    }

    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Configuration descriptor for the device-backed engine and its renderer
#[derive(Debug, Clone)]
pub struct EngineDesc {
    /// Output sample rate requested from the device
    pub sample_rate: u32,
    /// Frames per device callback
    pub block_size: usize,
    /// Number of interleaved output channels (typically 2 for stereo)
    pub channels: u16,
}

impl Default for EngineDesc {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 1024,
            channels: 2,
        }
    }
}

impl EngineDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    pub fn block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }

    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }
}
