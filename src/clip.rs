//! Audio clip handles

use crate::error::{DispatcherError, Result};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Immutable, cheaply cloneable handle to decoded audio.
///
/// Samples are interleaved `f32`. Two handles compare equal only when they
/// refer to the same clip (clones of one another), not when their samples
/// happen to match.
#[derive(Debug, Clone)]
pub struct AudioClip {
    id: Uuid,
    inner: Arc<ClipData>,
}

#[derive(Debug)]
struct ClipData {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    total_frames: usize,
}

impl AudioClip {
    /// Wrap an already-decoded interleaved buffer.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<Self> {
        if sample_rate == 0 {
            return Err(DispatcherError::InvalidClip(
                "Sample rate must be greater than zero".into(),
            ));
        }
        if channels == 0 {
            return Err(DispatcherError::InvalidClip(
                "Channel count must be greater than zero".into(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(DispatcherError::InvalidClip(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }

        let total_frames = samples.len() / channels as usize;
        Ok(Self {
            id: Uuid::new_v4(),
            inner: Arc::new(ClipData {
                samples,
                sample_rate,
                channels,
                total_frames,
            }),
        })
    }

    /// A mono clip of silence lasting `frames` frames
    pub fn silence(frames: usize, sample_rate: u32) -> Result<Self> {
        Self::from_samples(vec![0.0; frames], sample_rate, 1)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sample_rate(&self) -> u32 {
        self.inner.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.inner.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.inner.samples
    }

    pub fn total_frames(&self) -> usize {
        self.inner.total_frames
    }

    pub fn is_empty(&self) -> bool {
        self.inner.total_frames == 0
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.inner.total_frames as f64 / self.inner.sample_rate as f64)
    }

    /// Sample at `frame` for `channel`, mapping missing channels onto the last
    /// one the clip has (mono clips feed every output channel).
    #[inline]
    pub fn sample(&self, frame: usize, channel: usize) -> Option<f32> {
        if frame >= self.inner.total_frames {
            return None;
        }
        let channels = self.inner.channels as usize;
        let channel = channel.min(channels - 1);
        Some(self.inner.samples[frame * channels + channel])
    }
}

impl PartialEq for AudioClip {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AudioClip {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_buffers() {
        assert!(AudioClip::from_samples(vec![0.0; 4], 0, 1).is_err());
        assert!(AudioClip::from_samples(vec![0.0; 4], 48000, 0).is_err());
        assert!(matches!(
            AudioClip::from_samples(vec![0.0; 5], 48000, 2),
            Err(DispatcherError::InvalidClip(_))
        ));
    }

    #[test]
    fn test_frames_and_duration() {
        let clip = AudioClip::from_samples(vec![0.0; 96000], 48000, 2).unwrap();
        assert_eq!(clip.total_frames(), 48000);
        assert_eq!(clip.duration(), Duration::from_secs(1));
        assert!(!clip.is_empty());
    }

    #[test]
    fn test_identity_equality() {
        let a = AudioClip::silence(16, 48000).unwrap();
        let b = AudioClip::silence(16, 48000).unwrap();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_channel_mapping() {
        let stereo = AudioClip::from_samples(vec![0.1, 0.2, 0.3, 0.4], 48000, 2).unwrap();
        assert_eq!(stereo.sample(1, 0), Some(0.3));
        assert_eq!(stereo.sample(1, 1), Some(0.4));
        assert_eq!(stereo.sample(1, 5), Some(0.4));
        assert_eq!(stereo.sample(2, 0), None);

        let mono = AudioClip::from_samples(vec![0.5, 0.25], 48000, 1).unwrap();
        assert_eq!(mono.sample(0, 1), Some(0.5));
    }
}
