//! Playback state and voices
//!
//! - [`LoopMode`]: what a voice does when it runs off the end of its clip
//! - [`PlayState`]: current playback state (playing, paused, stopped)
//! - [`Voice`]: one clip being rendered at a given volume and pitch
//! - [`ChannelCommand`]: commands sent from a [`StreamChannel`](crate::StreamChannel)
//!   to the renderer on the audio thread

use crate::clip::AudioClip;

/// Loop behavior for a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once and stop
    Once,
    /// Wrap back to the first frame at the end of each iteration
    Infinite,
}

impl Default for LoopMode {
    fn default() -> Self {
        Self::Once
    }
}

/// Playback state of a channel or voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// Audio is currently playing
    Playing,
    /// Halted with the cursor retained; `play` continues from there
    Paused,
    /// Not started, or ran to the end of a non-looping clip
    Stopped,
}

/// Commands that can be sent to the renderer for one output channel
#[derive(Debug, Clone)]
pub enum ChannelCommand {
    SetVolume(f32),
    SetPitch(f32),
    PlayOneShot { clip: AudioClip, volume_scale: f32 },
    SetClip(AudioClip),
    Play,
    Stop,
}

/// One clip being rendered.
///
/// The cursor is a fractional frame index into the clip so pitch can be
/// applied by stepping through it faster or slower than real time.
#[derive(Debug, Clone)]
pub struct Voice {
    pub clip: AudioClip,
    pub cursor: f64,
    pub volume: f32,
    pub pitch: f32,
    pub loop_mode: LoopMode,
    pub state: PlayState,
}

impl Voice {
    pub fn new(clip: AudioClip, loop_mode: LoopMode) -> Self {
        Self {
            clip,
            cursor: 0.0,
            volume: 1.0,
            pitch: 1.0,
            loop_mode,
            state: PlayState::Stopped,
        }
    }

    /// A one-shot that starts playing immediately with fixed gain and pitch
    pub fn one_shot(clip: AudioClip, volume: f32, pitch: f32) -> Self {
        Self {
            volume,
            pitch,
            state: PlayState::Playing,
            ..Self::new(clip, LoopMode::Once)
        }
    }

    pub fn play(&mut self) {
        self.state = PlayState::Playing;
    }

    /// Halt and keep the cursor where it is
    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    /// Stop and rewind to the first frame
    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.cursor = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Advance the cursor by `frames` clip frames, applying the loop mode.
    /// Returns false once the voice has run off the end. A step that is not
    /// finite and positive can never reach the end, so it ends the voice.
    pub fn advance(&mut self, frames: f64) -> bool {
        if !self.is_playing() {
            return true;
        }
        let total = self.clip.total_frames() as f64;
        if total == 0.0 || !(frames.is_finite() && frames > 0.0) {
            self.stop();
            return false;
        }

        self.cursor += frames;
        if self.cursor >= total {
            match self.loop_mode {
                LoopMode::Once => {
                    self.stop();
                    return false;
                }
                LoopMode::Infinite => self.cursor %= total,
            }
        }
        true
    }

    /// Mix this voice into an interleaved buffer at `volume * gain`.
    /// Returns the number of frames actually filled.
    pub fn fill_buffer(
        &mut self,
        buffer: &mut [f32],
        output_rate: u32,
        channels: u16,
        gain: f32,
    ) -> usize {
        if !self.is_playing() || channels == 0 {
            return 0;
        }

        let channels_usize = channels as usize;
        let step = self.pitch as f64 * self.clip.sample_rate() as f64 / output_rate as f64;
        let amp = self.volume * gain;
        let mut frames_filled = 0;

        for frame in buffer.chunks_exact_mut(channels_usize) {
            let index = self.cursor.floor() as usize;
            let frac = (self.cursor - index as f64) as f32;
            let next = self.next_index(index);

            for (channel, out) in frame.iter_mut().enumerate() {
                let Some(current) = self.clip.sample(index, channel) else {
                    break;
                };
                let upcoming = next
                    .and_then(|n| self.clip.sample(n, channel))
                    .unwrap_or(current);
                *out += (current + (upcoming - current) * frac) * amp;
            }

            frames_filled += 1;
            if !self.advance(step) {
                break;
            }
        }

        frames_filled
    }

    fn next_index(&self, index: usize) -> Option<usize> {
        let total = self.clip.total_frames();
        if index + 1 < total {
            Some(index + 1)
        } else if self.loop_mode == LoopMode::Infinite && total > 0 {
            Some(0)
        } else {
            None
        }
    }
}
