//! Output channels the dispatcher forwards playback commands to
//!
//! The dispatcher owns one channel for music and one for effects and only ever
//! talks to them through [`OutputChannel`]. Two implementations ship with the
//! crate:
//!
//! - [`VirtualChannel`]: headless, tracks playback state and advances in
//!   simulated time
//! - [`StreamChannel`]: queues commands for a [`ChannelRenderer`](crate::ChannelRenderer)
//!   running on the audio thread

mod stream;
mod virtual_channel;

pub use stream::StreamChannel;
pub use virtual_channel::{ChannelSnapshot, OneShotSnapshot, VirtualChannel};

use crate::clip::AudioClip;
use crate::error::Result;

/// One audio playback pathway.
///
/// A channel holds at most one assigned clip for continuous playback and any
/// number of overlapping one-shots. Errors returned here are passed through the
/// dispatcher untouched.
pub trait OutputChannel: Send {
    /// Volume applied to the assigned clip and to one-shots triggered afterwards
    fn set_volume(&mut self, volume: f32) -> Result<()>;

    /// Playback-rate multiplier applied to the assigned clip and to one-shots
    /// triggered afterwards
    fn set_pitch(&mut self, pitch: f32) -> Result<()>;

    /// Fire-and-forget playback of `clip` on top of whatever is already
    /// sounding. `duration_hint` is channel-defined; channels in this crate
    /// use it as a volume scale for that one-shot.
    fn play_one_shot(&mut self, clip: &AudioClip, duration_hint: f32) -> Result<()>;

    /// Assign the clip for continuous playback and rewind to its start
    /// without starting it
    fn set_clip(&mut self, clip: &AudioClip) -> Result<()>;

    /// Start or continue the assigned clip from the current position
    fn play(&mut self) -> Result<()>;

    /// Halt the assigned clip, keeping its position. One-shots keep playing.
    fn stop(&mut self) -> Result<()>;
}
