//! # sonic-dispatch
//!
//! Music and sound-effect dispatch for games: two output channels, an on/off
//! gate for each, and randomized pitch variance for effects.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sonic_dispatch::*;
//!
//! // Renderer for the audio thread plus the two channel handles feeding it
//! let (renderer, music, effect) = ChannelRenderer::new(LoopMode::Infinite);
//!
//! // Install the process-wide dispatcher
//! global::initialize(AudioDispatcher::new(music, effect, DispatcherDesc::default()));
//!
//! // Clips wrap buffers decoded elsewhere
//! let theme = AudioClip::from_samples(vec![0.0; 48000], 48000, 1)?;
//! let steps = vec![
//!     AudioClip::from_samples(vec![0.0; 4800], 48000, 1)?,
//!     AudioClip::from_samples(vec![0.0; 4800], 48000, 1)?,
//! ];
//!
//! let mut audio = global::instance()?;
//! audio.play_music(&theme)?;
//! audio.play_random_effect(&steps, RandomEffectParams::default())?;
//! let music_on = audio.toggle_music()?;
//! # drop(renderer);
//! # Ok::<(), DispatcherError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`AudioDispatcher`]**: gated music/effect playback and random effects
//! - **[`global`]**: first-wins process-wide dispatcher
//! - **[`OutputChannel`]**: the capability the dispatcher drives
//! - **[`VirtualChannel`]**: headless channel that tracks playback state
//! - **[`StreamChannel`]** / **[`ChannelRenderer`]**: command queue into an
//!   audio-thread mixer
//! - **`DispatchEngine`** (`device` feature): plays a renderer on the default
//!   output device through cpal

pub mod channel;
pub mod clip;
pub mod config;
pub mod dispatcher;
#[cfg(feature = "device")]
pub mod engine;
pub mod error;
pub mod global;
pub mod playback;
pub mod renderer;

pub use channel::{ChannelSnapshot, OneShotSnapshot, OutputChannel, StreamChannel, VirtualChannel};
pub use clip::AudioClip;
pub use config::{DispatcherDesc, EngineDesc, MusicResume, PitchRange};
pub use dispatcher::{AudioDispatcher, EffectParams, RandomEffectParams};
#[cfg(feature = "device")]
pub use engine::{AudioFillCallback, DispatchEngine};
pub use error::DispatcherError;
pub use global::Registration;
pub use playback::{ChannelCommand, LoopMode, PlayState, Voice};
pub use renderer::ChannelRenderer;
