//! Error types for sonic-dispatch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatcherError {
    #[error("Audio dispatcher has not been initialized")]
    NotInitialized,

    #[error("Cannot pick a random effect from an empty clip set")]
    EmptyClipSet,

    #[error("Invalid pitch range: low {low} must be finite and not exceed high {high}")]
    InvalidPitchRange { low: f32, high: f32 },

    #[error("Invalid clip: {0}")]
    InvalidClip(String),

    #[error("Output channel error: {0}")]
    Channel(String),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("Audio format error: {0}")]
    AudioFormat(String),

    #[error("Engine error: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, DispatcherError>;
