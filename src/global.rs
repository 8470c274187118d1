//! Process-wide dispatcher
//!
//! The first dispatcher passed to [`initialize`] becomes the singleton for the
//! rest of the process. Later candidates are dropped and never become
//! reachable through [`instance`].

use crate::dispatcher::AudioDispatcher;
use crate::error::{DispatcherError, Result};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static INSTANCE: OnceLock<Mutex<AudioDispatcher>> = OnceLock::new();

/// Outcome of [`initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The candidate is now the process-wide dispatcher
    Installed,
    /// A dispatcher was already installed; the candidate was dropped
    Discarded,
}

/// Activate `dispatcher` and install it as the process-wide instance unless
/// one is already installed.
pub fn initialize(mut dispatcher: AudioDispatcher) -> Registration {
    if INSTANCE.get().is_some() {
        log::warn!("Audio dispatcher already initialized, discarding duplicate");
        return Registration::Discarded;
    }

    dispatcher.activate();
    match INSTANCE.set(Mutex::new(dispatcher)) {
        Ok(()) => {
            log::info!("Audio dispatcher initialized");
            Registration::Installed
        }
        Err(_rejected) => {
            log::warn!("Audio dispatcher initialized concurrently, discarding duplicate");
            Registration::Discarded
        }
    }
}

/// Lock and return the process-wide dispatcher.
///
/// # Errors
///
/// [`DispatcherError::NotInitialized`] before [`initialize`] has installed one.
pub fn instance() -> Result<MutexGuard<'static, AudioDispatcher>> {
    let dispatcher = INSTANCE.get().ok_or(DispatcherError::NotInitialized)?;
    Ok(dispatcher.lock().unwrap_or_else(PoisonError::into_inner))
}

pub fn is_initialized() -> bool {
    INSTANCE.get().is_some()
}
