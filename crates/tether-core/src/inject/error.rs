//! # Tether Core Callback Errors
//!
//! Component manager callbacks report failure through [`CallbackError`], a
//! boxed error. A callback that panics instead is contained by
//! [`call_guarded`] and reported as a [`CallbackPanic`].
use std::any::Any;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Failure raised by a component manager callback
pub type CallbackError = Box<dyn StdError + Send + Sync + 'static>;

/// A callback panicked instead of returning
#[derive(Debug, Error)]
#[error("callback panicked: {message}")]
pub struct CallbackPanic {
    pub message: String,
}

impl CallbackPanic {
    /// Build from a panic payload, keeping string payloads readable
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

/// Run a callback, turning a panic into a [`CallbackPanic`] error.
pub(crate) fn call_guarded<T, F>(f: F) -> Result<T, CallbackError>
where
    F: FnOnce() -> Result<T, CallbackError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(Box::new(CallbackPanic::from_payload(payload))),
    }
}
