use std::error::Error as StdError;
use std::fmt;

use log::{Level, LevelFilter};

use crate::kernel::constants::COMPONENT_LOG_TARGET;

/// Logger handed to every component activation.
///
/// Acquisition failures are reported at [`Level::Warn`], callback failures at
/// [`Level::Error`]. Implementations must never panic.
pub trait ComponentLogger: Send + Sync {
    /// Log a formatted message with an optional cause
    fn log(&self, level: Level, args: fmt::Arguments<'_>, cause: Option<&(dyn StdError + 'static)>);

    /// Whether messages at `level` would be emitted
    fn is_enabled(&self, level: Level) -> bool {
        let _ = level;
        true
    }
}

/// Default logger forwarding to the `log` facade
#[derive(Debug, Clone)]
pub struct FacadeLogger {
    component: String,
    max_level: LevelFilter,
}

impl FacadeLogger {
    /// Create a logger for the named component
    pub fn new(component: impl Into<String>, max_level: LevelFilter) -> Self {
        Self {
            component: component.into(),
            max_level,
        }
    }

    /// Name of the component this logger reports for
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Maximum level this logger emits
    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }
}

impl ComponentLogger for FacadeLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>, cause: Option<&(dyn StdError + 'static)>) {
        if !self.is_enabled(level) {
            return;
        }
        match cause {
            Some(err) => log::log!(target: COMPONENT_LOG_TARGET, level, "[{}] {}: {}", self.component, args, err),
            None => log::log!(target: COMPONENT_LOG_TARGET, level, "[{}] {}", self.component, args),
        }
    }

    fn is_enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }
}
