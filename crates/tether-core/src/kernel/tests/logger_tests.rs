#![cfg(test)]

use log::{Level, LevelFilter};

use crate::kernel::logger::{ComponentLogger, FacadeLogger};

#[test]
fn test_facade_logger_respects_max_level() {
    let logger = FacadeLogger::new("demo", LevelFilter::Warn);
    assert_eq!(logger.component(), "demo");
    assert!(logger.is_enabled(Level::Error));
    assert!(logger.is_enabled(Level::Warn));
    assert!(!logger.is_enabled(Level::Info));
    assert!(!logger.is_enabled(Level::Trace));
}

#[test]
fn test_facade_logger_off_never_panics() {
    let logger = FacadeLogger::new("silent", LevelFilter::Off);
    assert!(!logger.is_enabled(Level::Error));
    let cause = std::io::Error::other("boom");
    logger.log(Level::Error, format_args!("callback {} failed", "bind"), Some(&cause));
    logger.log(Level::Warn, format_args!("no cause"), None);
}
