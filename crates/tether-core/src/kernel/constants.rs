/// Key under which a captured callback failure is stored in a failure result
pub const EXCEPTION_KEY: &str = "exception";

/// `log` target used by [`FacadeLogger`](crate::kernel::logger::FacadeLogger)
pub const COMPONENT_LOG_TARGET: &str = "tether::component";

/// Lowest descriptor namespace version allowing field injection and prototype scope
pub const FIELD_INJECTION_MIN_VERSION: &str = "1.3.0";

/// Descriptor namespace version assumed when a descriptor omits it
pub const DEFAULT_DESCRIPTOR_VERSION: &str = "1.0.0";
