//! Error types for host loading and module lookup

/// Error type for host function table validation
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// A required host function pointer was null
    #[error("Host function missing: {0}")]
    MissingFunction(&'static str),

    /// The data directory handed over by the bridge was empty or not UTF-8
    #[error("Invalid data directory: {0}")]
    InvalidDataDir(String),

    /// Engine already initialized
    #[error("Engine already initialized")]
    AlreadyInitialized,
}

/// Error type for loaded module lookup
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    /// The bridge did not report the library
    #[error("Module not loaded: {0}")]
    NotFound(String),

    /// The bridge reported a null or zero-sized span
    #[error("Module has no mapped span: {0}")]
    Empty(String),

    /// Engine not initialized, or the bridge has no module lookup
    #[error("Module lookup unavailable")]
    Unavailable,
}
