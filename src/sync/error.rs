use thiserror::Error;

/// Fatal errors of the synchronization pipeline.
///
/// Recoverable-absent conditions (missing cache fields, missing data files,
/// missing generators directories) never surface here; components degrade to
/// defaults instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize configuration document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no build directories found under {path} (run CMake configure first)")]
    NoBuildDirectories { path: String },

    #[error("CMake Tools extension is required but unavailable")]
    CmakeToolsUnavailable,
}
