//! Error types for nuwrap-nuget.

use std::path::PathBuf;

/// Errors produced around locating and invoking `NuGet.exe`.
///
/// Not finding the executable during a search is not an error; the locator
/// reports that as `None`. `NotFound` is for callers that require one.
#[derive(Debug, thiserror::Error)]
pub enum NuGetError {
    /// No `NuGet.exe` could be resolved.
    #[error("NuGet.exe not found — install the NuGet.CommandLine package into a `packages` directory, or set `nuget.path` in nuwrap.toml")]
    NotFound,

    /// An explicitly configured executable does not exist.
    #[error("NuGet.exe configured at {path} does not exist")]
    MissingExecutable { path: PathBuf },

    /// Failed to execute NuGet.exe (or its launcher).
    #[error("cannot execute NuGet.exe: {source}")]
    Exec { source: nuwrap_util::error::UtilError },

    /// Cannot compute fingerprint of the NuGet.exe binary.
    #[error("cannot fingerprint NuGet.exe at {path}: {source}")]
    Fingerprint {
        path: PathBuf,
        source: nuwrap_util::error::UtilError,
    },
}
