//! Error kinds shared by the compute and graphics halves of the tracer.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, TracerError>;

#[derive(Debug, thiserror::Error)]
pub enum TracerError {
    /// No platform/device pair advertises the required interop extension.
    #[error("no compatible device: no GPU platform/device pair supports `{extension}`")]
    NoCompatibleDevice { extension: String },

    /// Querying a platform or device attribute failed.
    #[error("probe error: {0}")]
    Probe(String),

    #[error("failed to load kernel source `{}`", path.display())]
    KernelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("kernel build failed:\n{log}")]
    KernelBuild { log: String },

    /// Shared context or shared memory object setup failed.
    #[error("interop error: {0}")]
    Interop(String),

    /// A queued compute command failed.
    #[error("compute error: {0}")]
    Compute(String),

    #[error("graphics error: {0}")]
    Graphics(String),
}

impl TracerError {
    pub fn probe<S: Into<String>>(msg: S) -> Self {
        TracerError::Probe(msg.into())
    }

    pub fn interop<S: Into<String>>(msg: S) -> Self {
        TracerError::Interop(msg.into())
    }

    pub fn compute<S: Into<String>>(msg: S) -> Self {
        TracerError::Compute(msg.into())
    }

    pub fn graphics<S: Into<String>>(msg: S) -> Self {
        TracerError::Graphics(msg.into())
    }
}
