//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;
use crate::transfer::TransferFunctionError;

/// Errors produced by the volray crate.
#[derive(Debug)]
pub enum VolrayError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to load a raw volume file.
    VolumeLoad(String),
    /// Transfer-function operation or persistence failure.
    TransferFunction(TransferFunctionError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for VolrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::VolumeLoad(msg) => {
                write!(f, "volume load error: {msg}")
            }
            Self::TransferFunction(e) => {
                write!(f, "transfer-function error: {e}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for VolrayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::TransferFunction(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for VolrayError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<TransferFunctionError> for VolrayError {
    fn from(e: TransferFunctionError) -> Self {
        Self::TransferFunction(e)
    }
}

impl From<std::io::Error> for VolrayError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
