//! Error types for the orrery client

use thiserror::Error;

use crate::Capability;

/// Core orrery errors
#[derive(Error, Debug)]
pub enum OrreryError {
    // Wire errors
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    // Transport errors
    #[error("Invalid feed address: {0}")]
    InvalidAddress(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Connection already active")]
    AlreadyConnected,

    // Pipeline errors
    #[error("Processing queue closed")]
    QueueClosed,

    // Render errors
    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Capability unavailable: {0:?}")]
    CapabilityUnavailable(Capability),
}

/// Result type for orrery operations
pub type OrreryResult<T> = Result<T, OrreryError>;
