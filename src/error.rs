//! # Error Types
//!
//! This module defines error types used throughout the tillprint library.
//!
//! Transport failures have their own [`TransportError`](crate::transport::TransportError)
//! so the wireless pipeline can name the stage that failed; it converts into
//! [`TillprintError::Transport`] at the crate boundary.

use thiserror::Error;

use crate::receipt::convert::ConvertError;
use crate::transport::TransportError;

/// Main error type for tillprint operations
#[derive(Debug, Error)]
pub enum TillprintError {
    /// Transport-level errors (discovery, connection, writes)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Image loading or decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Invalid configuration or settings file
    #[error("Config error: {0}")]
    Config(String),

    /// Collaborator data could not be mapped onto a receipt
    #[error("Invalid receipt data: {0}")]
    Convert(#[from] ConvertError),

    /// HTTP fetch error (remote logos)
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
