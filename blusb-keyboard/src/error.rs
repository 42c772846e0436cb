//! Keyboard interface error types

use blusb_transport::TransportError;
use thiserror::Error;

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Controller reported zero layers
    #[error("No layers configured")]
    NoLayers,

    /// Controller reported more layers than it can store
    #[error("{0} layers reported, bad flash value")]
    BadLayerCount(usize),

    /// Reply shorter than its header announces
    #[error("Short buffer: expected {expected} bytes, got {actual}")]
    ShortBuffer { expected: usize, actual: usize },

    /// Macro storage is blank or erased
    #[error("Bad EEPROM value in macro table")]
    BadEeprom,
}
