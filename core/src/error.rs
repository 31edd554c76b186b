use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to allocate output buffer of {samples} samples")]
    BufferAllocationFailed { samples: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("No input data: expected {expected} samples, got {actual}")]
    NoInputData { expected: usize, actual: usize },

    /// The spectrum peak does not map to a byte value. This is the normal
    /// outcome for silence, noise and gaps between characters.
    #[error("No symbol detected (spectral peak at {frequency:.1} Hz)")]
    NoDetection { frequency: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
