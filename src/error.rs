//! Error types for the streaming encoder
//!
//! This module defines the error taxonomy used throughout the adapter:
//! configuration failures raised while setting up a session, data errors
//! raised while slicing input buffers, opaque engine failures, and errors
//! reported by the downstream frame sink.

use std::fmt;

use thiserror::Error;

/// Main error type returned by the adapter
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Setup failed; no session is left active
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// Input buffer could not be interpreted as whole samples
    #[error("Input data error: {0}")]
    Data(#[from] DataError),

    /// The encoding engine failed mid-stream
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// The downstream consumer refused a frame
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Data arrived before a successful configuration
    #[error("Encoder is not configured")]
    NotConfigured,

    /// Data arrived after end of stream was drained
    #[error("Encoder has been finished")]
    Finished,
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Only mono and stereo input is supported
    #[error("Unsupported channel layout: {0} channels (only mono or stereo)")]
    UnsupportedChannelLayout(u32),

    /// Bitrate property outside the accepted range
    #[error("Bitrate {0} kbps is outside the accepted range 8..=320")]
    BitrateOutOfRange(u32),

    /// The engine cannot encode this sample rate and bitrate together
    #[error("Incompatible sample rate ({sample_rate} Hz) and bitrate ({bitrate} kbps) combination")]
    IncompatibleRateBitrate { sample_rate: u32, bitrate: u32 },

    /// The engine refused to initialise
    #[error("Failed to initialise encoding engine: {0}")]
    EngineInitFailed(#[source] EngineError),

    /// A textual property value named no known member
    #[error("Unknown value {value:?} for property {property}")]
    UnknownNick { property: &'static str, value: String },

    /// A property name that the encoder does not expose
    #[error("Unknown property {0:?}")]
    UnknownProperty(String),
}

/// Input data validation errors
#[derive(Debug, Error)]
pub enum DataError {
    /// Byte length is not a whole number of interleaved sample frames
    #[error("Malformed buffer: {len} bytes is not a multiple of the {frame_bytes}-byte sample frame")]
    MalformedBuffer { len: usize, frame_bytes: usize },
}

/// Errors reported by an encoding engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine could not be created for the configuration
    #[error("initialisation failed: {0}")]
    Init(String),

    /// An encode pass failed
    #[error("encode pass failed: {0}")]
    Encode(String),

    /// Draining buffered state failed
    #[error("flush failed: {0}")]
    Flush(String),
}

/// Opaque error raised by a frame sink, passed through unchanged
pub struct SinkError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl SinkError {
    /// Wrap any error produced by a sink
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self(error.into())
    }

    /// Borrow the wrapped error
    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.0
    }

    /// Unwrap the original error
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.0
    }
}

impl fmt::Debug for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err)
    }
}

/// Specialized result types for different modules
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
pub type DataResult<T> = std::result::Result<T, DataError>;
pub type EngineResult<T> = std::result::Result<T, EngineError>;
pub type SinkResult<T> = std::result::Result<T, SinkError>;
pub type Result<T> = std::result::Result<T, AdapterError>;
