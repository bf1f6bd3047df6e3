//! # Streaming MP3 Encoder Adapter
//!
//! Feeds raw interleaved 16-bit PCM, delivered in buffers of any length,
//! into a shine-style Layer III engine that only accepts fixed-size passes,
//! and emits the compressed frames in order. Leftover samples are never
//! passed to the engine early, and the engine's buffered partial frame is
//! drained exactly once at end of stream.
//!

pub mod audio_encoder;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod mp3_encoder;
pub mod pcm_utils;
pub mod session;
pub mod sink;
pub mod tables;

pub use audio_encoder::{AudioEncoder, Input};
pub use config::{
    Channels, Emphasis, EncoderConfiguration, EncoderProperties, InputFormat, StereoMode,
};
pub use engine::{EncodingEngine, EngineFactory};
pub use error::{
    AdapterError, ConfigurationError, DataError, EngineError, Result, SinkError,
};
pub use format::{FrameSamples, Negotiated, OutputFormat};
pub use mp3_encoder::{encode_pcm_to_mp3, Mp3Encoder};
pub use session::{EncoderSession, PassStats};
pub use sink::{EncodedFrame, FrameSink, WriterSink};
pub use tables::MpegVersion;
