//! Encoding engine interface
//!
//! The Layer III bitstream encoder itself lives behind these traits. An
//! [`EngineFactory`] validates configurations and creates engines; an
//! [`EncodingEngine`] consumes exactly [`EncodingEngine::samples_per_pass`]
//! samples per channel on each call and may carry partial frames internally
//! between calls.
//!
//! Engines release their resources in `Drop`. The adapter owns each engine
//! exclusively and drops it exactly once on teardown or reconfiguration.

use crate::config::EncoderConfiguration;
use crate::error::EngineResult;
use crate::tables::{self, MpegVersion};

/// Creates engines and answers configuration queries
pub trait EngineFactory {
    type Engine: EncodingEngine;

    /// Whether the sample rate and bitrate can be encoded together
    fn check_compatibility(&self, sample_rate: u32, bitrate_kbps: u32) -> bool {
        tables::check_config(sample_rate, bitrate_kbps).is_some()
    }

    /// MPEG version used for a sample rate index
    fn mpeg_version(&self, samplerate_index: usize) -> MpegVersion {
        tables::mpeg_version(samplerate_index)
    }

    /// Create an engine for a validated configuration
    fn initialize(&mut self, config: &EncoderConfiguration) -> EngineResult<Self::Engine>;
}

/// A live, configured encoder instance
pub trait EncodingEngine {
    /// Samples per channel consumed by each [`encode`](Self::encode) call
    ///
    /// Must not change for the lifetime of the engine.
    fn samples_per_pass(&self) -> usize;

    /// Encode one pass of interleaved samples
    ///
    /// `pcm` holds exactly `samples_per_pass() * channels` samples. The
    /// returned slice may be empty while the engine is still filling a frame.
    fn encode(&mut self, pcm: &[i16]) -> EngineResult<&[u8]>;

    /// Drain whatever partial frame the engine still holds
    fn flush(&mut self) -> EngineResult<&[u8]>;
}

impl<E: EncodingEngine + ?Sized> EncodingEngine for Box<E> {
    fn samples_per_pass(&self) -> usize {
        (**self).samples_per_pass()
    }

    fn encode(&mut self, pcm: &[i16]) -> EngineResult<&[u8]> {
        (**self).encode(pcm)
    }

    fn flush(&mut self) -> EngineResult<&[u8]> {
        (**self).flush()
    }
}
