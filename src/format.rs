//! Stream descriptors and static capabilities
//!
//! Describes what the encoder accepts on its input, what it announces for
//! its compressed output, and the chunk size it asks the host to deliver.

use std::ops::RangeInclusive;

use crate::config::EncoderConfiguration;
use crate::tables::MpegVersion;

/// Sample rates accepted on the raw input
pub const SINK_SAMPLE_RATES: [u32; 9] = [
    8000, 11025, 12000, 16000, 22050, 24000, 32000, 44100, 48000,
];

/// Channel counts accepted on the raw input
pub const SINK_CHANNELS: RangeInclusive<u32> = 1..=2;

/// Input samples are signed 16-bit in native byte order
pub const SAMPLE_WIDTH_BITS: u32 = 16;

/// MPEG audio family identifier announced downstream
pub const MPEG_VERSION: u8 = 1;

/// Layer announced downstream
pub const LAYER_III: u8 = 3;

/// Static description of the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementMetadata {
    pub long_name: &'static str,
    pub klass: &'static str,
    pub description: &'static str,
    pub author: &'static str,
}

pub const METADATA: ElementMetadata = ElementMetadata {
    long_name: "shine mp3 encoder",
    klass: "Codec/Encoder/Audio",
    description: "fixed point free MP3 encoder",
    author: "Zhaoxiu Zeng <zhaoxiu.zeng@gmail.com>",
};

/// Descriptor of the compressed output stream
///
/// Published to the sink before any encoded data and attached to every
/// emitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputFormat {
    /// Always 1 (MPEG audio)
    pub mpeg_version: u8,
    /// 1, 2 or 3 for MPEG-1, MPEG-2 and MPEG-2.5
    pub mpeg_audio_version: u8,
    /// Always 3
    pub layer: u8,
    /// Channels in the encoded stream (1 when encoding mono)
    pub channels: u32,
    /// Sample rate in Hz
    pub rate: u32,
}

impl OutputFormat {
    /// Build the output descriptor for a derived configuration
    pub fn for_config(config: &EncoderConfiguration, version: MpegVersion) -> Self {
        Self {
            mpeg_version: MPEG_VERSION,
            mpeg_audio_version: version.audio_version(),
            layer: LAYER_III,
            channels: config.output_channels(),
            rate: config.sample_rate,
        }
    }

    /// Media type string for the descriptor
    pub fn media_type(&self) -> &'static str {
        "audio/mpeg"
    }
}

/// Input chunk size requested from the host, in samples per channel
///
/// The host may honour this, but the adapter never relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameSamples {
    pub min: usize,
    pub max: usize,
}

impl FrameSamples {
    /// Request exactly `samples` per chunk
    pub fn exactly(samples: usize) -> Self {
        Self {
            min: samples,
            max: samples,
        }
    }
}

/// Result of a successful configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negotiated {
    pub output: OutputFormat,
    pub frame_samples: FrameSamples,
}
