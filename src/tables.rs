//! Lookup tables and helpers for Layer III configuration
//!
//! This module carries the sample rate and bitrate tables a shine-style
//! engine uses to decide whether a configuration is encodable, which MPEG
//! version a sample rate resolves to, and how many samples each encoder
//! pass consumes.

/// Samples per granule in Layer III
pub const GRANULE_SIZE: usize = 576;

/// Sample rates in engine index order (matches shine's samplerates array)
pub const SAMPLE_RATES: [u32; 9] = [
    44100, 48000, 32000, // MPEG-1
    22050, 24000, 16000, // MPEG-2
    11025, 12000, 8000,  // MPEG-2.5
];

/// Bitrate table indexed by `[bitrate_index][version column]`
/// where the version column is 0=2.5, 1=reserved, 2=II, 3=I.
/// Zero marks a free/forbidden slot.
pub const BITRATES: [[u32; 4]; 16] = [
    [0, 0, 0, 0],       // 0000 (free format)
    [8, 0, 8, 32],      // 0001
    [16, 0, 16, 40],    // 0010
    [24, 0, 24, 48],    // 0011
    [32, 0, 32, 56],    // 0100
    [40, 0, 40, 64],    // 0101
    [48, 0, 48, 80],    // 0110
    [56, 0, 56, 96],    // 0111
    [64, 0, 64, 112],   // 1000
    [0, 0, 80, 128],    // 1001
    [0, 0, 96, 160],    // 1010
    [0, 0, 112, 192],   // 1011
    [0, 0, 128, 224],   // 1100
    [0, 0, 144, 256],   // 1101
    [0, 0, 160, 320],   // 1110
    [0, 0, 0, 0],       // 1111 (forbidden)
];

/// MPEG audio version a sample rate resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MpegVersion {
    /// MPEG-1 (32, 44.1, 48 kHz)
    Mpeg1,
    /// MPEG-2 LSF (16, 22.05, 24 kHz)
    Mpeg2,
    /// MPEG-2.5 (8, 11.025, 12 kHz)
    Mpeg25,
}

impl MpegVersion {
    /// Two-bit version field as written in the frame header
    pub fn header_bits(self) -> u8 {
        match self {
            MpegVersion::Mpeg1 => 3,
            MpegVersion::Mpeg2 => 2,
            MpegVersion::Mpeg25 => 0,
        }
    }

    /// Audio version number advertised downstream (1, 2 or 3 for 2.5)
    pub fn audio_version(self) -> u8 {
        match self {
            MpegVersion::Mpeg1 => 1,
            MpegVersion::Mpeg2 => 2,
            MpegVersion::Mpeg25 => 3,
        }
    }

    fn bitrate_column(self) -> usize {
        self.header_bits() as usize
    }
}

/// Find the engine index of a sample rate
pub fn find_samplerate_index(sample_rate: u32) -> Option<usize> {
    SAMPLE_RATES.iter().position(|&rate| rate == sample_rate)
}

/// Resolve the MPEG version for a sample rate index
///
/// Indices past the end of [`SAMPLE_RATES`] resolve like the last group.
pub fn mpeg_version(samplerate_index: usize) -> MpegVersion {
    match samplerate_index {
        0..=2 => MpegVersion::Mpeg1,
        3..=5 => MpegVersion::Mpeg2,
        _ => MpegVersion::Mpeg25,
    }
}

/// Find the header bitrate index for a bitrate under the given version
pub fn find_bitrate_index(bitrate_kbps: u32, version: MpegVersion) -> Option<usize> {
    if bitrate_kbps == 0 {
        return None;
    }
    let column = version.bitrate_column();
    BITRATES.iter().position(|row| row[column] == bitrate_kbps)
}

/// Check that a sample rate and bitrate pair can be encoded
///
/// Returns the bitrate index on success, mirroring shine_check_config.
pub fn check_config(sample_rate: u32, bitrate_kbps: u32) -> Option<usize> {
    let samplerate_index = find_samplerate_index(sample_rate)?;
    find_bitrate_index(bitrate_kbps, mpeg_version(samplerate_index))
}

/// Granules carried by one frame
pub fn granules_per_frame(version: MpegVersion) -> usize {
    match version {
        MpegVersion::Mpeg1 => 2,
        MpegVersion::Mpeg2 | MpegVersion::Mpeg25 => 1,
    }
}

/// Samples per channel consumed by each encoder pass
pub fn samples_per_pass(version: MpegVersion) -> usize {
    granules_per_frame(version) * GRANULE_SIZE
}
