//! Configuration management for the streaming encoder
//!
//! This module provides the user-facing encoder properties, the raw input
//! format proposed by the host, and the immutable [`EncoderConfiguration`]
//! derived from both when a session is set up.

use std::fmt;
use std::str::FromStr;

use crate::engine::EngineFactory;
use crate::error::{ConfigResult, ConfigurationError};
use crate::format::{SINK_CHANNELS, SINK_SAMPLE_RATES};
use crate::pcm_utils::BYTES_PER_SAMPLE;
use crate::tables::{self, MpegVersion};

/// Lowest bitrate accepted by the bitrate property
pub const MIN_BITRATE: u32 = 8;
/// Highest bitrate accepted by the bitrate property
pub const MAX_BITRATE: u32 = 320;

pub const DEFAULT_MODE: StereoMode = StereoMode::Stereo;
pub const DEFAULT_BITRATE: u32 = 128;
pub const DEFAULT_EMPHASIS: Emphasis = Emphasis::None;

/// Bitrates valid for constant-bitrate Layer III, as advertised to users
pub const CBR_BITRATES: &[u32] = &[
    8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];

/// Stereo encoding modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StereoMode {
    /// Standard stereo
    Stereo,
    /// Joint stereo (mid/side)
    #[cfg_attr(feature = "serde", serde(rename = "joint"))]
    JointStereo,
    /// Dual channel (independent channels)
    #[cfg_attr(feature = "serde", serde(rename = "dual"))]
    DualChannel,
    /// Mono
    Mono,
}

impl StereoMode {
    pub const ALL: [StereoMode; 4] = [
        StereoMode::Stereo,
        StereoMode::JointStereo,
        StereoMode::DualChannel,
        StereoMode::Mono,
    ];

    /// Mode field as written in the frame header
    pub fn code(self) -> u8 {
        match self {
            StereoMode::Stereo => 0,
            StereoMode::JointStereo => 1,
            StereoMode::DualChannel => 2,
            StereoMode::Mono => 3,
        }
    }

    /// Short name used for textual properties
    pub fn nick(self) -> &'static str {
        match self {
            StereoMode::Stereo => "stereo",
            StereoMode::JointStereo => "joint",
            StereoMode::DualChannel => "dual",
            StereoMode::Mono => "mono",
        }
    }

    /// Human readable name
    pub fn name(self) -> &'static str {
        match self {
            StereoMode::Stereo => "Stereo",
            StereoMode::JointStereo => "Joint Stereo",
            StereoMode::DualChannel => "Dual Channel",
            StereoMode::Mono => "Mono",
        }
    }
}

impl fmt::Display for StereoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nick())
    }
}

impl FromStr for StereoMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        StereoMode::ALL
            .into_iter()
            .find(|mode| mode.nick() == s)
            .ok_or_else(|| ConfigurationError::UnknownNick {
                property: "mode",
                value: s.to_string(),
            })
    }
}

/// Pre-emphasis modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Emphasis {
    /// No emphasis
    #[cfg_attr(feature = "serde", serde(rename = "none"))]
    None,
    /// 50/15 microseconds emphasis
    #[cfg_attr(feature = "serde", serde(rename = "5"))]
    Mu50_15,
    /// CCITT J.17 emphasis
    #[cfg_attr(feature = "serde", serde(rename = "ccit"))]
    CcittJ17,
}

impl Emphasis {
    pub const ALL: [Emphasis; 3] = [Emphasis::None, Emphasis::Mu50_15, Emphasis::CcittJ17];

    /// Emphasis field as written in the frame header (2 is reserved)
    pub fn code(self) -> u8 {
        match self {
            Emphasis::None => 0,
            Emphasis::Mu50_15 => 1,
            Emphasis::CcittJ17 => 3,
        }
    }

    pub fn nick(self) -> &'static str {
        match self {
            Emphasis::None => "none",
            Emphasis::Mu50_15 => "5",
            Emphasis::CcittJ17 => "ccit",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Emphasis::None => "No emphasis",
            Emphasis::Mu50_15 => "50/15 ms",
            Emphasis::CcittJ17 => "CCIT J.17",
        }
    }
}

impl fmt::Display for Emphasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nick())
    }
}

impl FromStr for Emphasis {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        Emphasis::ALL
            .into_iter()
            .find(|emphasis| emphasis.nick() == s)
            .ok_or_else(|| ConfigurationError::UnknownNick {
                property: "emphasis",
                value: s.to_string(),
            })
    }
}

/// Number of audio channels after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channels {
    /// Mono audio (1 channel)
    Mono = 1,
    /// Stereo audio (2 channels)
    Stereo = 2,
}

impl Channels {
    pub fn count(self) -> usize {
        self as usize
    }
}

impl TryFrom<u32> for Channels {
    type Error = ConfigurationError;

    fn try_from(value: u32) -> ConfigResult<Self> {
        match value {
            1 => Ok(Channels::Mono),
            2 => Ok(Channels::Stereo),
            other => Err(ConfigurationError::UnsupportedChannelLayout(other)),
        }
    }
}

impl From<Channels> for usize {
    fn from(channels: Channels) -> Self {
        channels.count()
    }
}

/// Encoder properties set by the host
///
/// Properties are read when a session is configured; changing them does
/// not affect a running session until the next configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncoderProperties {
    /// Requested stereo mode (forced to mono for one channel)
    pub mode: StereoMode,
    /// Target bitrate in kbps
    #[cfg_attr(feature = "serde", serde(rename = "bitrate"))]
    pub bitrate_kbps: u32,
    /// Pre-emphasis to signal
    pub emphasis: Emphasis,
}

impl Default for EncoderProperties {
    fn default() -> Self {
        Self {
            mode: DEFAULT_MODE,
            bitrate_kbps: DEFAULT_BITRATE,
            emphasis: DEFAULT_EMPHASIS,
        }
    }
}

impl EncoderProperties {
    /// Create properties with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stereo mode
    pub fn mode(mut self, mode: StereoMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the bitrate in kbps
    pub fn bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Set the pre-emphasis
    pub fn emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Check the bitrate against the property range
    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_BITRATE..=MAX_BITRATE).contains(&self.bitrate_kbps) {
            return Err(ConfigurationError::BitrateOutOfRange(self.bitrate_kbps));
        }
        Ok(())
    }

    /// Set a property from its textual form
    ///
    /// Accepts `mode`, `bitrate` and `emphasis`. Enum values use their nicks;
    /// surrounding whitespace is ignored.
    /// A rejected value leaves the properties unchanged.
    pub fn set_property(&mut self, name: &str, value: &str) -> ConfigResult<()> {
        let value = value.trim();
        match name {
            "mode" => self.mode = value.parse()?,
            "bitrate" => {
                let bitrate = value
                    .parse::<u32>()
                    .map_err(|_| ConfigurationError::UnknownNick {
                        property: "bitrate",
                        value: value.to_string(),
                    })?;
                if !(MIN_BITRATE..=MAX_BITRATE).contains(&bitrate) {
                    return Err(ConfigurationError::BitrateOutOfRange(bitrate));
                }
                self.bitrate_kbps = bitrate;
            }
            "emphasis" => self.emphasis = value.parse()?,
            other => return Err(ConfigurationError::UnknownProperty(other.to_string())),
        }
        Ok(())
    }

    /// Read a property in its textual form
    pub fn property(&self, name: &str) -> ConfigResult<String> {
        match name {
            "mode" => Ok(self.mode.nick().to_string()),
            "bitrate" => Ok(self.bitrate_kbps.to_string()),
            "emphasis" => Ok(self.emphasis.nick().to_string()),
            other => Err(ConfigurationError::UnknownProperty(other.to_string())),
        }
    }
}

/// Raw audio format proposed by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u32,
}

impl InputFormat {
    pub fn new(sample_rate: u32, channels: u32) -> Self {
        Self { sample_rate, channels }
    }

    /// Whether the format lies within the advertised input capabilities
    pub fn accepts(&self) -> bool {
        SINK_SAMPLE_RATES.contains(&self.sample_rate) && SINK_CHANNELS.contains(&self.channels)
    }
}

/// Configuration handed to the engine, immutable once derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncoderConfiguration {
    pub sample_rate: u32,
    pub channels: Channels,
    pub mode: StereoMode,
    pub bitrate_kbps: u32,
    pub emphasis: Emphasis,
    pub samplerate_index: usize,
    pub mpeg_version: MpegVersion,
}

impl EncoderConfiguration {
    /// Validate a proposed format against the current properties
    ///
    /// Channels are checked first, then the bitrate range, then the
    /// engine's rate/bitrate compatibility check. A single channel forces
    /// mono mode whatever was requested.
    pub fn derive<F>(
        format: &InputFormat,
        properties: &EncoderProperties,
        factory: &F,
    ) -> ConfigResult<Self>
    where
        F: EngineFactory + ?Sized,
    {
        let channels = Channels::try_from(format.channels)?;
        properties.validate()?;

        let sample_rate = format.sample_rate;
        let bitrate_kbps = properties.bitrate_kbps;
        if !factory.check_compatibility(sample_rate, bitrate_kbps) {
            return Err(ConfigurationError::IncompatibleRateBitrate {
                sample_rate,
                bitrate: bitrate_kbps,
            });
        }
        let samplerate_index = tables::find_samplerate_index(sample_rate).ok_or(
            ConfigurationError::IncompatibleRateBitrate {
                sample_rate,
                bitrate: bitrate_kbps,
            },
        )?;

        let mode = match channels {
            Channels::Mono => StereoMode::Mono,
            Channels::Stereo => properties.mode,
        };

        Ok(Self {
            sample_rate,
            channels,
            mode,
            bitrate_kbps,
            emphasis: properties.emphasis,
            samplerate_index,
            mpeg_version: factory.mpeg_version(samplerate_index),
        })
    }

    /// Channels carried by the encoded stream
    pub fn output_channels(&self) -> u32 {
        if self.mode == StereoMode::Mono {
            1
        } else {
            self.channels.count() as u32
        }
    }

    /// Size in bytes of one interleaved 16-bit sample frame
    pub fn frame_bytes(&self) -> usize {
        BYTES_PER_SAMPLE * self.channels.count()
    }
}
