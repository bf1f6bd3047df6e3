//! PCM audio data processing utilities
//!
//! Helpers for interpreting raw input buffers as interleaved signed 16-bit
//! samples in native byte order.

use byteorder::{ByteOrder, NativeEndian};

use crate::error::{DataError, DataResult};
use crate::format::SAMPLE_WIDTH_BITS;

/// Bytes per sample
pub const BYTES_PER_SAMPLE: usize = (SAMPLE_WIDTH_BITS / 8) as usize;

/// Count the whole sample frames (one sample per channel) in a buffer
///
/// A buffer whose length is not a multiple of the frame size is rejected
/// rather than truncated.
pub fn count_sample_frames(data: &[u8], channels: usize) -> DataResult<usize> {
    let frame_bytes = BYTES_PER_SAMPLE * channels;
    if frame_bytes == 0 || data.len() % frame_bytes != 0 {
        return Err(DataError::MalformedBuffer {
            len: data.len(),
            frame_bytes,
        });
    }
    Ok(data.len() / frame_bytes)
}

/// Decode native-endian 16-bit samples into `samples`
///
/// `data` must hold exactly `samples.len() * 2` bytes.
pub fn decode_samples(data: &[u8], samples: &mut [i16]) {
    NativeEndian::read_i16_into(data, samples);
}

/// Encode samples into native-endian bytes
pub fn encode_samples(samples: &[i16]) -> Vec<u8> {
    let mut data = vec![0u8; samples.len() * BYTES_PER_SAMPLE];
    NativeEndian::write_i16_into(samples, &mut data);
    data
}

/// Interleave separate channel buffers (L, R, L, R, ...)
///
/// Channels shorter than the first one are padded with silence.
pub fn interleave(channel_buffers: &[&[i16]]) -> Vec<i16> {
    let frames = channel_buffers.first().map_or(0, |ch| ch.len());
    let mut interleaved = Vec::with_capacity(frames * channel_buffers.len());
    for sample_idx in 0..frames {
        for channel in channel_buffers {
            interleaved.push(channel.get(sample_idx).copied().unwrap_or(0));
        }
    }
    interleaved
}
