//! Capabilities a host pipeline drives an audio encoder through

use crate::config::InputFormat;
use crate::error::Result;
use crate::format::Negotiated;

/// One input unit delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// Interleaved signed 16-bit native-endian samples of any length
    Buffer(&'a [u8]),
    /// No more input follows
    EndOfStream,
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(data: &'a [u8]) -> Self {
        Input::Buffer(data)
    }
}

impl<'a> From<Option<&'a [u8]>> for Input<'a> {
    fn from(data: Option<&'a [u8]>) -> Self {
        data.map_or(Input::EndOfStream, Input::Buffer)
    }
}

/// Lifecycle and data path of a streaming audio encoder
///
/// Calls are serialized by the host; an implementation is never entered
/// concurrently.
pub trait AudioEncoder {
    /// Prepare for a stream. No session exists until [`configure`](Self::configure).
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Stop the stream, releasing any session
    fn stop(&mut self) -> Result<()> {
        self.teardown()
    }

    /// Set up a session for a (new) input format
    fn configure(&mut self, format: &InputFormat) -> Result<Negotiated>;

    /// Encode a buffer, or drain and push the final frame at end of stream
    fn process(&mut self, input: Input<'_>) -> Result<()>;

    /// Drain buffered engine state, pushing it downstream only if `push`
    fn flush(&mut self, push: bool) -> Result<()>;

    /// Release the session; safe to call with none
    fn teardown(&mut self) -> Result<()>;
}
