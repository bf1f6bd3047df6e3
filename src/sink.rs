//! Downstream consumers of encoded frames

use std::io::Write;

use crate::error::SinkResult;
use crate::format::OutputFormat;

/// One unit of compressed output
///
/// Produced either by a completed pass or by the terminal flush. The
/// buffer is freshly allocated and owned by whoever receives the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    pub data: Vec<u8>,
    pub format: OutputFormat,
    /// Set on the final frame drained at end of stream
    pub terminal: bool,
}

impl EncodedFrame {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Receives the output format and encoded frames, in order
pub trait FrameSink {
    /// Called once per configuration, before any frame of that session
    fn set_output_format(&mut self, format: &OutputFormat) -> SinkResult<()>;

    /// Take ownership of one encoded frame
    fn push_frame(&mut self, frame: EncodedFrame) -> SinkResult<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn set_output_format(&mut self, format: &OutputFormat) -> SinkResult<()> {
        (**self).set_output_format(format)
    }

    fn push_frame(&mut self, frame: EncodedFrame) -> SinkResult<()> {
        (**self).push_frame(frame)
    }
}

/// Collects frames in memory
impl FrameSink for Vec<EncodedFrame> {
    fn set_output_format(&mut self, _format: &OutputFormat) -> SinkResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, frame: EncodedFrame) -> SinkResult<()> {
        self.push(frame);
        Ok(())
    }
}

/// Writes raw frames back to back, producing a plain elementary stream
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
    format: Option<OutputFormat>,
    frames_written: usize,
    bytes_written: u64,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            format: None,
            frames_written: 0,
            bytes_written: 0,
        }
    }

    /// Last format published by the encoder
    pub fn format(&self) -> Option<&OutputFormat> {
        self.format.as_ref()
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for WriterSink<W> {
    fn set_output_format(&mut self, format: &OutputFormat) -> SinkResult<()> {
        self.format = Some(*format);
        Ok(())
    }

    fn push_frame(&mut self, frame: EncodedFrame) -> SinkResult<()> {
        self.writer.write_all(&frame.data)?;
        if frame.terminal {
            self.writer.flush()?;
        }
        self.frames_written += 1;
        self.bytes_written += frame.data.len() as u64;
        Ok(())
    }
}
