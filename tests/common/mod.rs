//! Shared test doubles: a scripted engine that records every call and a
//! sink that records every frame.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use shine_stream::error::{EngineResult, SinkResult};
use shine_stream::pcm_utils::encode_samples;
use shine_stream::tables;
use shine_stream::{
    EncodedFrame, EncoderConfiguration, EncodingEngine, EngineError, EngineFactory, FrameSink,
    OutputFormat, SinkError,
};

/// Two-byte sync pattern every scripted frame starts with
pub const SYNC: [u8; 2] = [0xff, 0xfb];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything the scripted engines observed
#[derive(Debug, Default)]
pub struct Probe {
    pub inits: Vec<EncoderConfiguration>,
    pub calls: Vec<Vec<i16>>,
    pub flushes: usize,
    pub drops: usize,
}

pub type SharedProbe = Rc<RefCell<Probe>>;

/// Factory producing [`ScriptedEngine`]s
pub struct ScriptedFactory {
    pub probe: SharedProbe,
    /// Overrides the table-derived pass size
    pub samples_per_pass: Option<usize>,
    /// Passes that produce no output before frames start coming out
    pub silent_passes: usize,
    /// Bytes returned by flush
    pub flush_output: Vec<u8>,
    pub fail_init: bool,
    /// Pass index at which encode fails
    pub fail_encode_at: Option<usize>,
    pub fail_flush: bool,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self {
            probe: SharedProbe::default(),
            samples_per_pass: None,
            silent_passes: 0,
            flush_output: Vec::new(),
            fail_init: false,
            fail_encode_at: None,
            fail_flush: false,
        }
    }

    pub fn with_samples_per_pass(mut self, samples: usize) -> Self {
        self.samples_per_pass = Some(samples);
        self
    }

    pub fn with_flush_output(mut self, data: &[u8]) -> Self {
        self.flush_output = data.to_vec();
        self
    }

    pub fn with_silent_passes(mut self, passes: usize) -> Self {
        self.silent_passes = passes;
        self
    }

    pub fn probe(&self) -> SharedProbe {
        Rc::clone(&self.probe)
    }
}

impl EngineFactory for ScriptedFactory {
    type Engine = ScriptedEngine;

    fn initialize(&mut self, config: &EncoderConfiguration) -> EngineResult<ScriptedEngine> {
        if self.fail_init {
            return Err(EngineError::Init("no memory for encoder state".into()));
        }
        self.probe.borrow_mut().inits.push(*config);

        Ok(ScriptedEngine {
            probe: Rc::clone(&self.probe),
            samples_per_pass: self
                .samples_per_pass
                .unwrap_or_else(|| tables::samples_per_pass(config.mpeg_version)),
            silent_passes: self.silent_passes,
            flush_output: self.flush_output.clone(),
            fail_encode_at: self.fail_encode_at,
            fail_flush: self.fail_flush,
            pass_index: 0,
            out: Vec::new(),
        })
    }
}

/// Engine emitting one deterministic frame per pass
///
/// Each frame is `SYNC`, the pass index (u32 LE) and the first sample of the
/// pass (i16 LE).
pub struct ScriptedEngine {
    probe: SharedProbe,
    samples_per_pass: usize,
    silent_passes: usize,
    flush_output: Vec<u8>,
    fail_encode_at: Option<usize>,
    fail_flush: bool,
    pass_index: usize,
    out: Vec<u8>,
}

impl EncodingEngine for ScriptedEngine {
    fn samples_per_pass(&self) -> usize {
        self.samples_per_pass
    }

    fn encode(&mut self, pcm: &[i16]) -> EngineResult<&[u8]> {
        let index = self.pass_index;
        self.pass_index += 1;
        self.probe.borrow_mut().calls.push(pcm.to_vec());

        if self.fail_encode_at == Some(index) {
            return Err(EngineError::Encode(format!("pass {index} overflowed")));
        }

        self.out.clear();
        if index >= self.silent_passes {
            self.out.extend_from_slice(&SYNC);
            self.out.extend_from_slice(&(index as u32).to_le_bytes());
            self.out.extend_from_slice(&pcm[0].to_le_bytes());
        }
        Ok(self.out.as_slice())
    }

    fn flush(&mut self) -> EngineResult<&[u8]> {
        self.probe.borrow_mut().flushes += 1;
        if self.fail_flush {
            return Err(EngineError::Flush("bit reservoir corrupted".into()));
        }
        Ok(self.flush_output.as_slice())
    }
}

impl Drop for ScriptedEngine {
    fn drop(&mut self) {
        self.probe.borrow_mut().drops += 1;
    }
}

/// Pass index carried by a scripted frame
pub fn pass_index(frame: &EncodedFrame) -> u32 {
    u32::from_le_bytes([frame.data[2], frame.data[3], frame.data[4], frame.data[5]])
}

/// First sample carried by a scripted frame
pub fn first_sample(frame: &EncodedFrame) -> i16 {
    i16::from_le_bytes([frame.data[6], frame.data[7]])
}

/// Sink recording formats and frames, optionally failing
#[derive(Default)]
pub struct RecordingSink {
    pub formats: Vec<OutputFormat>,
    pub frames: Vec<EncodedFrame>,
    /// Refuse the n-th pushed frame (0-based)
    pub fail_at: Option<usize>,
    pub refuse_format: bool,
    pushes: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }
}

impl FrameSink for RecordingSink {
    fn set_output_format(&mut self, format: &OutputFormat) -> SinkResult<()> {
        if self.refuse_format {
            return Err(SinkError::new("format not accepted downstream"));
        }
        self.formats.push(*format);
        Ok(())
    }

    fn push_frame(&mut self, frame: EncodedFrame) -> SinkResult<()> {
        let index = self.pushes;
        self.pushes += 1;
        if self.fail_at == Some(index) {
            return Err(SinkError::new(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "downstream flushing",
            )));
        }
        self.frames.push(frame);
        Ok(())
    }
}

/// Interleaved ramp: sample `n` of the stream has value `start + n`
pub fn ramp(start: i32, frames: usize, channels: usize) -> Vec<i16> {
    (0..frames * channels)
        .map(|n| (start + n as i32) as i16)
        .collect()
}

/// Native-endian bytes of a ramp
pub fn ramp_bytes(start: i32, frames: usize, channels: usize) -> Vec<u8> {
    encode_samples(&ramp(start, frames, channels))
}
