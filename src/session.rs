//! Live encoder session
//!
//! A session owns one engine together with the parameters derived when it
//! was configured. It slices raw input buffers into whole passes and hands
//! each pass to the engine; samples left over after the last whole pass are
//! not passed to the engine in that call.

use log::debug;

use crate::config::EncoderConfiguration;
use crate::engine::{EncodingEngine, EngineFactory};
use crate::error::{AdapterError, ConfigResult, ConfigurationError, EngineError, Result};
use crate::format::{FrameSamples, Negotiated, OutputFormat};
use crate::pcm_utils::{count_sample_frames, decode_samples, BYTES_PER_SAMPLE};
use crate::sink::{EncodedFrame, FrameSink};

/// Accounting for one `encode_buffer` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Engine calls made
    pub passes: usize,
    /// Frames handed to the sink
    pub frames: usize,
    /// Compressed bytes handed to the sink
    pub bytes_out: usize,
    /// Sample frames (per channel) not passed to the engine
    pub remainder: usize,
}

/// One configured engine and its derived parameters
pub struct EncoderSession<E: EncodingEngine> {
    engine: E,
    config: EncoderConfiguration,
    output: OutputFormat,
    samples_per_pass: usize,
    /// Decoded samples for the pass in flight
    pass_buffer: Vec<i16>,
    /// Set once the final frame has been drained downstream
    finished: bool,
}

impl<E: EncodingEngine> EncoderSession<E> {
    /// Create the engine for a derived configuration
    pub fn open<F>(factory: &mut F, config: EncoderConfiguration) -> ConfigResult<Self>
    where
        F: EngineFactory<Engine = E> + ?Sized,
    {
        let engine = factory
            .initialize(&config)
            .map_err(ConfigurationError::EngineInitFailed)?;

        let samples_per_pass = engine.samples_per_pass();
        if samples_per_pass == 0 {
            // engine is dropped here, before the error is returned
            return Err(ConfigurationError::EngineInitFailed(EngineError::Init(
                "engine reported zero samples per pass".to_string(),
            )));
        }

        let output = OutputFormat::for_config(&config, config.mpeg_version);
        let pass_len = samples_per_pass * config.channels.count();

        Ok(Self {
            engine,
            config,
            output,
            samples_per_pass,
            pass_buffer: vec![0; pass_len],
            finished: false,
        })
    }

    pub fn config(&self) -> &EncoderConfiguration {
        &self.config
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output
    }

    /// Samples per channel consumed by each pass
    pub fn samples_per_pass(&self) -> usize {
        self.samples_per_pass
    }

    pub fn frame_samples(&self) -> FrameSamples {
        FrameSamples::exactly(self.samples_per_pass)
    }

    pub fn negotiated(&self) -> Negotiated {
        Negotiated {
            output: self.output,
            frame_samples: self.frame_samples(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Whether end of stream has been drained downstream
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Encode every whole pass contained in `data`
    ///
    /// Frames are pushed to the sink as soon as the engine produces them.
    /// The first engine or sink error stops the loop. A finished session
    /// accepts no more data.
    pub fn encode_buffer<S>(&mut self, data: &[u8], sink: &mut S) -> Result<PassStats>
    where
        S: FrameSink + ?Sized,
    {
        if self.finished {
            return Err(AdapterError::Finished);
        }

        let channels = self.config.channels.count();
        let available = count_sample_frames(data, channels)?;
        let pass_bytes = self.samples_per_pass * channels * BYTES_PER_SAMPLE;

        let mut stats = PassStats {
            remainder: available % self.samples_per_pass,
            ..PassStats::default()
        };

        for pass in data.chunks_exact(pass_bytes) {
            decode_samples(pass, &mut self.pass_buffer);
            let encoded = self.engine.encode(&self.pass_buffer)?;
            stats.passes += 1;

            if !encoded.is_empty() {
                let frame = EncodedFrame {
                    data: encoded.to_vec(),
                    format: self.output,
                    terminal: false,
                };
                let len = frame.len();
                sink.push_frame(frame)?;
                stats.frames += 1;
                stats.bytes_out += len;
            }
        }

        Ok(stats)
    }

    /// Drain the engine's partial frame
    ///
    /// With `push` set and a non-empty drain, one terminal frame is sent to
    /// the sink. A pushing drain finishes the session; any drain after that
    /// is a no-op. Returns the number of bytes pushed.
    pub fn drain<S>(&mut self, push: bool, sink: &mut S) -> Result<usize>
    where
        S: FrameSink + ?Sized,
    {
        if self.finished {
            debug!("stream already finished (push={})", push);
            return Ok(0);
        }

        let drained = self.engine.flush()?;
        if push {
            self.finished = true;
        }

        if drained.is_empty() || !push {
            debug!("no final packet (size={}, push={})", drained.len(), push);
            return Ok(0);
        }

        debug!("collecting final {} bytes", drained.len());
        let frame = EncodedFrame {
            data: drained.to_vec(),
            format: self.output,
            terminal: true,
        };
        let len = frame.len();
        sink.push_frame(frame)?;
        Ok(len)
    }
}
