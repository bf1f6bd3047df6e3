//! Streaming MP3 encoder
//!
//! [`Mp3Encoder`] sits between a host that delivers raw PCM in buffers of
//! arbitrary length and an engine that only accepts whole passes. Every
//! complete pass in a buffer goes to the engine in input order and every
//! non-empty result is pushed downstream straight away. End of stream
//! drains the engine once and pushes what it returns as the terminal frame.

use log::{debug, error, info, trace};

use crate::audio_encoder::{AudioEncoder, Input};
use crate::config::{EncoderConfiguration, EncoderProperties, InputFormat};
use crate::engine::EngineFactory;
use crate::error::{AdapterError, ConfigResult, Result};
use crate::format::{FrameSamples, Negotiated, OutputFormat};
use crate::pcm_utils::encode_samples;
use crate::session::{EncoderSession, PassStats};
use crate::sink::{EncodedFrame, FrameSink};

/// Streaming adapter owning an engine factory, a sink and at most one session
pub struct Mp3Encoder<F: EngineFactory, S: FrameSink> {
    factory: F,
    sink: S,
    properties: EncoderProperties,
    session: Option<EncoderSession<F::Engine>>,
}

impl<F: EngineFactory, S: FrameSink> Mp3Encoder<F, S> {
    /// Create an unconfigured encoder with default properties
    pub fn new(factory: F, sink: S) -> Self {
        Self::with_properties(factory, sink, EncoderProperties::default())
    }

    pub fn with_properties(factory: F, sink: S, properties: EncoderProperties) -> Self {
        Self {
            factory,
            sink,
            properties,
            session: None,
        }
    }

    /// Current properties (applied at the next configuration)
    pub fn properties(&self) -> &EncoderProperties {
        &self.properties
    }

    /// Replace the properties, checking the bitrate range
    pub fn set_properties(&mut self, properties: EncoderProperties) -> ConfigResult<()> {
        properties.validate()?;
        self.properties = properties;
        Ok(())
    }

    /// Set a property by name from its textual form
    pub fn set_property(&mut self, name: &str, value: &str) -> ConfigResult<()> {
        self.properties.set_property(name, value)
    }

    /// Read a property by name in its textual form
    pub fn property(&self, name: &str) -> ConfigResult<String> {
        self.properties.property(name)
    }

    pub fn is_configured(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the live session has already drained its final frame
    pub fn is_finished(&self) -> bool {
        self.session.as_ref().is_some_and(EncoderSession::is_finished)
    }

    /// Configuration of the live session
    pub fn configuration(&self) -> Option<&EncoderConfiguration> {
        self.session.as_ref().map(EncoderSession::config)
    }

    pub fn output_format(&self) -> Option<&OutputFormat> {
        self.session.as_ref().map(EncoderSession::output_format)
    }

    pub fn samples_per_pass(&self) -> Option<usize> {
        self.session.as_ref().map(EncoderSession::samples_per_pass)
    }

    /// Chunk size requested from the host
    pub fn frame_samples(&self) -> Option<FrameSamples> {
        self.session.as_ref().map(EncoderSession::frame_samples)
    }

    pub fn session(&self) -> Option<&EncoderSession<F::Engine>> {
        self.session.as_ref()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Release any session and hand back the sink
    pub fn into_sink(mut self) -> S {
        self.release_session();
        self.sink
    }

    fn release_session(&mut self) {
        if self.session.take().is_some() {
            debug!("released encoder session");
        }
    }

    fn setup(&mut self, format: &InputFormat) -> Result<Negotiated> {
        debug!("starting setup");

        let config = EncoderConfiguration::derive(format, &self.properties, &self.factory)?;
        let session = EncoderSession::open(&mut self.factory, config)?;
        let negotiated = session.negotiated();

        self.sink.set_output_format(&negotiated.output)?;

        info!(
            "shine encoder setup ({} kbit/s, {} Hz, {} channels, {})",
            config.bitrate_kbps,
            config.sample_rate,
            config.channels.count(),
            config.mode.name(),
        );
        self.session = Some(session);

        debug!("done with setup");
        Ok(negotiated)
    }

    fn encode_buffer(&mut self, data: &[u8]) -> Result<()> {
        let session = self.session.as_mut().ok_or(AdapterError::NotConfigured)?;

        match session.encode_buffer(data, &mut self.sink) {
            Ok(PassStats { passes, bytes_out, remainder, .. }) => {
                trace!(
                    "encoded {} bytes of audio to {} bytes of mp3 ({} passes, {} samples left)",
                    data.len(),
                    bytes_out,
                    passes,
                    remainder
                );
                Ok(())
            }
            Err(AdapterError::Engine(err)) => {
                error!("engine failed while encoding: {}", err);
                self.release_session();
                Err(AdapterError::Engine(err))
            }
            Err(err) => Err(err),
        }
    }

    fn flush_full(&mut self, push: bool) -> Result<()> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        match session.drain(push, &mut self.sink) {
            Ok(_) => Ok(()),
            Err(AdapterError::Engine(err)) => {
                error!("engine failed while flushing: {}", err);
                self.release_session();
                Err(AdapterError::Engine(err))
            }
            Err(err) => Err(err),
        }
    }
}

impl<F: EngineFactory, S: FrameSink> AudioEncoder for Mp3Encoder<F, S> {
    fn start(&mut self) -> Result<()> {
        debug!("start");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        debug!("stop");
        self.teardown()
    }

    fn configure(&mut self, format: &InputFormat) -> Result<Negotiated> {
        // a new format always replaces the old session, even if setup fails
        self.release_session();

        debug!("setting up shine");
        self.setup(format).map_err(|err| {
            error!("Failed to configure shine encoder: {}", err);
            err
        })
    }

    fn process(&mut self, input: Input<'_>) -> Result<()> {
        match input {
            Input::EndOfStream => self.flush_full(true),
            Input::Buffer(data) => self.encode_buffer(data),
        }
    }

    fn flush(&mut self, push: bool) -> Result<()> {
        self.flush_full(push)
    }

    fn teardown(&mut self) -> Result<()> {
        self.release_session();
        Ok(())
    }
}

/// Encode a complete interleaved PCM signal in one go
///
/// Configures a fresh encoder, feeds `pcm` as a single buffer, signals end
/// of stream and returns the concatenated frames. A trailing partial pass is
/// completed with silence so every input sample is encoded.
pub fn encode_pcm_to_mp3<F: EngineFactory>(
    factory: F,
    format: &InputFormat,
    properties: EncoderProperties,
    pcm: &[i16],
) -> Result<Vec<u8>> {
    let frames: Vec<EncodedFrame> = Vec::new();
    let mut encoder = Mp3Encoder::with_properties(factory, frames, properties);
    encoder.start()?;
    let negotiated = encoder.configure(format)?;

    let pass_len = negotiated.frame_samples.max * format.channels as usize;
    let mut samples = pcm.to_vec();
    let partial = samples.len() % pass_len;
    if partial != 0 {
        samples.resize(samples.len() + pass_len - partial, 0);
    }

    encoder.process(Input::Buffer(&encode_samples(&samples)))?;
    encoder.process(Input::EndOfStream)?;
    encoder.stop()?;

    let mp3 = encoder
        .into_sink()
        .into_iter()
        .flat_map(|frame| frame.data)
        .collect();
    Ok(mp3)
}
