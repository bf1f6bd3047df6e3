//! Benchmark tests for the streaming adapter
//!
//! These benchmarks measure the chunking loop and configuration path with
//! an engine that does no real work, so the numbers reflect adapter cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shine_stream::config::EncoderConfiguration;
use shine_stream::error::{EngineResult, SinkResult};
use shine_stream::pcm_utils::encode_samples;
use shine_stream::{
    tables, AudioEncoder, EncodedFrame, EncoderProperties, EncodingEngine, EngineFactory,
    FrameSink, Input, InputFormat, Mp3Encoder, OutputFormat,
};

struct NullFactory;

struct NullEngine {
    samples_per_pass: usize,
    frame: Vec<u8>,
}

impl EngineFactory for NullFactory {
    type Engine = NullEngine;

    fn initialize(&mut self, config: &EncoderConfiguration) -> EngineResult<NullEngine> {
        Ok(NullEngine {
            samples_per_pass: tables::samples_per_pass(config.mpeg_version),
            frame: vec![0xff; 417],
        })
    }
}

impl EncodingEngine for NullEngine {
    fn samples_per_pass(&self) -> usize {
        self.samples_per_pass
    }

    fn encode(&mut self, pcm: &[i16]) -> EngineResult<&[u8]> {
        self.frame[2] = pcm[0] as u8;
        Ok(self.frame.as_slice())
    }

    fn flush(&mut self) -> EngineResult<&[u8]> {
        Ok(&[])
    }
}

/// Sink that counts and discards frames
#[derive(Default)]
struct CountingSink(usize);

impl FrameSink for CountingSink {
    fn set_output_format(&mut self, _format: &OutputFormat) -> SinkResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, frame: EncodedFrame) -> SinkResult<()> {
        self.0 += black_box(frame).len();
        Ok(())
    }
}

fn benchmark_configuration(c: &mut Criterion) {
    let mut encoder = Mp3Encoder::new(NullFactory, CountingSink::default());
    let format = InputFormat::new(44100, 2);

    c.bench_function("configure", |b| {
        b.iter(|| {
            black_box(encoder.configure(black_box(&format))).unwrap();
        })
    });
}

fn benchmark_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("process");

    // one second of stereo audio, split into host buffers of various sizes
    let pcm: Vec<i16> = (0..44100 * 2).map(|n| (n % 32768) as i16).collect();
    let bytes = encode_samples(&pcm);

    for buffer_frames in [1152usize, 4096, 44100] {
        let buffer_bytes = buffer_frames * 4;
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(buffer_frames),
            &buffer_bytes,
            |b, &buffer_bytes| {
                let mut encoder = Mp3Encoder::with_properties(
                    NullFactory,
                    CountingSink::default(),
                    EncoderProperties::default(),
                );
                encoder.configure(&InputFormat::new(44100, 2)).unwrap();

                b.iter(|| {
                    for chunk in bytes.chunks(buffer_bytes) {
                        encoder.process(Input::Buffer(black_box(chunk))).unwrap();
                    }
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark_configuration, benchmark_chunking);
criterion_main!(benches);
