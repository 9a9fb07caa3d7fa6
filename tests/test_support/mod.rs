#![allow(dead_code)]
/// in separate folder so its not ran as integration test
use ratestream::math::scale_round;
use ratestream::{
    ElementType, InputBuffer, OutputMeta, ResampleConfig, Resampler, Sample, SampleRate,
};

pub const NANOS: u64 = 1_000_000_000;

/// Timestamp of `offset` in a stream starting at time 0.
pub fn timestamp(offset: u64, rate: u32) -> u64 {
    scale_round(offset, NANOS, u64::from(rate))
}

pub fn config(rate_in: u32, rate_out: u32, element_type: ElementType) -> ResampleConfig {
    ResampleConfig::new(
        SampleRate::new(rate_in).unwrap(),
        SampleRate::new(rate_out).unwrap(),
        element_type,
    )
}

/// A resampler fed with contiguous, timestamped buffers.
pub struct TestStream<T: Sample> {
    pub resampler: Resampler<T>,
    pub offset: u64,
    rate_in: u32,
}

impl<T: Sample> TestStream<T> {
    pub fn new(config: ResampleConfig) -> Self {
        let rate_in = config.rate_in().get();
        Self {
            resampler: Resampler::new(config).unwrap(),
            offset: 0,
            rate_in,
        }
    }

    /// Starts the stream at `offset` instead of 0.
    pub fn starting_at(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn push(&mut self, samples: &[T]) -> (Vec<T>, OutputMeta) {
        let timestamp = timestamp(self.offset, self.rate_in);
        self.transform(InputBuffer::new(samples, self.offset, Some(timestamp)))
    }

    pub fn push_gap(&mut self, len: usize) -> (Vec<T>, OutputMeta) {
        let timestamp = timestamp(self.offset, self.rate_in);
        self.transform(InputBuffer::gap(len, self.offset, Some(timestamp)))
    }

    /// Feeds `samples` in chunks of `chunk` and concatenates the output.
    pub fn push_chunked(&mut self, samples: &[T], chunk: usize) -> (Vec<T>, Vec<OutputMeta>) {
        let mut out = Vec::new();
        let mut metas = Vec::new();
        for chunk in samples.chunks(chunk.max(1)) {
            let (samples, meta) = self.push(chunk);
            out.extend(samples);
            metas.push(meta);
        }
        (out, metas)
    }

    fn transform(&mut self, buffer: InputBuffer<'_, T>) -> (Vec<T>, OutputMeta) {
        let mut out = vec![T::zero(); self.resampler.predict_output_length(buffer.info())];
        let meta = self.resampler.transform(&buffer, &mut out).unwrap();
        assert_eq!(meta.len(), out.len());
        self.offset = buffer.info().offset_end();
        (out, meta)
    }
}

/// A sine with `period` samples per cycle.
pub fn sine(len: usize, period: f64) -> Vec<f64> {
    (0..len)
        .map(|i| (2.0 * std::f64::consts::PI * i as f64 / period).sin())
        .collect()
}
