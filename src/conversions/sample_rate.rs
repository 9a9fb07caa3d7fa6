//! Integer-ratio rate conversion of a timestamped sample stream.
//!
//! [`Resampler`] keeps the output on a regular grid anchored at the first buffer after each
//! discontinuity. Within such a segment the output is independent of how the input is split into
//! buffers.

use std::sync::Arc;

use crate::buffer::{BufferInfo, InputBuffer, OutputMeta};
use crate::common::{ClockTime, Offset};
use crate::config::{Conversion, ResampleConfig};
use crate::constants::NANOS_PER_SECOND;
use crate::conversions::Sample;
use crate::error::{ConfigError, TransformError};
use crate::math::{scale_ceil, scale_round};

mod decimate;
mod interpolate;
mod ring;
mod sinc;


use decimate::{Decimator, TickCursor};
use interpolate::Interpolator;
use sinc::{SincDecimator, SincTable};

/// Largest block of zeros run through a kernel at once while filling a gap.
const GAP_BLOCK: usize = 4096;

/// Kernel state for the configured conversion.
#[derive(Debug, Clone)]
enum Kernel<T: Sample> {
    Passthrough,
    Interpolate(Interpolator<T>),
    Decimate(Decimator<T>),
    Sinc(SincDecimator<T>),
}

impl<T: Sample> Kernel<T> {
    fn output_len(&self, input_len: usize) -> usize {
        match self {
            Kernel::Passthrough => input_len,
            Kernel::Interpolate(kernel) => kernel.output_len(input_len),
            Kernel::Decimate(kernel) => kernel.output_len(input_len),
            Kernel::Sinc(kernel) => kernel.output_len(input_len),
        }
    }

    fn process(&mut self, input: &[T], output: &mut [T]) {
        match self {
            Kernel::Passthrough => output.copy_from_slice(input),
            Kernel::Interpolate(kernel) => kernel.process(input, output),
            Kernel::Decimate(kernel) => kernel.process(input, output),
            Kernel::Sinc(kernel) => kernel.process(input, output),
        }
    }

    fn is_silent(&self) -> bool {
        match self {
            Kernel::Passthrough => true,
            Kernel::Interpolate(kernel) => kernel.is_silent(),
            Kernel::Decimate(kernel) => kernel.is_silent(),
            Kernel::Sinc(kernel) => kernel.is_silent(),
        }
    }

    fn skip_silence(&mut self, input_len: usize) {
        match self {
            Kernel::Passthrough => {}
            Kernel::Interpolate(kernel) => kernel.skip_silence(input_len),
            Kernel::Decimate(kernel) => kernel.skip_silence(input_len),
            Kernel::Sinc(kernel) => kernel.skip_silence(input_len),
        }
    }

    fn reset(&mut self, leading: usize) {
        match self {
            Kernel::Passthrough => {}
            Kernel::Interpolate(kernel) => kernel.reset(),
            Kernel::Decimate(kernel) => kernel.reset(leading),
            Kernel::Sinc(kernel) => kernel.reset(leading),
        }
    }
}

/// Converts a stream of `T` samples from one sample rate to an integer multiple or divisor of it.
///
/// The host drives the resampler one buffer at a time: it asks
/// [`predict_output_length`](Resampler::predict_output_length) how many samples the next buffer
/// will produce, allocates that much, and calls [`transform`](Resampler::transform).
///
/// A buffer that is flagged discontinuous, lacks a timestamp, or does not start where the previous
/// one ended starts a new segment. The filter history is dropped, the output grid is re-anchored
/// and the next produced buffer is flagged discontinuous.
///
/// # Example
///
/// ```rust
/// use ratestream::{nz, ElementType, InputBuffer, ResampleConfig, Resampler};
///
/// let config = ResampleConfig::new(nz!(16), nz!(4), ElementType::F64);
/// let mut resampler = Resampler::<f64>::new(config)?;
///
/// let samples = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
/// let input = InputBuffer::new(&samples, 0, Some(0));
/// let mut output = vec![0.0; resampler.predict_output_length(input.info())];
/// let meta = resampler.transform(&input, &mut output)?;
///
/// assert_eq!(output, [1.0, 5.0]);
/// assert_eq!(meta.timestamp, Some(0));
/// assert_eq!(meta.duration, Some(500_000_000));
/// assert!(meta.discont);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Resampler<T: Sample> {
    config: ResampleConfig,
    conversion: Conversion,
    /// Settings waiting for the next discontinuity.
    staged: Option<(ResampleConfig, Conversion)>,
    kernel: Kernel<T>,
    sinc_table: Option<Arc<SincTable<T>>>,

    /// Time of the output sample at `offset0`, if the input carries timestamps.
    t0: Option<ClockTime>,
    offset0: Offset,
    next_in_offset: Option<Offset>,
    next_out_offset: Offset,
    need_discont: bool,

    /// Zeros fed to a kernel whose history is not silent when a gap arrives.
    zeros: Vec<T>,
}

impl<T: Sample> Resampler<T> {
    /// Creates a resampler for `config`.
    ///
    /// Fails if the configuration is invalid or its element type is not `T`.
    pub fn new(config: ResampleConfig) -> Result<Self, ConfigError> {
        let conversion = Self::validate(&config)?;
        let mut resampler = Self {
            config,
            conversion,
            staged: None,
            kernel: Kernel::Passthrough,
            sinc_table: None,
            t0: None,
            offset0: 0,
            next_in_offset: None,
            next_out_offset: 0,
            need_discont: true,
            zeros: Vec::new(),
        };
        resampler.rebuild_kernel();
        resampler.log_configuration();
        Ok(resampler)
    }

    /// Replaces the configuration. The next buffer starts a new segment.
    ///
    /// On error the previous configuration stays in effect.
    pub fn configure(&mut self, config: ResampleConfig) -> Result<(), ConfigError> {
        let conversion = Self::validate(&config)?;
        self.config = config;
        self.conversion = conversion;
        self.staged = None;
        self.rebuild_kernel();
        self.reset();
        self.log_configuration();
        Ok(())
    }

    fn validate(config: &ResampleConfig) -> Result<Conversion, ConfigError> {
        if config.element_type() != T::ELEMENT_TYPE {
            return Err(ConfigError::ElementMismatch {
                expected: T::ELEMENT_TYPE,
                requested: config.element_type(),
            });
        }
        config.conversion()
    }

    fn log_configuration(&self) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "configured {} -> {} Hz {} resampler: {:?}",
            self.config.rate_in(),
            self.config.rate_out(),
            T::ELEMENT_TYPE,
            self.conversion
        );
    }

    /// The configuration in effect.
    #[inline]
    pub fn config(&self) -> &ResampleConfig {
        &self.config
    }

    /// The conversion in effect.
    #[inline]
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Forgets all history. The next buffer starts a new segment.
    pub fn reset(&mut self) {
        self.t0 = None;
        self.offset0 = 0;
        self.next_in_offset = None;
        self.next_out_offset = 0;
        self.need_discont = true;
        self.kernel.reset(0);
    }

    /// Stages a new quality level, applied at the next discontinuity.
    ///
    /// Fails without staging anything if the level has no kernel for the configured direction.
    pub fn set_quality(&mut self, quality: u32) -> Result<(), ConfigError> {
        let config = self.staged_config().clone().quality(quality);
        let conversion = config.conversion()?;
        #[cfg(feature = "tracing")]
        tracing::debug!("staged quality {quality}, effective at the next discontinuity");
        self.staged = Some((config, conversion));
        Ok(())
    }

    /// Stages zero-latency reporting for sinc decimation, applied at the next discontinuity.
    pub fn set_zero_latency(&mut self, zero_latency: bool) {
        let config = self.staged_config().clone().zero_latency(zero_latency);
        let mut conversion = self.staged_conversion();
        if let Conversion::Downsample {
            zero_latency: staged,
            ..
        } = &mut conversion
        {
            *staged = zero_latency;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("staged zero latency {zero_latency}, effective at the next discontinuity");
        self.staged = Some((config, conversion));
    }

    fn staged_config(&self) -> &ResampleConfig {
        self.staged.as_ref().map_or(&self.config, |(config, _)| config)
    }

    fn staged_conversion(&self) -> Conversion {
        self.staged.as_ref().map_or(self.conversion, |&(_, conversion)| conversion)
    }

    /// Input samples needed to produce `output_len` samples in steady state.
    pub fn required_input_length(&self, output_len: usize) -> usize {
        match self.conversion {
            Conversion::Passthrough => output_len,
            Conversion::Upsample { cadence, .. } => output_len / cadence,
            Conversion::Downsample { inv_cadence, .. } => output_len * inv_cadence,
        }
    }

    /// Number of samples the next [`transform`](Resampler::transform) of a buffer described by
    /// `info` will produce.
    pub fn predict_output_length(&self, info: &BufferInfo) -> usize {
        if !self.is_discont(info) {
            return self.kernel.output_len(info.len);
        }

        let conversion = self.staged_conversion();
        match conversion {
            Conversion::Passthrough => info.len,
            Conversion::Upsample {
                cadence,
                interpolation,
            } => Interpolator::<T>::predict(cadence, interpolation, 0, info.len),
            Conversion::Downsample {
                inv_cadence,
                decimation,
                ..
            } => {
                let leading = self.leading_samples(inv_cadence, info);
                TickCursor::for_decimation(inv_cadence, decimation, leading).count(info.len)
            }
        }
    }

    /// Resamples one buffer into `output`, which must hold at least
    /// [`predict_output_length`](Resampler::predict_output_length) samples.
    ///
    /// Returns the metadata of the produced samples, which fill the front of `output`. On error
    /// nothing is consumed and the resampler is left as it was.
    pub fn transform(
        &mut self,
        input: &InputBuffer<'_, T>,
        output: &mut [T],
    ) -> Result<OutputMeta, TransformError> {
        let info = *input.info();
        if !info.gap && input.samples().len() != info.len {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "rejected input at offset {}: {} samples declared, {} provided",
                info.offset,
                info.len,
                input.samples().len()
            );
            return Err(TransformError::InputLength {
                declared: info.len,
                provided: input.samples().len(),
            });
        }

        let expected = self.predict_output_length(&info);
        if output.len() < expected {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "rejected input at offset {}: output holds {} samples, {expected} needed",
                info.offset,
                output.len()
            );
            return Err(TransformError::OutputLength {
                expected,
                provided: output.len(),
            });
        }

        if self.is_discont(&info) {
            self.resync(&info);
        }
        self.next_in_offset = Some(info.offset_end());
        debug_assert_eq!(self.kernel.output_len(info.len), expected);

        let output = &mut output[..expected];
        let loud = if info.gap {
            self.fill_gap(info.len, output)
        } else {
            self.kernel.process(input.samples(), output);
            expected
        };

        Ok(self.stamp(expected, info.gap, loud))
    }

    /// Splits `meta`, as just returned by [`transform`](Resampler::transform), at its
    /// [`gap_start`](OutputMeta::gap_start).
    ///
    /// Returns `None` unless the buffer holds both samples and gap silence. The head keeps the
    /// `discont` flag and the tail is flagged `gap`. Timestamps are computed on the current output
    /// grid, so call this before the next buffer re-anchors it.
    pub fn split_gap(&self, meta: &OutputMeta) -> Option<(OutputMeta, OutputMeta)> {
        let at = meta.gap_start;
        if at <= meta.offset || at >= meta.offset_end {
            return None;
        }
        let head = OutputMeta {
            offset_end: at,
            duration: self.duration_of(meta.offset, at),
            gap: false,
            ..*meta
        };
        let tail = OutputMeta {
            offset: at,
            timestamp: self.time_of(at),
            duration: self.duration_of(at, meta.offset_end),
            discont: false,
            gap: true,
            ..*meta
        };
        Some((head, tail))
    }

    fn is_discont(&self, info: &BufferInfo) -> bool {
        info.discont
            || info.timestamp.is_none()
            || self.t0.is_none()
            || self.next_in_offset != Some(info.offset)
    }

    /// Input samples to drop so that the first output lands on the output grid.
    fn leading_samples(&self, inv_cadence: usize, info: &BufferInfo) -> usize {
        let rate_in = u64::from(self.config.rate_in().get());
        let position = match info.timestamp {
            Some(timestamp) => scale_round(timestamp, rate_in, NANOS_PER_SECOND),
            None => info.offset,
        };
        let inv_cadence = inv_cadence as u64;
        ((inv_cadence - position % inv_cadence) % inv_cadence) as usize
    }

    /// Rounds an input timestamp onto the output grid.
    fn align_timestamp(&self, timestamp: ClockTime) -> ClockTime {
        let rate_in = u64::from(self.config.rate_in().get());
        let rate_out = u64::from(self.config.rate_out().get());
        let to_time = |ticks| scale_round(ticks, NANOS_PER_SECOND, rate_out);
        let nearest = to_time(scale_round(timestamp, rate_out, NANOS_PER_SECOND));

        match self.conversion {
            Conversion::Downsample { .. }
                if timestamp.abs_diff(nearest) >= NANOS_PER_SECOND / 2 / rate_in =>
            {
                to_time(scale_ceil(timestamp, rate_out, NANOS_PER_SECOND))
            }
            _ => nearest,
        }
    }

    /// Output periods between the start of a segment and its first reported sample.
    fn output_delay(&self) -> Offset {
        match self.conversion {
            Conversion::Downsample {
                decimation,
                zero_latency,
                ..
            } => match decimation.sinc_length() {
                Some(length) if zero_latency => (length / 2) as Offset,
                Some(length) => length as Offset,
                None => 0,
            },
            _ => 0,
        }
    }

    /// Starts a new segment at the buffer described by `info`.
    fn resync(&mut self, info: &BufferInfo) {
        if let Some((config, conversion)) = self.staged.take() {
            let rebuild = conversion != self.conversion;
            self.config = config;
            self.conversion = conversion;
            if rebuild {
                self.rebuild_kernel();
            }
        }

        let rate_in = u64::from(self.config.rate_in().get());
        let rate_out = u64::from(self.config.rate_out().get());
        self.t0 = info.timestamp.map(|timestamp| self.align_timestamp(timestamp));
        self.offset0 = scale_ceil(info.offset, rate_out, rate_in);
        self.next_out_offset = self.offset0 + self.output_delay();
        self.need_discont = true;

        let leading = match self.conversion {
            Conversion::Downsample { inv_cadence, .. } => self.leading_samples(inv_cadence, info),
            _ => 0,
        };
        self.kernel.reset(leading);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "discontinuity at offset {}: t0 {:?}, output offset {}, {leading} leading samples",
            info.offset,
            self.t0,
            self.next_out_offset
        );
    }

    fn rebuild_kernel(&mut self) {
        self.kernel = match self.conversion {
            Conversion::Passthrough => Kernel::Passthrough,
            Conversion::Upsample {
                cadence,
                interpolation,
            } => Kernel::Interpolate(Interpolator::new(cadence, interpolation)),
            Conversion::Downsample {
                inv_cadence,
                decimation,
                ..
            } => match decimation.sinc_length() {
                Some(length) => {
                    let table = self.sinc_table(inv_cadence, length);
                    Kernel::Sinc(SincDecimator::new(table, 0))
                }
                None => Kernel::Decimate(Decimator::new(inv_cadence, decimation, 0)),
            },
        };
    }

    fn sinc_table(&mut self, inv_cadence: usize, length: usize) -> Arc<SincTable<T>> {
        match &self.sinc_table {
            Some(table) if table.matches(inv_cadence, length) => table.clone(),
            _ => {
                let table = Arc::new(SincTable::new(inv_cadence, length));
                self.sinc_table = Some(table.clone());
                table
            }
        }
    }

    /// Runs `len` implicit zeros through the kernel. Returns the length of the output up to its
    /// last non-zero sample.
    fn fill_gap(&mut self, len: usize, output: &mut [T]) -> usize {
        let mut remaining = len;
        let mut produced = 0;
        let mut loud = 0;
        while remaining > 0 {
            if self.kernel.is_silent() {
                output[produced..].fill(T::zero());
                self.kernel.skip_silence(remaining);
                break;
            }

            let block = remaining.min(GAP_BLOCK);
            if self.zeros.len() < block {
                self.zeros.resize(block, T::zero());
            }
            let block_len = self.kernel.output_len(block);
            let out = &mut output[produced..produced + block_len];
            self.kernel.process(&self.zeros[..block], out);
            if let Some(last) = out.iter().rposition(|sample| !sample.is_zero()) {
                loud = produced + last + 1;
            }
            produced += block_len;
            remaining -= block;
        }
        loud
    }

    /// Time of the output sample at `offset` on the current grid.
    fn time_of(&self, offset: Offset) -> Option<ClockTime> {
        let rate_out = u64::from(self.config.rate_out().get());
        self.t0
            .map(|t0| t0 + scale_round(offset - self.offset0, NANOS_PER_SECOND, rate_out))
    }

    fn duration_of(&self, offset: Offset, offset_end: Offset) -> Option<ClockTime> {
        Some(self.time_of(offset_end)? - self.time_of(offset)?)
    }

    /// Stamps `len` output samples. With `gap` set, those from `loud` on are gap silence.
    fn stamp(&mut self, len: usize, gap: bool, loud: usize) -> OutputMeta {
        let offset = self.next_out_offset;
        let offset_end = offset + len as Offset;
        self.next_out_offset = offset_end;

        // An empty buffer leaves the flag armed for the first one carrying samples.
        let discont = self.need_discont && len > 0;
        if discont {
            self.need_discont = false;
        }

        OutputMeta {
            offset,
            offset_end,
            timestamp: self.time_of(offset),
            duration: self.duration_of(offset, offset_end),
            discont,
            gap: gap && loud == 0,
            gap_start: if gap { offset + loud as Offset } else { offset_end },
        }
    }
}
