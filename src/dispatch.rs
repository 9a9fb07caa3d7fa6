//! Runtime selection of the element type.

use num_complex::{Complex32, Complex64};

use crate::buffer::{BufferInfo, InputBuffer, OutputMeta};
use crate::config::{Conversion, ResampleConfig};
use crate::conversions::{ElementType, Resampler};
use crate::error::{ConfigError, TransformError};

/// Borrowed samples of any supported element type.
#[derive(Debug, Clone, Copy)]
pub enum SampleSlice<'a> {
    /// 32-bit float samples
    F32(&'a [f32]),
    /// 64-bit float samples
    F64(&'a [f64]),
    /// Complex samples made of two 32-bit floats
    Z64(&'a [Complex32]),
    /// Complex samples made of two 64-bit floats
    Z128(&'a [Complex64]),
}

/// Mutably borrowed samples of any supported element type.
#[derive(Debug)]
pub enum SampleSliceMut<'a> {
    /// 32-bit float samples
    F32(&'a mut [f32]),
    /// 64-bit float samples
    F64(&'a mut [f64]),
    /// Complex samples made of two 32-bit floats
    Z64(&'a mut [Complex32]),
    /// Complex samples made of two 64-bit floats
    Z128(&'a mut [Complex64]),
}

macro_rules! slice_conversions {
    ($($variant:ident => $ty:ty),*) => {
        $(
            impl<'a> From<&'a [$ty]> for SampleSlice<'a> {
                fn from(samples: &'a [$ty]) -> Self {
                    SampleSlice::$variant(samples)
                }
            }

            impl<'a> From<&'a mut [$ty]> for SampleSliceMut<'a> {
                fn from(samples: &'a mut [$ty]) -> Self {
                    SampleSliceMut::$variant(samples)
                }
            }
        )*
    };
}

slice_conversions!(F32 => f32, F64 => f64, Z64 => Complex32, Z128 => Complex64);

impl SampleSlice<'_> {
    /// Element type of the samples.
    pub fn element_type(&self) -> ElementType {
        match self {
            SampleSlice::F32(_) => ElementType::F32,
            SampleSlice::F64(_) => ElementType::F64,
            SampleSlice::Z64(_) => ElementType::Z64,
            SampleSlice::Z128(_) => ElementType::Z128,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            SampleSlice::F32(samples) => samples.len(),
            SampleSlice::F64(samples) => samples.len(),
            SampleSlice::Z64(samples) => samples.len(),
            SampleSlice::Z128(samples) => samples.len(),
        }
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SampleSliceMut<'_> {
    /// Element type of the samples.
    pub fn element_type(&self) -> ElementType {
        match self {
            SampleSliceMut::F32(_) => ElementType::F32,
            SampleSliceMut::F64(_) => ElementType::F64,
            SampleSliceMut::Z64(_) => ElementType::Z64,
            SampleSliceMut::Z128(_) => ElementType::Z128,
        }
    }
}

/// A [`Resampler`] whose element type is chosen by its configuration at runtime.
///
/// # Example
///
/// ```rust
/// use ratestream::{nz, AnyResampler, BufferInfo, ElementType, ResampleConfig, SampleSlice};
///
/// let config = ResampleConfig::new(nz!(2), nz!(4), ElementType::F64);
/// let mut resampler = AnyResampler::new(config)?;
///
/// let input = [1.0, 3.0];
/// let info = BufferInfo::new(input.len(), 0, Some(0));
/// let mut output = vec![0.0f64; resampler.predict_output_length(&info)];
/// resampler.transform(&info, SampleSlice::F64(&input), output.as_mut_slice().into())?;
/// assert_eq!(output, [1.0, 1.0, 3.0, 3.0]);
///
/// // Samples of the wrong type are rejected.
/// let wrong = [1.0f32];
/// let info = BufferInfo::new(1, 2, Some(1_000_000_000));
/// assert!(resampler.transform(&info, (&wrong[..]).into(), output.as_mut_slice().into()).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub enum AnyResampler {
    /// Resampler for 32-bit float streams
    F32(Resampler<f32>),
    /// Resampler for 64-bit float streams
    F64(Resampler<f64>),
    /// Resampler for complex streams of 32-bit floats
    Z64(Resampler<Complex32>),
    /// Resampler for complex streams of 64-bit floats
    Z128(Resampler<Complex64>),
}

macro_rules! dispatch {
    ($self:expr, $resampler:ident => $body:expr) => {
        match $self {
            AnyResampler::F32($resampler) => $body,
            AnyResampler::F64($resampler) => $body,
            AnyResampler::Z64($resampler) => $body,
            AnyResampler::Z128($resampler) => $body,
        }
    };
}

impl AnyResampler {
    /// Creates a resampler for the element type named by `config`.
    pub fn new(config: ResampleConfig) -> Result<Self, ConfigError> {
        Ok(match config.element_type() {
            ElementType::F32 => AnyResampler::F32(Resampler::new(config)?),
            ElementType::F64 => AnyResampler::F64(Resampler::new(config)?),
            ElementType::Z64 => AnyResampler::Z64(Resampler::new(config)?),
            ElementType::Z128 => AnyResampler::Z128(Resampler::new(config)?),
        })
    }

    /// Replaces the configuration, switching element type if it changed.
    ///
    /// On error the previous configuration stays in effect.
    pub fn configure(&mut self, config: ResampleConfig) -> Result<(), ConfigError> {
        if config.element_type() == self.element_type() {
            dispatch!(self, resampler => resampler.configure(config))
        } else {
            *self = Self::new(config)?;
            Ok(())
        }
    }

    /// Element type of the configured streams.
    pub fn element_type(&self) -> ElementType {
        match self {
            AnyResampler::F32(_) => ElementType::F32,
            AnyResampler::F64(_) => ElementType::F64,
            AnyResampler::Z64(_) => ElementType::Z64,
            AnyResampler::Z128(_) => ElementType::Z128,
        }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &ResampleConfig {
        dispatch!(self, resampler => resampler.config())
    }

    /// The conversion in effect.
    pub fn conversion(&self) -> Conversion {
        dispatch!(self, resampler => resampler.conversion())
    }

    /// See [`Resampler::reset`].
    pub fn reset(&mut self) {
        dispatch!(self, resampler => resampler.reset())
    }

    /// See [`Resampler::set_quality`].
    pub fn set_quality(&mut self, quality: u32) -> Result<(), ConfigError> {
        dispatch!(self, resampler => resampler.set_quality(quality))
    }

    /// See [`Resampler::set_zero_latency`].
    pub fn set_zero_latency(&mut self, zero_latency: bool) {
        dispatch!(self, resampler => resampler.set_zero_latency(zero_latency))
    }

    /// See [`Resampler::required_input_length`].
    pub fn required_input_length(&self, output_len: usize) -> usize {
        dispatch!(self, resampler => resampler.required_input_length(output_len))
    }

    /// See [`Resampler::predict_output_length`].
    pub fn predict_output_length(&self, info: &BufferInfo) -> usize {
        dispatch!(self, resampler => resampler.predict_output_length(info))
    }

    /// Resamples one buffer. Both slices must match the configured element type.
    ///
    /// See [`Resampler::transform`].
    pub fn transform(
        &mut self,
        info: &BufferInfo,
        input: SampleSlice<'_>,
        output: SampleSliceMut<'_>,
    ) -> Result<OutputMeta, TransformError> {
        let expected = self.element_type();
        for provided in [input.element_type(), output.element_type()] {
            if provided != expected {
                #[cfg(feature = "tracing")]
                tracing::warn!("rejected {provided} buffer passed to a {expected} resampler");
                return Err(TransformError::ElementType { expected, provided });
            }
        }

        match (self, input, output) {
            (
                AnyResampler::F32(resampler),
                SampleSlice::F32(input),
                SampleSliceMut::F32(output),
            ) => resampler.transform(&InputBuffer::from_parts(*info, input), output),
            (
                AnyResampler::F64(resampler),
                SampleSlice::F64(input),
                SampleSliceMut::F64(output),
            ) => resampler.transform(&InputBuffer::from_parts(*info, input), output),
            (
                AnyResampler::Z64(resampler),
                SampleSlice::Z64(input),
                SampleSliceMut::Z64(output),
            ) => resampler.transform(&InputBuffer::from_parts(*info, input), output),
            (
                AnyResampler::Z128(resampler),
                SampleSlice::Z128(input),
                SampleSliceMut::Z128(output),
            ) => resampler.transform(&InputBuffer::from_parts(*info, input), output),
            _ => unreachable!("element types were checked above"),
        }
    }

    /// See [`Resampler::split_gap`].
    pub fn split_gap(&self, meta: &OutputMeta) -> Option<(OutputMeta, OutputMeta)> {
        dispatch!(self, resampler => resampler.split_gap(meta))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nz;

    #[test]
    fn element_type_follows_config() {
        for element_type in [
            ElementType::F32,
            ElementType::F64,
            ElementType::Z64,
            ElementType::Z128,
        ] {
            let config = ResampleConfig::new(nz!(8), nz!(2), element_type);
            let resampler = AnyResampler::new(config).unwrap();
            assert_eq!(resampler.element_type(), element_type);
        }
    }

    #[test]
    fn configure_switches_element_type() {
        let mut resampler =
            AnyResampler::new(ResampleConfig::new(nz!(8), nz!(2), ElementType::F32)).unwrap();
        resampler
            .configure(ResampleConfig::new(nz!(2), nz!(8), ElementType::Z128).quality(3))
            .unwrap();
        assert_eq!(resampler.element_type(), ElementType::Z128);
        assert_eq!(resampler.required_input_length(16), 4);

        let bad = ResampleConfig::new(nz!(3), nz!(8), ElementType::F64);
        assert!(resampler.configure(bad).is_err());
        assert_eq!(resampler.element_type(), ElementType::Z128);
    }

    #[test]
    fn complex_samples_are_interpolated() {
        let config = ResampleConfig::new(nz!(1), nz!(2), ElementType::Z64).quality(1);
        let mut resampler = AnyResampler::new(config).unwrap();
        let input = [Complex32::new(0.0, 2.0), Complex32::new(2.0, 0.0)];
        let info = BufferInfo::new(2, 0, Some(0));
        let mut output = vec![Complex32::new(9.0, 9.0); 2];
        let meta = resampler
            .transform(&info, (&input[..]).into(), output.as_mut_slice().into())
            .unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(output, [Complex32::new(0.0, 2.0), Complex32::new(1.0, 1.0)]);
    }

    #[test]
    fn mismatched_output_is_rejected() {
        let config = ResampleConfig::new(nz!(2), nz!(1), ElementType::F64);
        let mut resampler = AnyResampler::new(config).unwrap();
        let input = [1.0f64, 2.0];
        let mut output = [0.0f32; 1];
        let info = BufferInfo::new(2, 0, Some(0));
        assert_eq!(
            resampler.transform(&info, (&input[..]).into(), (&mut output[..]).into()),
            Err(TransformError::ElementType {
                expected: ElementType::F64,
                provided: ElementType::F32
            })
        );
    }
}
