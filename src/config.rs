//! Configuration types and builders for rate conversion.

use std::fmt;

use num_rational::Ratio;

use crate::common::SampleRate;
use crate::constants::{LONG_SINC_LENGTH, MAX_QUALITY, SHORT_SINC_LENGTH};
use crate::conversions::ElementType;
use crate::error::ConfigError;

/// Which way a configured conversion changes the sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Input and output rates are equal.
    Passthrough,
    /// The output rate is an integer multiple of the input rate.
    Upsampling,
    /// The input rate is an integer multiple of the output rate.
    Downsampling,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Passthrough => "passing through",
            Direction::Upsampling => "upsampling",
            Direction::Downsampling => "downsampling",
        };
        f.write_str(name)
    }
}

/// Interpolation used when upsampling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Quality 0: every input sample is repeated.
    #[default]
    Hold,

    /// Quality 1: straight lines between consecutive input samples.
    Linear,

    /// Quality 2: quadratic spline.
    ///
    /// Each segment starts with the centered-difference slope of its left knot. At the start of a
    /// stream the slope is assumed to be zero.
    Quadratic,

    /// Quality 3: cubic spline.
    ///
    /// The slope is continuous across knots. A segment is drawn once the sample after its right
    /// knot is known, so the output lags the input by one more sample than the other orders.
    Cubic,
}

impl Interpolation {
    /// Maps a quality level to an interpolation order.
    pub fn from_quality(quality: u32) -> Option<Self> {
        match quality {
            0 => Some(Interpolation::Hold),
            1 => Some(Interpolation::Linear),
            2 => Some(Interpolation::Quadratic),
            3 => Some(Interpolation::Cubic),
            _ => None,
        }
    }

    /// The quality level selecting this interpolation.
    pub fn quality(self) -> u32 {
        self as u32
    }
}

/// Anti-aliasing used when downsampling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Decimation {
    /// Quality 0: every n-th input sample is kept.
    #[default]
    Pick,

    /// Quality 1: average of the input samples centered on each output tick.
    ///
    /// With an even inverse cadence the window has one extra sample and both end samples count
    /// half, which is a Tukey window.
    Tukey,

    /// Quality 2: windowed sinc spanning [`SHORT_SINC_LENGTH`] output periods.
    ShortSinc,

    /// Quality 3: windowed sinc spanning [`LONG_SINC_LENGTH`] output periods.
    LongSinc,
}

impl Decimation {
    /// Maps a quality level to a decimation filter.
    pub fn from_quality(quality: u32) -> Option<Self> {
        match quality {
            0 => Some(Decimation::Pick),
            1 => Some(Decimation::Tukey),
            2 => Some(Decimation::ShortSinc),
            3 => Some(Decimation::LongSinc),
            _ => None,
        }
    }

    /// The quality level selecting this filter.
    pub fn quality(self) -> u32 {
        self as u32
    }

    /// Filter length in output periods, for the sinc filters.
    pub fn sinc_length(self) -> Option<usize> {
        match self {
            Decimation::Pick | Decimation::Tukey => None,
            Decimation::ShortSinc => Some(SHORT_SINC_LENGTH),
            Decimation::LongSinc => Some(LONG_SINC_LENGTH),
        }
    }
}

/// A fully resolved conversion: direction, ratio and kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Equal rates, samples are copied.
    Passthrough,
    /// Every input sample becomes `cadence` output samples.
    Upsample {
        /// Output samples per input sample
        cadence: usize,
        /// Interpolation between input samples
        interpolation: Interpolation,
    },
    /// Every `inv_cadence` input samples become one output sample.
    Downsample {
        /// Input samples per output sample
        inv_cadence: usize,
        /// Anti-aliasing filter
        decimation: Decimation,
        /// Report sinc output at the window center instead of its newest sample
        zero_latency: bool,
    },
}

impl Conversion {
    /// The direction of this conversion.
    pub fn direction(&self) -> Direction {
        match self {
            Conversion::Passthrough => Direction::Passthrough,
            Conversion::Upsample { .. } => Direction::Upsampling,
            Conversion::Downsample { .. } => Direction::Downsampling,
        }
    }
}

/// Minimal description of one side of a stream, as negotiated with the host.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Caps {
    /// Samples per second.
    pub rate: Option<u32>,
    /// Element format name such as `F64LE`.
    pub format: Option<String>,
    /// Bytes per sample, if the host states it separately.
    pub unit_size: Option<usize>,
}

impl Caps {
    /// Caps with the given rate and format.
    pub fn new(rate: u32, format: impl Into<String>) -> Self {
        Self {
            rate: Some(rate),
            format: Some(format.into()),
            unit_size: None,
        }
    }

    /// Sets the unit size.
    pub fn with_unit_size(mut self, unit_size: usize) -> Self {
        self.unit_size = Some(unit_size);
        self
    }

    fn sample_rate(&self) -> Result<SampleRate, ConfigError> {
        let rate = self.rate.ok_or(ConfigError::MissingRate)?;
        SampleRate::new(rate).ok_or(ConfigError::ZeroRate)
    }

    fn element_type(&self) -> Result<ElementType, ConfigError> {
        let format = self.format.as_deref().ok_or(ConfigError::MissingFormat)?;
        ElementType::from_format_name(format)
    }
}

/// Rate conversion configuration.
///
/// # Examples
///
/// ```rust
/// use ratestream::{nz, ElementType, ResampleConfig};
///
/// // 16 kHz down to 2 kHz with the short sinc filter
/// let config = ResampleConfig::new(nz!(16384), nz!(2048), ElementType::F64)
///     .quality(2)
///     .zero_latency(true);
/// assert!(config.conversion().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResampleConfig {
    rate_in: SampleRate,
    rate_out: SampleRate,
    element_type: ElementType,
    quality: u32,
    zero_latency: bool,
    unit_size: Option<usize>,
}

impl ResampleConfig {
    /// Creates a configuration with quality 0 and true filter latency.
    pub fn new(rate_in: SampleRate, rate_out: SampleRate, element_type: ElementType) -> Self {
        Self {
            rate_in,
            rate_out,
            element_type,
            quality: 0,
            zero_latency: false,
            unit_size: None,
        }
    }

    /// Builds a configuration from negotiated input and output caps.
    ///
    /// The formats must agree, the rates must be present and the ratio must be an integer or the
    /// inverse of one.
    pub fn from_caps(input: &Caps, output: &Caps) -> Result<Self, ConfigError> {
        let rate_in = input.sample_rate()?;
        let rate_out = output.sample_rate()?;
        let element_type = input.element_type()?;
        let output_type = output.element_type()?;
        if element_type != output_type {
            return Err(ConfigError::FormatMismatch {
                input: element_type,
                output: output_type,
            });
        }

        let mut config = Self::new(rate_in, rate_out, element_type);
        for unit_size in [input.unit_size, output.unit_size].into_iter().flatten() {
            config = config.unit_size(unit_size);
            config.check_unit_size()?;
        }
        config.conversion()?;
        Ok(config)
    }

    /// Sets the interpolation or decimation quality (0 to 3).
    pub fn quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self
    }

    /// Reports sinc-decimated samples at the center of their window, hiding the filter's delay.
    pub fn zero_latency(mut self, zero_latency: bool) -> Self {
        self.zero_latency = zero_latency;
        self
    }

    /// Declares the bytes per sample of the host's buffers, checked against the element type.
    pub fn unit_size(mut self, unit_size: usize) -> Self {
        self.unit_size = Some(unit_size);
        self
    }

    /// Input sample rate.
    #[inline]
    pub fn rate_in(&self) -> SampleRate {
        self.rate_in
    }

    /// Output sample rate.
    #[inline]
    pub fn rate_out(&self) -> SampleRate {
        self.rate_out
    }

    /// Element type of both streams.
    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Configured quality level.
    #[inline]
    pub fn get_quality(&self) -> u32 {
        self.quality
    }

    /// Whether zero-latency reporting is enabled.
    #[inline]
    pub fn is_zero_latency(&self) -> bool {
        self.zero_latency
    }

    /// Direction of the conversion, ignoring whether the ratio is valid.
    pub fn direction(&self) -> Direction {
        match self.rate_out.cmp(&self.rate_in) {
            std::cmp::Ordering::Equal => Direction::Passthrough,
            std::cmp::Ordering::Greater => Direction::Upsampling,
            std::cmp::Ordering::Less => Direction::Downsampling,
        }
    }

    /// Validates the configuration and resolves the kernel it selects.
    pub fn conversion(&self) -> Result<Conversion, ConfigError> {
        self.check_unit_size()?;

        let ratio = Ratio::new(self.rate_out.get(), self.rate_in.get());
        let direction = self.direction();
        let unsupported = || ConfigError::UnsupportedQuality {
            quality: self.quality,
            direction,
        };

        if *ratio.numer() != 1 && *ratio.denom() != 1 {
            return Err(ConfigError::NonIntegerRatio {
                rate_in: self.rate_in.get(),
                rate_out: self.rate_out.get(),
            });
        }

        match direction {
            Direction::Passthrough if self.quality <= MAX_QUALITY => Ok(Conversion::Passthrough),
            Direction::Passthrough => Err(unsupported()),
            Direction::Upsampling => Ok(Conversion::Upsample {
                cadence: *ratio.numer() as usize,
                interpolation: Interpolation::from_quality(self.quality).ok_or_else(unsupported)?,
            }),
            Direction::Downsampling => Ok(Conversion::Downsample {
                inv_cadence: *ratio.denom() as usize,
                decimation: Decimation::from_quality(self.quality).ok_or_else(unsupported)?,
                zero_latency: self.zero_latency,
            }),
        }
    }

    fn check_unit_size(&self) -> Result<(), ConfigError> {
        let expected = self.element_type.unit_size();
        match self.unit_size {
            Some(unit_size) if unit_size != expected => Err(ConfigError::UnitSize {
                element_type: self.element_type,
                unit_size,
                expected,
            }),
            _ => Ok(()),
        }
    }
}
