use crate::config::Direction;
use crate::conversions::ElementType;

/// Errors raised while configuring a resampler. These are fatal: no data can be processed
/// until a valid configuration is applied.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A stream format did not declare its sample rate.
    #[error("Stream format is missing a sample rate")]
    MissingRate,
    /// A stream format declared a zero sample rate.
    #[error("Sample rate must be positive")]
    ZeroRate,
    /// A stream format did not declare its element format.
    #[error("Stream format is missing an element format")]
    MissingFormat,
    /// The element format is unknown or not in native byte order.
    #[error("Unsupported element format: '{0}'")]
    UnsupportedFormat(String),
    /// Input and output formats differ; only the rate may change.
    #[error("Input format {input} does not match output format {output}")]
    FormatMismatch {
        /// Format of the input stream
        input: ElementType,
        /// Format of the output stream
        output: ElementType,
    },
    /// Neither rate is an integer multiple of the other.
    #[error("Output rate {rate_out} is not an integer multiple or divisor of input rate {rate_in}")]
    NonIntegerRatio {
        /// Input sample rate
        rate_in: u32,
        /// Output sample rate
        rate_out: u32,
    },
    /// The quality level has no kernel for this conversion direction.
    #[error("Quality {quality} is not supported when {direction}")]
    UnsupportedQuality {
        /// Requested quality
        quality: u32,
        /// Direction of the configured conversion
        direction: Direction,
    },
    /// The declared unit size disagrees with the element format.
    #[error("Unit size {unit_size} does not match {element_type} ({expected} bytes)")]
    UnitSize {
        /// Element format of the stream
        element_type: ElementType,
        /// Declared bytes per sample
        unit_size: usize,
        /// Bytes per sample of `element_type`
        expected: usize,
    },
    /// A typed resampler was configured for another element type.
    #[error("Resampler for {expected} samples cannot be configured for {requested}")]
    ElementMismatch {
        /// Element type of the resampler
        expected: ElementType,
        /// Element type of the configuration
        requested: ElementType,
    },
}

/// Errors raised by a single transform call. A failed call leaves the resampler untouched.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The input slice does not hold the number of samples its metadata declares.
    #[error("Input buffer declares {declared} samples but holds {provided}")]
    InputLength {
        /// Samples declared by the buffer metadata
        declared: usize,
        /// Samples present in the slice
        provided: usize,
    },
    /// The output slice cannot hold the predicted output.
    #[error("Output buffer holds {provided} samples, {expected} are needed")]
    OutputLength {
        /// Predicted output length
        expected: usize,
        /// Length of the output slice
        provided: usize,
    },
    /// A dynamically typed slice does not match the configured element type.
    #[error("Buffer of {provided} samples passed to a {expected} resampler")]
    ElementType {
        /// Configured element type
        expected: ElementType,
        /// Element type of the offending slice
        provided: ElementType,
    },
}
