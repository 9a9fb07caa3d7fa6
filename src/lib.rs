//! Sample-accurate rate conversion for timestamped, possibly gapped sample streams.
//!
//! A [`Resampler`] converts a stream from one sample rate to an integer multiple or divisor of
//! it. Upsampling interpolates with a polynomial of degree 0 to 3; downsampling keeps every n-th
//! sample, averages around each output tick, or applies a windowed-sinc low-pass filter. The
//! quality level (0 to 3) selects the kernel.
//!
//! Every output buffer is stamped with its offset and timestamp on a grid anchored at the last
//! discontinuity, so downstream consumers can line streams up sample for sample. Gaps (buffers
//! known to be all zero) are handled without materializing their samples when possible.
//!
//! # Example
//!
//! ```rust
//! use ratestream::{nz, ElementType, InputBuffer, ResampleConfig, Resampler};
//!
//! // 4 Hz to 16 Hz with linear interpolation
//! let config = ResampleConfig::new(nz!(4), nz!(16), ElementType::F32).quality(1);
//! let mut resampler = Resampler::<f32>::new(config)?;
//!
//! let samples = [0.0, 4.0, 8.0];
//! let input = InputBuffer::new(&samples, 0, Some(0));
//! let mut output = vec![0.0; resampler.predict_output_length(input.info())];
//! let meta = resampler.transform(&input, &mut output)?;
//!
//! // The last input sample waits for its successor.
//! assert_eq!(output, [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
//! assert_eq!((meta.offset, meta.offset_end), (0, 8));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! When the element type is only known at runtime, use [`AnyResampler`] with
//! [`SampleSlice`] and [`SampleSliceMut`].
//!
//! # Optional Features
//!
//! - `tracing` (default): debug events on configuration, discontinuities and staged setting
//!   changes, warnings on rejected buffers.

mod buffer;
mod common;
mod config;
mod dispatch;
mod error;

pub mod constants;
pub mod conversions;
pub mod math;

pub use crate::buffer::{BufferInfo, InputBuffer, OutputMeta};
pub use crate::common::{ClockTime, Offset, SampleRate};
pub use crate::config::{Caps, Conversion, Decimation, Direction, Interpolation, ResampleConfig};
pub use crate::conversions::{ElementType, Resampler, Sample};
pub use crate::dispatch::{AnyResampler, SampleSlice, SampleSliceMut};
pub use crate::error::{ConfigError, TransformError};

pub use num_complex::{Complex32, Complex64};
