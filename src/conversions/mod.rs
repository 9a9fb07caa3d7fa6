/*!
This module contains the sample types and the rate converter.

Samples are processed in their own precision: real streams as `f32` or `f64`, complex streams as
[`Complex32`](num_complex::Complex32) or [`Complex64`](num_complex::Complex64).

*/
pub use self::sample::{ElementType, Sample};
pub use self::sample_rate::Resampler;

mod sample;
mod sample_rate;
