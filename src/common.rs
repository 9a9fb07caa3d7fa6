use std::num::NonZero;

/// Stream sample rate (samples per second).
pub type SampleRate = NonZero<u32>;

/// Stream time in nanoseconds.
pub type ClockTime = u64;

/// Sample count since the start of the stream.
pub type Offset = u64;
