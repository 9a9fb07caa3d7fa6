//! Ratestream common constants

/// Nanoseconds in one second, the unit of every [`ClockTime`](crate::ClockTime).
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Highest supported quality level in either direction.
pub const MAX_QUALITY: u32 = 3;

/// Length of the short windowed-sinc decimation filter, in output sample periods.
///
/// The filter spans `SHORT_SINC_LENGTH * inv_cadence + 1` input samples.
pub const SHORT_SINC_LENGTH: usize = 32;

/// Length of the long windowed-sinc decimation filter, in output sample periods.
pub const LONG_SINC_LENGTH: usize = 192;
