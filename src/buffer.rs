//! Buffer metadata exchanged with the host.
//!
//! The host owns the memory. An input buffer is a borrowed slice together with its position in
//! the stream; the output is a slice the host sized with
//! [`Resampler::predict_output_length`](crate::Resampler::predict_output_length).

use crate::common::{ClockTime, Offset};

/// Position and flags of one input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferInfo {
    /// Number of samples in the buffer, including implicit ones for a gap.
    pub len: usize,
    /// Offset of the first sample.
    pub offset: Offset,
    /// Timestamp of the first sample, if the host knows it.
    pub timestamp: Option<ClockTime>,
    /// The samples are all zero and were not materialized.
    pub gap: bool,
    /// The host marked this buffer as the start of a new continuity segment.
    pub discont: bool,
}

impl BufferInfo {
    /// Metadata for `len` samples starting at `offset`.
    pub fn new(len: usize, offset: Offset, timestamp: Option<ClockTime>) -> Self {
        Self {
            len,
            offset,
            timestamp,
            gap: false,
            discont: false,
        }
    }

    /// Marks the buffer as a gap.
    pub fn with_gap(mut self, gap: bool) -> Self {
        self.gap = gap;
        self
    }

    /// Marks the buffer as discontinuous.
    pub fn with_discont(mut self, discont: bool) -> Self {
        self.discont = discont;
        self
    }

    /// Offset one past the last sample.
    #[inline]
    pub fn offset_end(&self) -> Offset {
        self.offset + self.len as Offset
    }
}

/// An input buffer: samples plus their position in the stream.
#[derive(Debug, Clone, Copy)]
pub struct InputBuffer<'a, T> {
    info: BufferInfo,
    samples: &'a [T],
}

impl<'a, T> InputBuffer<'a, T> {
    /// A buffer holding `samples`.
    pub fn new(samples: &'a [T], offset: Offset, timestamp: Option<ClockTime>) -> Self {
        Self {
            info: BufferInfo::new(samples.len(), offset, timestamp),
            samples,
        }
    }

    /// A gap of `len` zero-valued samples that are not materialized.
    pub fn gap(len: usize, offset: Offset, timestamp: Option<ClockTime>) -> Self {
        Self {
            info: BufferInfo::new(len, offset, timestamp).with_gap(true),
            samples: &[],
        }
    }

    /// Pairs samples with metadata produced elsewhere. For a gap the slice is ignored.
    pub fn from_parts(info: BufferInfo, samples: &'a [T]) -> Self {
        Self { info, samples }
    }

    /// Marks the buffer as discontinuous.
    pub fn with_discont(mut self) -> Self {
        self.info.discont = true;
        self
    }

    /// Position and flags of the buffer.
    #[inline]
    pub fn info(&self) -> &BufferInfo {
        &self.info
    }

    /// The samples, empty for a gap.
    #[inline]
    pub fn samples(&self) -> &'a [T] {
        self.samples
    }
}

/// Metadata stamped on an output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputMeta {
    /// Offset of the first output sample.
    pub offset: Offset,
    /// Offset one past the last output sample.
    pub offset_end: Offset,
    /// Timestamp of the first output sample. `None` while the input carries no timestamps.
    pub timestamp: Option<ClockTime>,
    /// Time spanned by the output samples.
    pub duration: Option<ClockTime>,
    /// First buffer after a (re)synchronization.
    pub discont: bool,
    /// Every output sample is zero because the input was a gap.
    pub gap: bool,
    /// Offset from which the output is gap silence, `offset_end` when it has none.
    ///
    /// A gap following real data first flushes the filter history, so only a tail of its output is
    /// silent. [`Resampler::split_gap`](crate::Resampler::split_gap) splits such a buffer.
    pub gap_start: Offset,
}

impl OutputMeta {
    /// Number of output samples.
    #[inline]
    pub fn len(&self) -> usize {
        (self.offset_end - self.offset) as usize
    }

    /// Whether no samples were produced.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset_end == self.offset
    }
}
