//! Downsampling by an integer factor without a sinc filter.

use crate::config::Decimation;
use crate::conversions::Sample;

/// Tracks where the next output tick falls relative to the incoming input.
///
/// Output ticks are `stride` input samples apart. A tick's output can be computed once the input
/// sample `lookahead` samples past the tick has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TickCursor {
    stride: usize,
    lookahead: usize,
    /// Index of the next input sample minus the index of the next output tick.
    rel: i64,
}

impl TickCursor {
    /// A cursor whose first tick lies `settle + leading` samples into the stream.
    pub fn new(stride: usize, lookahead: usize, settle: usize, leading: usize) -> Self {
        Self {
            stride,
            lookahead,
            rel: -((leading + settle) as i64),
        }
    }

    /// Position in the next buffer of the sample that makes the next tick ready.
    #[inline]
    pub fn first_ready(&self) -> usize {
        (self.lookahead as i64 - self.rel) as usize
    }

    /// The cursor a freshly reset decimator starts from.
    pub fn for_decimation(inv_cadence: usize, decimation: Decimation, leading: usize) -> Self {
        match (decimation, decimation.sinc_length()) {
            (_, Some(length)) => {
                let half = length * inv_cadence / 2;
                Self::new(inv_cadence, half, half, leading)
            }
            (Decimation::Tukey, None) => Self::new(inv_cadence, inv_cadence / 2, 0, leading),
            _ => Self::new(inv_cadence, 0, 0, leading),
        }
    }

    /// Ticks made ready by the next `input_len` samples.
    #[inline]
    pub fn count(&self, input_len: usize) -> usize {
        let first = self.first_ready();
        if input_len > first {
            (input_len - 1 - first) / self.stride + 1
        } else {
            0
        }
    }

    /// Moves past `input_len` samples that made `emitted` ticks ready.
    #[inline]
    pub fn advance(&mut self, input_len: usize, emitted: usize) {
        self.rel += input_len as i64 - (emitted * self.stride) as i64;
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn rel(&self) -> i64 {
        self.rel
    }
}

/// Box-shaped decimators.
#[derive(Debug, Clone)]
pub(crate) enum Decimator<T: Sample> {
    /// Keeps the input sample on each tick.
    Pick { cursor: TickCursor },
    /// Averages the samples within half a stride of each tick.
    Tukey(Tukey<T>),
}

impl<T: Sample> Decimator<T> {
    pub fn new(inv_cadence: usize, decimation: Decimation, leading: usize) -> Self {
        match decimation {
            Decimation::Tukey => Decimator::Tukey(Tukey::new(inv_cadence, leading)),
            _ => Decimator::Pick {
                cursor: TickCursor::for_decimation(inv_cadence, Decimation::Pick, leading),
            },
        }
    }

    /// Drops the partial window and restarts the tick grid `leading` samples ahead.
    pub fn reset(&mut self, leading: usize) {
        match self {
            Decimator::Pick { cursor } => {
                *cursor = TickCursor::for_decimation(cursor.stride, Decimation::Pick, leading);
            }
            Decimator::Tukey(tukey) => *tukey = Tukey::new(tukey.cursor.stride, leading),
        }
    }

    pub fn output_len(&self, input_len: usize) -> usize {
        self.cursor().count(input_len)
    }

    fn cursor(&self) -> &TickCursor {
        match self {
            Decimator::Pick { cursor } => cursor,
            Decimator::Tukey(tukey) => &tukey.cursor,
        }
    }

    pub fn process(&mut self, input: &[T], output: &mut [T]) {
        match self {
            Decimator::Pick { cursor } => {
                let emitted = cursor.count(input.len());
                let picked = input.iter().skip(cursor.first_ready()).step_by(cursor.stride);
                for (out, &sample) in output[..emitted].iter_mut().zip(picked) {
                    *out = sample;
                }
                cursor.advance(input.len(), emitted);
            }
            Decimator::Tukey(tukey) => tukey.process(input, output),
        }
    }

    /// Whether zeros in would give zeros out.
    pub fn is_silent(&self) -> bool {
        match self {
            Decimator::Pick { .. } => true,
            Decimator::Tukey(tukey) => tukey.sum.is_zero(),
        }
    }

    /// Advances the state as if `input_len` zeros had been processed.
    pub fn skip_silence(&mut self, input_len: usize) {
        match self {
            Decimator::Pick { cursor } => {
                let emitted = cursor.count(input_len);
                cursor.advance(input_len, emitted);
            }
            Decimator::Tukey(tukey) => tukey.skip_silence(input_len),
        }
    }
}

/// Running average over a window of `inv_cadence` samples centered on each tick.
///
/// For an even `inv_cadence` the window spans one sample more and its two end samples are
/// weighted by one half; each of those is shared with the neighbouring window.
#[derive(Debug, Clone)]
pub(crate) struct Tukey<T: Sample> {
    cursor: TickCursor,
    half_width: i64,
    tapered: bool,
    sum: T,
    weight: T::Real,
}

impl<T: Sample> Tukey<T> {
    fn new(inv_cadence: usize, leading: usize) -> Self {
        let half_width = inv_cadence / 2;
        Self {
            cursor: TickCursor::for_decimation(inv_cadence, Decimation::Tukey, leading),
            half_width: half_width as i64,
            tapered: inv_cadence % 2 == 0,
            sum: T::zero(),
            weight: T::real(0.0),
        }
    }

    fn process(&mut self, input: &[T], output: &mut [T]) {
        let stride = self.cursor.stride as i64;
        let half = T::real(0.5);
        let one = T::real(1.0);
        let mut rel = self.cursor.rel();
        let mut emitted = 0;

        for &sample in input {
            if rel >= -self.half_width {
                let edge = self.tapered && rel.abs() == self.half_width;
                let w = if edge { half } else { one };
                self.sum += sample.scale(w);
                self.weight = self.weight + w;
            }
            if rel == self.half_width {
                output[emitted] = self.sum.unscale(self.weight);
                emitted += 1;
                rel -= stride;
                if self.tapered {
                    self.sum = sample.scale(half);
                    self.weight = half;
                } else {
                    self.sum = T::zero();
                    self.weight = T::real(0.0);
                }
            }
            rel += 1;
        }

        self.cursor.advance(input.len(), emitted);
        debug_assert_eq!(rel, self.cursor.rel());
    }

    /// Only valid while `sum` is zero, so the window holds nothing but its weight.
    fn skip_silence(&mut self, input_len: usize) {
        let first = self.cursor.rel();
        let emitted = self.cursor.count(input_len);
        self.cursor.advance(input_len, emitted);
        let last = self.cursor.rel() - 1;

        self.weight = if emitted > 0 {
            // The window restarted at the last tick, sharing its end sample when tapered.
            self.span_weight(-self.half_width, last)
        } else {
            self.weight + self.span_weight(first, last)
        };
        self.sum = T::zero();
    }

    /// Total weight of the window positions `from..=to` relative to the tick.
    fn span_weight(&self, from: i64, to: i64) -> T::Real {
        let from = from.max(-self.half_width);
        if to < from {
            return T::real(0.0);
        }
        let mut weight = (to - from + 1) as f64;
        if self.tapered {
            if from == -self.half_width {
                weight -= 0.5;
            }
            if to == self.half_width {
                weight -= 0.5;
            }
        }
        T::real(weight)
    }
}
