//! Windowed-sinc decimation.
//!
//! The low-pass filter is a sinc with its first zero at one output period, tapered by a Blackman
//! window spanning `length` output periods. Each output sample is the filter centered on its tick;
//! it can only be computed once the half-window after the tick has arrived.

use std::f64::consts::PI;
use std::sync::Arc;

use super::decimate::TickCursor;
use super::ring::SampleRing;
use crate::conversions::Sample;

/// One half of a symmetric filter, normalized to unit DC gain.
#[derive(Debug)]
pub(crate) struct SincTable<T: Sample> {
    inv_cadence: usize,
    length: usize,
    /// `taps[m]` weighs the samples `m` input periods from the center.
    taps: Box<[T::Real]>,
}

impl<T: Sample> SincTable<T> {
    pub fn new(inv_cadence: usize, length: usize) -> Self {
        let half = length * inv_cadence / 2;
        let mut taps: Vec<f64> = (0..=half)
            .map(|m| sinc(m as f64 / inv_cadence as f64) * blackman(m, half))
            .collect();
        let gain = taps[0] + 2.0 * taps[1..].iter().sum::<f64>();
        for tap in &mut taps {
            *tap /= gain;
        }
        Self {
            inv_cadence,
            length,
            taps: taps.into_iter().map(T::real).collect(),
        }
    }

    /// Whether this table was built for the given parameters.
    pub fn matches(&self, inv_cadence: usize, length: usize) -> bool {
        self.inv_cadence == inv_cadence && self.length == length
    }

    /// Input samples on either side of the center.
    #[inline]
    pub fn half_width(&self) -> usize {
        self.taps.len() - 1
    }

    #[inline]
    fn apply(&self, window: &impl Fn(usize) -> T, center: usize) -> T {
        let mut acc = window(center).scale(self.taps[0]);
        for (m, &tap) in self.taps.iter().enumerate().skip(1) {
            acc += (window(center - m) + window(center + m)).scale(tap);
        }
        acc
    }

    #[inline]
    fn apply_slice(&self, samples: &[T]) -> T {
        let center = self.half_width();
        let mut acc = samples[center].scale(self.taps[0]);
        for (m, &tap) in self.taps.iter().enumerate().skip(1) {
            acc += (samples[center - m] + samples[center + m]).scale(tap);
        }
        acc
    }
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Blackman window at `m` samples from the center of a window reaching `half` samples each way.
fn blackman(m: usize, half: usize) -> f64 {
    let phase = PI * m as f64 / half as f64;
    0.42 + 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
}

/// Windowed-sinc decimator state: the filter plus the input history it still needs.
#[derive(Debug, Clone)]
pub(crate) struct SincDecimator<T: Sample> {
    table: Arc<SincTable<T>>,
    cursor: TickCursor,
    history: SampleRing<T>,
}

impl<T: Sample> SincDecimator<T> {
    pub fn new(table: Arc<SincTable<T>>, leading: usize) -> Self {
        let half = table.half_width();
        let stride = table.inv_cadence;
        Self {
            cursor: TickCursor::new(stride, half, half, leading),
            history: SampleRing::new(2 * half),
            table,
        }
    }

    /// Forgets the history and restarts the tick grid `leading` samples ahead.
    pub fn reset(&mut self, leading: usize) {
        let half = self.table.half_width();
        self.cursor = TickCursor::new(self.table.inv_cadence, half, half, leading);
        self.history.clear();
    }

    pub fn output_len(&self, input_len: usize) -> usize {
        self.cursor.count(input_len)
    }

    pub fn process(&mut self, input: &[T], output: &mut [T]) {
        let emitted = self.cursor.count(input.len());
        let half = self.table.half_width();
        let carried = self.history.len();
        let first = self.cursor.first_ready();
        let stride = self.cursor.stride();

        let history = &self.history;
        let window = |index: usize| {
            if index < carried {
                history.get(index)
            } else {
                input[index - carried]
            }
        };

        for (k, out) in output[..emitted].iter_mut().enumerate() {
            // Index of the tick in the history followed by the input.
            let center = carried + first + k * stride - half;
            *out = if center - half >= carried {
                let start = center - half - carried;
                self.table.apply_slice(&input[start..=start + 2 * half])
            } else {
                self.table.apply(&window, center)
            };
        }

        self.cursor.advance(input.len(), emitted);
        self.history.extend_from_slice(input);
    }

    /// Whether the history holds only zeros, so zeros in give zeros out.
    pub fn is_silent(&self) -> bool {
        self.history.is_silent()
    }

    pub fn skip_silence(&mut self, input_len: usize) {
        let emitted = self.cursor.count(input_len);
        self.cursor.advance(input_len, emitted);
        self.history.push_zeros(input_len);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn table_has_unit_gain() {
        let table = SincTable::<f64>::new(4, 32);
        assert_eq!(table.half_width(), 64);
        let gain = table.taps[0] + 2.0 * table.taps[1..].iter().sum::<f64>();
        assert_abs_diff_eq!(gain, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn table_vanishes_on_output_ticks() {
        let table = SincTable::<f64>::new(8, 32);
        for m in (8..=table.half_width()).step_by(8) {
            assert_abs_diff_eq!(table.taps[m], 0.0, epsilon = 1e-12);
        }
        assert!(table.taps[0] > table.taps[1]);
    }

    #[test]
    fn first_output_waits_for_full_window() {
        let table = Arc::new(SincTable::<f64>::new(4, 32));
        let decimator = SincDecimator::new(table.clone(), 0);
        assert_eq!(decimator.output_len(128), 0);
        assert_eq!(decimator.output_len(129), 1);
        assert_eq!(decimator.output_len(1000), 218);
    }

    #[test]
    fn chunking_does_not_change_output() {
        let table = Arc::new(SincTable::<f64>::new(4, 32));
        let input: Vec<f64> = (0..700).map(|i| (i as f64 * 0.05).sin()).collect();

        let mut whole = SincDecimator::new(table.clone(), 1);
        let mut expected = vec![0.0; whole.output_len(input.len())];
        whole.process(&input, &mut expected);

        let mut split = SincDecimator::new(table, 1);
        let mut actual = Vec::new();
        for chunk in input.chunks(37) {
            let mut out = vec![0.0; split.output_len(chunk.len())];
            split.process(chunk, &mut out);
            actual.extend(out);
        }

        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(&expected) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn passes_dc_and_blocks_nyquist() {
        let table = Arc::new(SincTable::<f64>::new(4, 32));
        let mut decimator = SincDecimator::new(table.clone(), 0);
        let dc = vec![1.5; 512];
        let mut out = vec![0.0; decimator.output_len(dc.len())];
        decimator.process(&dc, &mut out);
        for value in out {
            assert_abs_diff_eq!(value, 1.5, epsilon = 1e-9);
        }

        let mut decimator = SincDecimator::new(table, 0);
        let alternating: Vec<f64> = (0..512).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let mut out = vec![0.0; decimator.output_len(alternating.len())];
        decimator.process(&alternating, &mut out);
        for value in out {
            assert!(value.abs() < 5e-3, "{value}");
        }
    }
}
