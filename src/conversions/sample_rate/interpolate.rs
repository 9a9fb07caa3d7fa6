//! Upsampling kernels.
//!
//! Every input sample closes the segment that ends at its predecessor (linear and quadratic) or
//! at the sample before that (cubic). A segment writes `cadence` output samples, the first of
//! which is its left knot.

use crate::config::Interpolation;
use crate::conversions::Sample;

/// Samples and slope carried from one buffer to the next.
#[derive(Debug, Clone)]
pub(crate) struct Knots<T: Sample> {
    /// Most recent input samples, oldest first. Only the first `len` are valid.
    samples: [T; 2],
    len: usize,
    /// Slope at `samples[0]`, threaded between cubic segments.
    slope: T,
}

impl<T: Sample> Knots<T> {
    fn new() -> Self {
        Self {
            samples: [T::zero(); 2],
            len: 0,
            slope: T::zero(),
        }
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline]
    fn push(&mut self, sample: T) {
        if self.len == 2 {
            self.samples[0] = self.samples[1];
            self.samples[1] = sample;
        } else {
            self.samples[self.len] = sample;
            self.len += 1;
        }
    }

    #[inline]
    fn newest(&self) -> T {
        self.samples[self.len - 1]
    }

    /// The sample before the newest one, if there is one.
    #[inline]
    fn previous(&self) -> Option<T> {
        (self.len == 2).then_some(self.samples[0])
    }

    fn is_silent(&self) -> bool {
        self.samples[..self.len].iter().all(|sample| sample.is_zero()) && self.slope.is_zero()
    }
}

/// One interpolation order.
trait Spline {
    /// Carried samples needed before an incoming sample completes a segment.
    const KNOTS: usize;

    /// Writes the segment completed by `next`. `ramp[i]` is `i / cadence`.
    fn segment<T: Sample>(knots: &mut Knots<T>, next: T, ramp: &[T::Real], out: &mut [T]);
}

struct Hold;
struct Linear;
struct Quadratic;
struct Cubic;

impl Spline for Hold {
    const KNOTS: usize = 0;

    #[inline]
    fn segment<T: Sample>(_: &mut Knots<T>, next: T, _: &[T::Real], out: &mut [T]) {
        out.fill(next);
    }
}

impl Spline for Linear {
    const KNOTS: usize = 1;

    #[inline]
    fn segment<T: Sample>(knots: &mut Knots<T>, next: T, ramp: &[T::Real], out: &mut [T]) {
        let start = knots.newest();
        let slope = next - start;
        out[0] = start;
        for (out, &t) in out.iter_mut().zip(ramp).skip(1) {
            *out = start + slope.scale(t);
        }
    }
}

impl Spline for Quadratic {
    const KNOTS: usize = 1;

    #[inline]
    fn segment<T: Sample>(knots: &mut Knots<T>, next: T, ramp: &[T::Real], out: &mut [T]) {
        let start = knots.newest();
        let slope = match knots.previous() {
            Some(previous) => (next - previous).unscale(T::real(2.0)),
            None => T::zero(),
        };
        let half_curvature = next - start - slope;
        out[0] = start;
        for (out, &t) in out.iter_mut().zip(ramp).skip(1) {
            *out = start + slope.scale(t) + half_curvature.scale(t * t);
        }
    }
}

impl Spline for Cubic {
    const KNOTS: usize = 2;

    #[inline]
    fn segment<T: Sample>(knots: &mut Knots<T>, next: T, ramp: &[T::Real], out: &mut [T]) {
        let [start, end] = knots.samples;
        let slope0 = knots.slope;
        let slope1 = (next - start).unscale(T::real(2.0));
        let half_d2 = (end - start).scale(T::real(3.0)) - slope1 - slope0.scale(T::real(2.0));
        let sixth_d3 = (start - end).scale(T::real(2.0)) + slope1 + slope0;
        out[0] = start;
        for (out, &t) in out.iter_mut().zip(ramp).skip(1) {
            *out = start + slope0.scale(t) + half_d2.scale(t * t) + sixth_d3.scale(t * t * t);
        }
        knots.slope = slope1;
    }
}

/// Shared driver for all orders.
fn upsample<T: Sample, S: Spline>(
    knots: &mut Knots<T>,
    ramp: &[T::Real],
    input: &[T],
    output: &mut [T],
) {
    let mut segments = output.chunks_exact_mut(ramp.len());
    for &sample in input {
        if knots.len >= S::KNOTS {
            if let Some(out) = segments.next() {
                S::segment(knots, sample, ramp, out);
            }
        }
        knots.push(sample);
    }
    debug_assert!(segments.next().is_none(), "output longer than predicted");
}

/// Upsampling state: the interpolation order, its ramp table and the carried knots.
#[derive(Debug, Clone)]
pub(crate) struct Interpolator<T: Sample> {
    interpolation: Interpolation,
    ramp: Box<[T::Real]>,
    knots: Knots<T>,
}

impl<T: Sample> Interpolator<T> {
    pub fn new(cadence: usize, interpolation: Interpolation) -> Self {
        let ramp = (0..cadence)
            .map(|i| T::real(i as f64 / cadence as f64))
            .collect();
        Self {
            interpolation,
            ramp,
            knots: Knots::new(),
        }
    }

    pub fn reset(&mut self) {
        self.knots.clear();
    }

    /// Output samples produced by `input_len` more input samples, given `carried` knots.
    pub fn predict(
        cadence: usize,
        interpolation: Interpolation,
        carried: usize,
        input_len: usize,
    ) -> usize {
        let needed = knots_needed(interpolation);
        (input_len + carried.min(needed)).saturating_sub(needed) * cadence
    }

    pub fn output_len(&self, input_len: usize) -> usize {
        Self::predict(self.ramp.len(), self.interpolation, self.knots.len, input_len)
    }

    pub fn process(&mut self, input: &[T], output: &mut [T]) {
        let knots = &mut self.knots;
        let ramp = &self.ramp;
        match self.interpolation {
            Interpolation::Hold => upsample::<T, Hold>(knots, ramp, input, output),
            Interpolation::Linear => upsample::<T, Linear>(knots, ramp, input, output),
            Interpolation::Quadratic => upsample::<T, Quadratic>(knots, ramp, input, output),
            Interpolation::Cubic => upsample::<T, Cubic>(knots, ramp, input, output),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.knots.is_silent()
    }

    /// Advances over `input_len` zeros while the carried knots are zero too. Every output
    /// sample would be zero, so only the knot count changes.
    pub fn skip_silence(&mut self, input_len: usize) {
        debug_assert!(self.is_silent());
        for _ in 0..input_len.min(2) {
            self.knots.push(T::zero());
        }
    }
}

fn knots_needed(interpolation: Interpolation) -> usize {
    match interpolation {
        Interpolation::Hold => Hold::KNOTS,
        Interpolation::Linear => Linear::KNOTS,
        Interpolation::Quadratic => Quadratic::KNOTS,
        Interpolation::Cubic => Cubic::KNOTS,
    }
}
