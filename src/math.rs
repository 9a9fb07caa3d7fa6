//! Integer time arithmetic shared by the rate-conversion state machine.

/// Creates a [`NonZero`](core::num::NonZero) from a literal, checked at compile time.
///
/// ```rust
/// use ratestream::{nz, SampleRate};
///
/// let rate: SampleRate = nz!(16384);
/// assert_eq!(rate.get(), 16384);
/// ```
#[macro_export]
macro_rules! nz {
    ($n:literal) => {
        const { ::core::num::NonZero::new($n).unwrap() }
    };
}

/// Computes `value * num / denom` rounded to the nearest integer, without intermediate overflow.
///
/// Halves round up. Saturates at `u64::MAX`.
///
/// # Panic
/// Panics if `denom` is 0.
#[inline]
pub fn scale_round(value: u64, num: u64, denom: u64) -> u64 {
    let denom = denom as u128;
    let product = value as u128 * num as u128;
    narrow(product.saturating_add(denom / 2) / denom)
}

/// Computes `value * num / denom` rounded towards positive infinity.
///
/// # Panic
/// Panics if `denom` is 0.
#[inline]
pub fn scale_ceil(value: u64, num: u64, denom: u64) -> u64 {
    let denom = denom as u128;
    let product = value as u128 * num as u128;
    narrow(product.div_ceil(denom))
}

#[inline]
fn narrow(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{quickcheck, TestResult};

    quickcheck! {
        fn scale_round_matches_float(value: u16, num: u32, denom: u16) -> TestResult {
            if denom == 0 { return TestResult::discard(); }

            let exact = value as f64 * num as f64 / denom as f64;
            // Skip values sitting right on a half, where the float reference is unreliable.
            if (exact.fract() - 0.5).abs() < 1e-6 { return TestResult::discard(); }

            let x = scale_round(value as u64, num as u64, denom as u64);
            TestResult::from_bool(x == exact.round() as u64)
        }

        fn ceil_is_at_most_one_above_round(value: u64, num: u32, denom: u32) -> TestResult {
            if denom == 0 { return TestResult::discard(); }
            let (num, denom) = (num as u64, denom as u64);

            let round = scale_round(value, num, denom);
            let ceil = scale_ceil(value, num, denom);
            TestResult::from_bool(round <= ceil && ceil - round <= 1)
        }
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(scale_round(1, 1, 2), 1);
        assert_eq!(scale_round(3, 1, 2), 2);
        assert_eq!(scale_round(5, 1_000_000_000, 16), 312_500_000);
    }

    #[test]
    fn large_products_do_not_overflow() {
        let ten_years_ns = 10 * 365 * 24 * 3600 * 1_000_000_000u64;
        assert_eq!(scale_round(ten_years_ns, 16384, 1_000_000_000), 10 * 365 * 24 * 3600 * 16384);
        assert_eq!(scale_ceil(u64::MAX, 2, 1), u64::MAX);
    }
}
