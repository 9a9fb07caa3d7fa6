use approx::assert_relative_eq;
use ratestream::{Complex32, ElementType};
use rstest::rstest;

mod test_support;
use test_support::{config, sine, TestStream};

#[rstest]
fn decimation_preserves_dc(
    #[values(1, 2, 3)] quality: u32,
    #[values(2, 3, 4, 8)] inv_cadence: u32,
) {
    let rate_out = 16;
    let config = config(rate_out * inv_cadence, rate_out, ElementType::F64).quality(quality);
    let mut stream = TestStream::<f64>::new(config);

    let input = vec![0.75; 4000];
    let (out, _) = stream.push_chunked(&input, 333);
    assert!(!out.is_empty());
    for value in out {
        assert_relative_eq!(value, 0.75, max_relative = 1e-9);
    }
}

#[rstest]
#[case(2)]
#[case(3)]
fn complex_single_precision_dc(#[case] quality: u32) {
    let config = config(256, 64, ElementType::Z64).quality(quality);
    let mut stream = TestStream::<Complex32>::new(config);

    let input = vec![Complex32::new(0.5, -0.25); 6000];
    let (out, _) = stream.push_chunked(&input, 1024);
    assert!(!out.is_empty());
    for value in out {
        assert_relative_eq!(value.re, 0.5, max_relative = 1e-4);
        assert_relative_eq!(value.im, -0.25, max_relative = 1e-4);
    }
}

#[test]
fn sinc_rejects_aliases() {
    // A tone above the output Nyquist frequency.
    let input = sine(8000, 3.0);
    let mut sinc = TestStream::<f64>::new(config(64, 16, ElementType::F64).quality(3));
    let (out, _) = sinc.push(&input);
    let peak = out.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    assert!(peak < 1e-3, "alias leaked through: {peak}");

    // Picking folds the same tone straight back into the output.
    let mut pick = TestStream::<f64>::new(config(64, 16, ElementType::F64));
    let (out, _) = pick.push(&input);
    let peak = out.iter().fold(0.0f64, |acc, x| acc.max(x.abs()));
    assert!(peak > 0.5);
}
