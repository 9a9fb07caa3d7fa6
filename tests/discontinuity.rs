use ratestream::{ElementType, InputBuffer, OutputMeta, Resampler};
use rstest::rstest;

mod test_support;
use test_support::{config, sine, timestamp, TestStream};

fn transform(
    resampler: &mut Resampler<f64>,
    buffer: &InputBuffer<'_, f64>,
) -> (Vec<f64>, OutputMeta) {
    let mut out = vec![0.0; resampler.predict_output_length(buffer.info())];
    let meta = resampler.transform(buffer, &mut out).unwrap();
    (out, meta)
}

#[rstest]
fn discontinuity_forgets_previous_segment(
    #[values((16, 64), (64, 16))] rates: (u32, u32),
    #[values(0, 1, 2, 3)] quality: u32,
) {
    let (rate_in, rate_out) = rates;
    let config = config(rate_in, rate_out, ElementType::F64).quality(quality);

    let mut stream = TestStream::<f64>::new(config.clone());
    let (first, _) = stream.push(&sine(3000, 37.0));
    assert!(!first.is_empty());

    // Contiguous with the first segment, so only the flag separates them.
    let samples: Vec<f64> = sine(4000, 23.0).iter().map(|x| 0.5 + x).collect();
    let offset = stream.offset;
    let buffer =
        InputBuffer::new(&samples, offset, Some(timestamp(offset, rate_in))).with_discont();
    let (continued, continued_meta) = transform(&mut stream.resampler, &buffer);

    let mut fresh = Resampler::<f64>::new(config).unwrap();
    let (expected, expected_meta) = transform(&mut fresh, &buffer);

    assert!(!expected.is_empty());
    assert_eq!(continued, expected);
    assert_eq!(continued_meta, expected_meta);
    assert!(continued_meta.discont);
}
