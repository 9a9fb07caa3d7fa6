use divan::Bencher;
use ratestream::{ElementType, InputBuffer, ResampleConfig, Resampler, SampleRate};

fn main() {
    divan::main();
}

const BUFFER_LEN: usize = 16384;

fn signal() -> Vec<f32> {
    (0..BUFFER_LEN)
        .map(|i| (i as f32 * 0.013).sin() + 0.25 * (i as f32 * 0.31).cos())
        .collect()
}

fn resampler(rate_in: u32, rate_out: u32, quality: u32) -> Resampler<f32> {
    let config = ResampleConfig::new(
        SampleRate::new(rate_in).expect("Is not zero"),
        SampleRate::new(rate_out).expect("Is not zero"),
        ElementType::F32,
    )
    .quality(quality);
    Resampler::new(config).expect("valid configuration")
}

/// Feeds consecutive buffers so the carried state is exercised.
fn run(bencher: Bencher, rate_in: u32, rate_out: u32, quality: u32) {
    let input = signal();
    bencher
        .with_inputs(|| {
            let mut resampler = resampler(rate_in, rate_out, quality);
            // Prime the filter history with one buffer.
            let buffer = InputBuffer::new(&input, 0, Some(0));
            let mut output = vec![0.0; resampler.predict_output_length(buffer.info())];
            resampler.transform(&buffer, &mut output).expect("primed");
            (resampler, output)
        })
        .bench_values(|(mut resampler, mut output)| {
            let offset = BUFFER_LEN as u64;
            let timestamp = offset * 1_000_000_000 / u64::from(rate_in);
            let buffer = InputBuffer::new(&input, offset, Some(timestamp));
            output.resize(resampler.predict_output_length(buffer.info()), 0.0);
            divan::black_box(resampler.transform(&buffer, &mut output).expect("transformed"));
        })
}

#[divan::bench(args = [0, 1, 2, 3])]
fn upsample_by_8(bencher: Bencher, quality: u32) {
    run(bencher, 2048, 16384, quality)
}

#[divan::bench(args = [0, 1, 2, 3])]
fn downsample_by_8(bencher: Bencher, quality: u32) {
    run(bencher, 16384, 2048, quality)
}

#[divan::bench]
fn gap_from_silence(bencher: Bencher) {
    bencher
        .with_inputs(|| resampler(16384, 2048, 3))
        .bench_values(|mut resampler| {
            let buffer = InputBuffer::<f32>::gap(BUFFER_LEN, 0, Some(0));
            let mut output = vec![0.0; resampler.predict_output_length(buffer.info())];
            divan::black_box(resampler.transform(&buffer, &mut output).expect("transformed"));
        })
}
