use ratestream::{
    Caps, ConfigError, Conversion, Decimation, Direction, ElementType, Interpolation,
    ResampleConfig, Resampler, TransformError,
};
use rstest::rstest;

mod test_support;
use test_support::config;

fn native(element_type: ElementType) -> &'static str {
    element_type.format_name()
}

#[test]
fn caps_resolve_to_config() {
    let input = Caps::new(16384, native(ElementType::Z128)).with_unit_size(16);
    let output = Caps::new(2048, native(ElementType::Z128));
    let config = ResampleConfig::from_caps(&input, &output).unwrap().quality(3);

    assert_eq!(config.element_type(), ElementType::Z128);
    assert_eq!(config.direction(), Direction::Downsampling);
    assert_eq!(
        config.conversion(),
        Ok(Conversion::Downsample {
            inv_cadence: 8,
            decimation: Decimation::LongSinc,
            zero_latency: false
        })
    );
}

#[rstest]
#[case::missing_rate(
    Caps { rate: None, ..Caps::new(8, native(ElementType::F32)) },
    ConfigError::MissingRate
)]
#[case::zero_rate(Caps::new(0, native(ElementType::F32)), ConfigError::ZeroRate)]
#[case::missing_format(Caps { format: None, ..Caps::new(8, "") }, ConfigError::MissingFormat)]
#[case::unknown_format(Caps::new(8, "S16LE"), ConfigError::UnsupportedFormat("S16LE".into()))]
#[case::unit_size(
    Caps::new(8, native(ElementType::F32)).with_unit_size(8),
    ConfigError::UnitSize { element_type: ElementType::F32, unit_size: 8, expected: 4 }
)]
#[case::non_integer(
    Caps::new(6, native(ElementType::F32)),
    ConfigError::NonIntegerRatio { rate_in: 6, rate_out: 4 }
)]
fn invalid_caps_are_rejected(#[case] input: Caps, #[case] expected: ConfigError) {
    let output = Caps::new(4, native(ElementType::F32));
    assert_eq!(ResampleConfig::from_caps(&input, &output), Err(expected));
}

#[test]
fn formats_must_match() {
    let input = Caps::new(8, native(ElementType::F32));
    let output = Caps::new(4, native(ElementType::F64));
    assert_eq!(
        ResampleConfig::from_caps(&input, &output),
        Err(ConfigError::FormatMismatch {
            input: ElementType::F32,
            output: ElementType::F64
        })
    );
}

#[rstest]
#[case(0, Interpolation::Hold)]
#[case(1, Interpolation::Linear)]
#[case(2, Interpolation::Quadratic)]
#[case(3, Interpolation::Cubic)]
fn quality_selects_interpolation(#[case] quality: u32, #[case] interpolation: Interpolation) {
    let config = config(100, 300, ElementType::F32).quality(quality);
    assert_eq!(
        config.conversion(),
        Ok(Conversion::Upsample {
            cadence: 3,
            interpolation
        })
    );
}

#[test]
fn resampler_rejects_bad_configs() {
    assert_eq!(
        Resampler::<f32>::new(config(8, 2, ElementType::F64)).unwrap_err(),
        ConfigError::ElementMismatch {
            expected: ElementType::F32,
            requested: ElementType::F64
        }
    );
    assert_eq!(
        Resampler::<f64>::new(config(2, 8, ElementType::F64).quality(4)).unwrap_err(),
        ConfigError::UnsupportedQuality {
            quality: 4,
            direction: Direction::Upsampling
        }
    );

    let mut resampler = Resampler::<f64>::new(config(8, 2, ElementType::F64)).unwrap();
    assert!(resampler.configure(config(8, 3, ElementType::F64)).is_err());
    assert_eq!(resampler.config().rate_out().get(), 2);
    assert_eq!(resampler.required_input_length(5), 20);
}

#[test]
fn errors_render_for_humans() {
    let error = ConfigError::NonIntegerRatio {
        rate_in: 48000,
        rate_out: 44100,
    };
    assert_eq!(
        error.to_string(),
        "Output rate 44100 is not an integer multiple or divisor of input rate 48000"
    );

    let error = TransformError::OutputLength {
        expected: 16,
        provided: 8,
    };
    assert_eq!(error.to_string(), "Output buffer holds 8 samples, 16 are needed");
}
