//! Property-based tests for the scale, shadow register and sign conversion invariants.

use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use embedded_hal_mock::eh1::delay::NoopDelay;
use max11270::{
    raw_to_microvolts, scale_factor, sign_extend_24, ClockSource, ConversionMode, FixedClock,
    Gain, Max11270, SyncMode,
};
use proptest::prelude::*;

/// Accepts every transaction and shifts back zeros.
struct NullSpi;

impl ErrorType for NullSpi {
    type Error = ErrorKind;
}

impl SpiDevice for NullSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for operation in operations {
            if let Operation::TransferInPlace(words) = operation {
                words.fill(0);
            }
        }
        Ok(())
    }
}

fn adc(reference_voltage: f32) -> Max11270<FixedClock<NullSpi>, NoopDelay> {
    Max11270::with_reference(FixedClock::new(NullSpi), NoopDelay::new(), reference_voltage)
}

fn ctrl1(adc: &Max11270<FixedClock<NullSpi>, NoopDelay>) -> u8 {
    adc.shadow_registers().get(1).unwrap()
}

proptest! {
    /// Every gain code sets `gain = 2^code` and a scale matching the formula.
    #[test]
    fn gain_sets_scale(code in 0u8..=7, reference in 0.5f32..5.0, factor in 0.5f32..1.5) {
        let mut adc = adc(reference);
        adc.set_calibration_factor(factor);

        let gain = Gain::try_from(code).unwrap();
        adc.set_gain(gain).unwrap();

        prop_assert_eq!(u32::from(adc.gain().multiplier()), 1u32 << code);
        prop_assert_eq!(adc.scale(), factor * reference / (f32::from(gain.multiplier()) * 8.388608));
        prop_assert_eq!(adc.scale(), scale_factor(factor, reference, gain));
    }

    /// Reference voltage and calibration factor changes rescale without touching gain.
    #[test]
    fn scale_inputs_are_independent(code in 0u8..=7, reference in 0.5f32..5.0, factor in 0.5f32..1.5) {
        let mut adc = adc(2.048);
        let gain = Gain::try_from(code).unwrap();
        adc.set_gain(gain).unwrap();

        adc.set_reference_voltage(reference);
        prop_assert_eq!(adc.scale(), scale_factor(1.0, reference, gain));

        adc.set_calibration_factor(factor);
        prop_assert_eq!(adc.scale(), scale_factor(factor, reference, gain));
        prop_assert_eq!(adc.gain(), gain);
    }

    /// Writing a control register is reflected exactly in its shadow copy.
    #[test]
    fn control_write_round_trips(register in 1u8..=5, value in any::<u8>()) {
        let mut adc = adc(2.048);

        adc.write_control_register(register, value).unwrap();

        prop_assert_eq!(adc.shadow_registers().get(register), Some(value));
    }

    /// CTRL1 setters change only their own bit.
    #[test]
    fn ctrl1_setters_preserve_other_bits(initial in any::<u8>(), sync in any::<bool>(), external in any::<bool>(), single in any::<bool>()) {
        let mut adc = adc(2.048);
        adc.write_control_register(1, initial).unwrap();

        adc.set_sync_mode(SyncMode::from(sync)).unwrap();
        prop_assert_eq!(ctrl1(&adc) & !(1 << 6), initial & !(1 << 6));
        prop_assert_eq!(ctrl1(&adc) & (1 << 6) != 0, sync);

        let before = ctrl1(&adc);
        adc.set_clock_source(ClockSource::from(external)).unwrap();
        prop_assert_eq!(ctrl1(&adc) & !(1 << 7), before & !(1 << 7));
        prop_assert_eq!(ctrl1(&adc) & (1 << 7) != 0, external);

        let before = ctrl1(&adc);
        adc.set_conversion_mode(ConversionMode::from(single)).unwrap();
        prop_assert_eq!(ctrl1(&adc) & !(1 << 1), before & !(1 << 1));
        prop_assert_eq!(ctrl1(&adc) & (1 << 1) != 0, single);
    }

    /// Gain only rewrites CTRL2 bits 0-3.
    #[test]
    fn gain_preserves_upper_ctrl2(initial in any::<u8>(), code in 0u8..=7) {
        let mut adc = adc(2.048);
        adc.write_control_register(2, initial).unwrap();

        adc.set_gain(Gain::try_from(code).unwrap()).unwrap();

        prop_assert_eq!(adc.shadow_registers().get(2), Some((initial & 0xF0) | 0x08 | code));
    }

    /// Sign extension agrees with the explicit two's complement definition.
    #[test]
    fn sign_extension_matches_definition(raw in 0u32..=0xFF_FFFF) {
        let expected = if raw >= 1 << 23 { raw as i64 - (1 << 24) } else { raw as i64 };

        prop_assert_eq!(i64::from(sign_extend_24(raw)), expected);
        prop_assert!((-(1 << 23)..(1 << 23)).contains(&sign_extend_24(raw)));
    }

    /// Conversion is odd around zero: negating the code negates the reading.
    #[test]
    fn conversion_is_antisymmetric(raw in 1u32..0x80_0000, scale in 0.001f32..10.0) {
        let negated = (0x100_0000 - raw) & 0xFF_FFFF;

        prop_assert_eq!(raw_to_microvolts(negated, scale), -raw_to_microvolts(raw, scale));
    }
}

#[test]
fn zero_reads_zero_with_default_settings() {
    let adc = adc(2.048);

    assert_eq!(adc.convert_raw_to_microvolts(0x000000), 0.0);
    assert_eq!(adc.convert_raw_to_microvolts(0x000001), adc.scale());
    assert_eq!(adc.convert_raw_to_microvolts(0xFFFFFF), -adc.scale());
    assert_eq!(adc.convert_raw_to_microvolts(0x800000), -adc.scale() * 8_388_608.0);
    assert_eq!(adc.convert_raw_to_microvolts(0x7FFFFF), adc.scale() * 8_388_607.0);
}
