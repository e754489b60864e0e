//! Raw code to microvolt conversion.
//!
//! The chip maps `-Vref/gain ..= +Vref/gain` onto the two's complement codes
//! `0x800000 ..= 0x7FFFFF`, so one LSB is `Vref / (gain * 2^23)` volts.

use crate::settings::Gain;

/// Positive full-scale code count `2^23` divided by `10^6`.
const CODES_PER_MICROVOLT: f32 = 8.388608;

const SIGN_BIT: i32 = 1 << 23;
const CODE_MASK: u32 = 0x00FF_FFFF;

/// Microvolts per raw code for the given inputs.
pub fn scale_factor(calibration_factor: f32, reference_voltage: f32, gain: Gain) -> f32 {
    let gain = f32::from(gain.multiplier());

    calibration_factor * reference_voltage / (gain * CODES_PER_MICROVOLT)
}

/// Interprets the low 24 bits of `raw` as a two's complement number.
pub const fn sign_extend_24(raw: u32) -> i32 {
    let code = (raw & CODE_MASK) as i32;

    if code >= SIGN_BIT {
        code - 2 * SIGN_BIT
    } else {
        code
    }
}

/// Converts a raw 24-bit code to microvolts using `scale` from [`scale_factor`].
pub fn raw_to_microvolts(raw: u32, scale: f32) -> f32 {
    scale * sign_extend_24(raw) as f32
}
