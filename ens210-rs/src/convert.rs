//! Fixed-point unit conversions for ENS210 readings.
//!
//! Temperature data is in 1/64 K and humidity data in 1/512 %RH. The
//! conversions return `multiplier` times the physical value, rounded to the
//! nearest integer (halves away from zero). Temperature conversions subtract
//! the solder correction (in 1/64 K) before scaling.
//!
//! The correction is an `i16`, so the corrected value always lies in
//! `-32768..=98303` and every intermediate fits an `i64`. Results within
//! `MAX_MULTIPLIER` always fit an `i32`; larger multipliers trip a debug
//! assertion and saturate in release builds instead of wrapping.
//!
//! None of these functions look at [`Status`](crate::Status); only convert
//! readings whose status is [`Status::Ok`](crate::Status::Ok).
use fixed::types::{I26F6, U7F9};

/// Temperature in Kelvin at the native resolution of 1/64 K.
pub type Kelvin = I26F6;

/// Relative humidity in %RH at the native resolution of 1/512 %RH.
pub type RelativeHumidity = U7F9;

/// Largest multiplier for which the conversions are guaranteed not to overflow.
pub const MAX_MULTIPLIER: i32 = 10_000;

/// Default solder correction, 50 mK expressed in 1/64 K.
///
/// See "Effect of Soldering on Temperature Readout" in the ENS210 design guidelines.
pub const DEFAULT_SOLDER_CORRECTION: i16 = 50 * 64 / 1000;

/// Integer division rounding halves away from zero.
#[inline]
const fn idiv(n: i64, d: i64) -> i64 {
    if n > 0 { (n + d / 2) / d } else { (n - d / 2) / d }
}

#[inline]
fn corrected(t_data: u16, correction: i16) -> i64 {
    t_data as i64 - correction as i64
}

#[inline]
fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[inline]
fn check_multiplier(multiplier: i32) {
    debug_assert!(
        (1..=MAX_MULTIPLIER).contains(&multiplier),
        "multiplier {multiplier} out of range"
    );
}

/// Converts temperature data to `multiplier` × Kelvin.
pub fn to_kelvin(t_data: u16, multiplier: i32, correction: i16) -> i32 {
    check_multiplier(multiplier);
    let m = multiplier as i64;
    saturate(idiv(m * corrected(t_data, correction), 64))
}

/// Converts temperature data to `multiplier` × degrees Celsius.
pub fn to_celsius(t_data: u16, multiplier: i32, correction: i16) -> i32 {
    check_multiplier(multiplier);
    let m = multiplier as i64;
    // m*C = m*t/64 - 273.15*m
    saturate(idiv(m * corrected(t_data, correction), 64) - idiv(27315 * m, 100))
}

/// Converts temperature data to `multiplier` × degrees Fahrenheit.
pub fn to_fahrenheit(t_data: u16, multiplier: i32, correction: i16) -> i32 {
    check_multiplier(multiplier);
    let m = multiplier as i64;
    // m*F = 1.8*m*K - 459.67*m = 9*m*t/320 - 459.67*m
    saturate(idiv(9 * m * corrected(t_data, correction), 320) - idiv(45967 * m, 100))
}

/// Converts humidity data to `multiplier` × %RH. No correction applies.
pub fn to_percentage_h(h_data: u16, multiplier: i32) -> i32 {
    check_multiplier(multiplier);
    saturate(idiv(multiplier as i64 * h_data as i64, 512))
}

/// Exact temperature in Kelvin, after solder correction.
pub fn kelvin(t_data: u16, correction: i16) -> Kelvin {
    Kelvin::from_bits(t_data as i32 - correction as i32)
}

/// Exact relative humidity in %RH.
pub fn relative_humidity(h_data: u16) -> RelativeHumidity {
    RelativeHumidity::from_bits(h_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const C: i16 = DEFAULT_SOLDER_CORRECTION;

    #[test]
    fn default_correction() {
        assert_eq!(C, 3);
    }

    #[test]
    fn rounding() {
        assert_eq!(idiv(31, 64), 0);
        assert_eq!(idiv(32, 64), 1);
        assert_eq!(idiv(-31, 64), 0);
        assert_eq!(idiv(-32, 64), -1);
        assert_eq!(idiv(0, 64), 0);
    }

    #[test]
    fn temperature_at_280_kelvin() {
        let raw = 280 * 64;
        assert_eq!(to_kelvin(raw, 1, C), 280);
        assert_eq!(to_kelvin(raw, 64, C), 280 * 64 - C as i32);
        assert_eq!(to_kelvin(raw, 1000, C), 279953);
        assert_eq!(to_celsius(raw, 1, C), 7);
        assert_eq!(to_celsius(raw, 100, C), 680);
        assert_eq!(to_fahrenheit(raw, 1, C), 44);
        assert_eq!(to_fahrenheit(raw, 100, C), 4425);
        assert_eq!(to_celsius(raw, 100, 0), 685);
    }

    #[test]
    fn below_zero_celsius() {
        // 250 K = -23.15 C = -9.67 F
        let raw = 250 * 64;
        assert_eq!(to_celsius(raw, 100, 0), -2315);
        assert_eq!(to_fahrenheit(raw, 100, 0), -967);
        assert_eq!(to_celsius(0, 1, C), -273);
    }

    #[test]
    fn native_scale_roundtrip() {
        for raw in (0..=u16::MAX).step_by(7) {
            assert_eq!(to_kelvin(raw, 64, C), raw as i32 - C as i32);
            assert_eq!(to_kelvin(raw, 64, -20), raw as i32 + 20);
            assert_eq!(to_percentage_h(raw, 512), raw as i32);
        }
        assert_eq!(to_percentage_h(u16::MAX, 512), u16::MAX as i32);
    }

    #[test]
    fn affine_relations_within_one_lsb() {
        for m in [1, 10, 100, 1000, MAX_MULTIPLIER] {
            for raw in (0..=u16::MAX).step_by(13) {
                let k = (raw as f64 - C as f64) / 64.0;
                let c = k - 273.15;
                let f = c * 9.0 / 5.0 + 32.0;
                let mf = m as f64;
                assert!((to_kelvin(raw, m, C) as f64 - k * mf).abs() <= 0.5 + 1e-6);
                assert!((to_celsius(raw, m, C) as f64 - c * mf).abs() <= 1.0 + 1e-6);
                assert!((to_fahrenheit(raw, m, C) as f64 - f * mf).abs() <= 1.0 + 1e-6);
            }
        }
    }

    #[test]
    fn humidity() {
        assert_eq!(to_percentage_h(50 * 512, 1), 50);
        assert_eq!(to_percentage_h(50 * 512, 100), 5000);
        assert_eq!(to_percentage_h(25700, 100), 5020);
        assert_eq!(to_percentage_h(0, 100), 0);
        assert_eq!(to_percentage_h(u16::MAX, MAX_MULTIPLIER), 1279980);
    }

    #[test]
    fn no_overflow_at_max_multiplier() {
        assert_eq!(to_kelvin(u16::MAX, MAX_MULTIPLIER, 0), 10239844);
        assert_eq!(to_fahrenheit(u16::MAX, MAX_MULTIPLIER, 0), 13835019);
        assert_eq!(to_celsius(0, MAX_MULTIPLIER, 64), -2741500);
    }

    #[test]
    fn extreme_corrections_stay_exact() {
        assert_eq!(kelvin(u16::MAX, i16::MIN).to_bits(), 98303);
        assert_eq!(kelvin(0, i16::MAX).to_bits(), -32767);
        assert_eq!(to_kelvin(u16::MAX, MAX_MULTIPLIER, i16::MIN), 15359844);
        assert_eq!(to_kelvin(0, MAX_MULTIPLIER, i16::MAX), -5119844);
        assert_eq!(to_celsius(0, MAX_MULTIPLIER, i16::MAX), -7851344);
        assert_eq!(to_fahrenheit(u16::MAX, MAX_MULTIPLIER, i16::MIN), 23051019);
        for raw in [0, 1, 17920, u16::MAX] {
            for correction in [i16::MIN, -1, 0, 1, i16::MAX] {
                assert_eq!(
                    to_kelvin(raw, 64, correction),
                    raw as i32 - correction as i32
                );
            }
        }
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        assert_eq!(saturate(46_875_000_000), i32::MAX);
        assert_eq!(saturate(-46_875_000_000), i32::MIN);
        assert_eq!(saturate(-369_640_256), -369_640_256);
    }

    #[test]
    fn fixed_views() {
        assert_eq!(kelvin(280 * 64, 0), I26F6::from_num(280));
        assert_eq!(kelvin(280 * 64, C).to_bits(), 280 * 64 - C as i32);
        assert_eq!(relative_humidity(50 * 512), U7F9::from_num(50));
        assert_eq!(relative_humidity(257), U7F9::from_bits(257));
    }
}
