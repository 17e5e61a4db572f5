// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Pitch math for equal divisions of the octave.
//!
//! Approximation errors are given in percent of one EDO step, not in cents.

use crate::note::Step;
use crate::ratio::{ParseRatioError, Ratio};

/// Frequency of the middle step in the default tuning (middle C).
pub const MIDDLE_C_FREQUENCY: f64 = 261.63;

/// Largest supported number of divisions of the octave.
pub const MAX_EDO: u32 = 127;

/// Defines the tuning of the keyboard by assigning a frequency to a certain step.
/// This defines the frequencies of all other steps at `edo` steps per octave.
///
/// # Examples
///
/// ```
/// use edo_trainer::note::*;
/// use edo_trainer::tuning::*;
/// let tuning = Tuning::new(12);
/// assert_eq!(tuning.frequency(Step::MIDDLE), 261.63);
/// assert_eq!(tuning.frequency(Step::from_index(75)), 523.26);
/// assert_eq!(Tuning::new(31).frequency(Step::from_index(32)), 130.815);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    pub edo: u32,
    pub reference_step: Step,
    pub reference_frequency: f64,
}

impl Tuning {
    /// An EDO tuning with the middle step at middle C.
    pub fn new(edo: u32) -> Tuning {
        Tuning {
            edo,
            reference_step: Step::MIDDLE,
            reference_frequency: MIDDLE_C_FREQUENCY,
        }
    }

    /// Return the frequency of a step relative to this tuning.
    pub fn frequency(&self, other: Step) -> f64 {
        step_to_frequency(
            other.index(),
            self.edo,
            self.reference_frequency,
            self.reference_step.index(),
        )
    }
}

/// Default 12-EDO tuning with middle C on the middle step.
impl Default for Tuning {
    fn default() -> Self {
        Tuning::new(12)
    }
}

/// `edo * log2(ratio)`, the exact (fractional) number of steps spanned by a ratio.
fn exact_steps(edo: u32, ratio: f64) -> f64 {
    edo as f64 * ratio.log2()
}

/// How far the closest step lies from the exact ratio, in percent of one step.
///
/// ```
/// use edo_trainer::tuning::relative_error;
///
/// // 3/2 is 7.01955 semitones
/// assert!((relative_error(12, 1.5) - 1.955).abs() < 1e-3);
/// assert_eq!(relative_error(12, 2.0), 0.0);
/// ```
pub fn relative_error(edo: u32, ratio: f64) -> f64 {
    let x = exact_steps(edo, ratio);
    (x.round() - x).abs() * 100.0
}

/// Number of steps that best approximates a ratio.
///
/// ```
/// use edo_trainer::tuning::best_step_approximation;
///
/// assert_eq!(best_step_approximation(12, 1.5), 7);
/// assert_eq!(best_step_approximation(31, 1.25), 10);
/// assert_eq!(best_step_approximation(12, 2.0 / 3.0), -7);
/// ```
pub fn best_step_approximation(edo: u32, ratio: f64) -> i32 {
    exact_steps(edo, ratio).round() as i32
}

/// Frequency of an absolute step, relative to a reference step sounding at `reference_frequency`.
pub fn step_to_frequency(step: i32, edo: u32, reference_frequency: f64, reference_step: i32) -> f64 {
    let octaves = (step - reference_step) as f64 / edo as f64;
    reference_frequency * 2.0f64.powf(octaves)
}

/// Size of an interval of `steps` steps in cents.
///
/// ```
/// use edo_trainer::tuning::steps_to_cents;
///
/// assert_eq!(steps_to_cents(12, 12), 1200.0);
/// assert_eq!(steps_to_cents(12, 6), 600.0);
/// ```
pub fn steps_to_cents(edo: u32, steps: i32) -> f64 {
    steps as f64 / edo as f64 * 1200.0
}

/// Cents rendered for display, with one decimal.
///
/// ```
/// use edo_trainer::tuning::format_cents;
///
/// assert_eq!(format_cents(31, 18), "696.8¢");
/// assert_eq!(format_cents(12, 4), "400.0¢");
/// ```
pub fn format_cents(edo: u32, steps: i32) -> String {
    format!("{:.1}¢", steps_to_cents(edo, steps))
}

/// Parse a ratio of the form `<number>/<number>` into its value.
///
/// ```
/// use edo_trainer::tuning::parse_ratio;
///
/// assert_eq!(parse_ratio("3/2"), Ok(1.5));
/// assert_eq!(parse_ratio("1.5/1"), Ok(1.5));
/// assert!(parse_ratio("3/0").is_err());
/// assert!(parse_ratio("abc").is_err());
/// assert!(parse_ratio("3/2/1").is_err());
/// ```
pub fn parse_ratio(text: &str) -> Result<f64, ParseRatioError> {
    text.parse::<Ratio>().map(Ratio::value)
}

/// Frequency of a MIDI note in standard concert tuning, where A4 corresponds to 440 Hz.
///
/// ```
/// use edo_trainer::tuning::midi_to_frequency;
///
/// assert_eq!(midi_to_frequency(69), 440.0);
/// assert_eq!(midi_to_frequency(81), 880.0);
/// ```
pub fn midi_to_frequency(midi_note: u8) -> f64 {
    step_to_frequency(midi_note as i32, 12, 440.0, 69)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_error_stays_below_half_a_step() {
        let ratios = [1.0, 9.0 / 8.0, 6.0 / 5.0, 7.0 / 5.0, 1.5, 7.0 / 4.0, 15.0 / 8.0, 2.7, 0.3];
        for edo in 1..=MAX_EDO {
            for &r in &ratios {
                let err = relative_error(edo, r);
                assert!(err >= 0.0 && err < 50.0, "edo {} ratio {} error {}", edo, r, err);
            }
        }
    }

    #[test]
    fn best_approximation_converges_with_finer_tunings() {
        let ratio = 5.0 / 4.0;
        let deviation = |edo: u32| {
            let steps = best_step_approximation(edo, ratio);
            let tuning = Tuning::new(edo);
            let approx = tuning.frequency(Step::from_index((63 + steps) as u8)) / MIDDLE_C_FREQUENCY;
            (approx / ratio).log2().abs()
        };
        assert!(deviation(12) < deviation(5));
        assert!(deviation(31) < deviation(12));
        assert!(deviation(53) < 1.0 / 53.0 / 2.0 + 1e-12);
    }

    #[test]
    fn one_octave_is_1200_cents_in_every_tuning() {
        for edo in 1..=MAX_EDO {
            assert_eq!(steps_to_cents(edo, edo as i32), 1200.0);
        }
    }

    #[test]
    fn ratios_accept_decimal_numbers() {
        assert_eq!(parse_ratio("1.5/1"), Ok(1.5));
        assert_eq!(parse_ratio(" 2.5 / 2 "), Ok(1.25));
        assert!(parse_ratio("2").is_err());
        assert!(parse_ratio("1.5/0.0").is_err());
    }

    #[test]
    fn octave_doubles_frequency() {
        let tuning = Tuning::new(19);
        let low = tuning.frequency(Step::from_index(40));
        let high = tuning.frequency(Step::from_index(59));
        assert!((high / low - 2.0).abs() < 1e-12);
    }
}
