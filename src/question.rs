// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Generating exercise questions.
//!
//! Every question starts from a random reference step near the middle of the
//! keyboard. If the resulting pitches fall off the keyboard, the whole
//! question is drawn again rather than shifted, so that questions near the
//! edges are not over-represented.

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;
use snafu::Snafu;

use crate::config::{Chord, Exercise, ExerciseConfig};
use crate::note::Step;
use crate::tuning::format_cents;

/// Reference steps are drawn from this many steps around the middle.
pub const REFERENCE_SPREAD: i32 = 12;

/// Upper bound on redrawing a question that does not fit on the keyboard.
pub const MAX_ATTEMPTS: usize = 10_000;

/// Lowest and highest reference step that can be drawn.
fn reference_band() -> (i32, i32) {
    let middle = Step::MIDDLE.index();
    (middle - REFERENCE_SPREAD, middle + REFERENCE_SPREAD)
}

/// Whether some reference step in the band keeps every offset on the keyboard.
///
/// ```
/// use edo_trainer::question::fits_on_keyboard;
///
/// assert!(fits_on_keyboard(&[0, 4, 7]));
/// assert!(fits_on_keyboard(&[75]));
/// assert!(!fits_on_keyboard(&[76]));
/// assert!(fits_on_keyboard(&[-51]));
/// assert!(!fits_on_keyboard(&[-76]));
/// ```
pub fn fits_on_keyboard(offsets: &[i32]) -> bool {
    let (band_low, band_high) = reference_band();
    let lowest = offsets.iter().copied().min().unwrap_or(0);
    let highest = offsets.iter().copied().max().unwrap_or(0);
    let low = band_low.max(-lowest);
    let high = band_high.min(Step::COUNT - 1 - highest);
    low <= high
}

/// Whether at least one question can be generated from this material.
pub fn is_playable(exercise: &Exercise) -> bool {
    match exercise {
        Exercise::EdoSteps { intervals } => intervals.iter().any(|&i| fits_on_keyboard(&[i])),
        Exercise::Ratio { mappings } => mappings.iter().any(|m| fits_on_keyboard(&[m.steps])),
        Exercise::Chord { chords, .. } => chords.iter().any(|c| fits_on_keyboard(&c.intervals)),
    }
}

/// What the learner is asked to place.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Interval { interval: i32 },
    Ratio { ratio_str: String, steps: i32 },
    Chord { name: String, intervals: Vec<i32>, pivot: usize },
}

/// One exercise round.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Step the question is built on; the chord root in chord mode.
    pub reference: Step,
    /// Step that is given and sounded: the reference, or the pivot tone of a chord.
    pub sounded: Step,
    /// Steps the learner has to place, ascending.
    pub answer: Vec<Step>,
    /// Everything to sound once the question is answered.
    pub feedback: Vec<Step>,
    pub prompt: Prompt,
    /// Task shown while the question is open.
    pub text: String,
    /// Task shown after answering, with the size of the interval filled in.
    pub reveal: String,
}

impl Question {
    /// Which chord tone is given, in chord mode.
    pub fn pivot_index(&self) -> Option<usize> {
        match self.prompt {
            Prompt::Chord { pivot, .. } => Some(pivot),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum GenerationError {
    #[snafu(display("No question fits on the keyboard after {} attempts", attempts))]
    TooManyAttempts { attempts: usize },
}

/// Draws questions for a configuration.
pub struct QuestionGenerator<R> {
    rng: R,
}

impl<R: Rng> QuestionGenerator<R> {
    pub fn new(rng: R) -> Self {
        QuestionGenerator { rng }
    }

    pub fn generate(&mut self, config: &ExerciseConfig) -> Result<Question, GenerationError> {
        for attempt in 0..MAX_ATTEMPTS {
            if let Some(question) = self.attempt(config) {
                return Ok(question);
            }
            trace!("question attempt {} fell off the keyboard", attempt);
        }
        Err(GenerationError::TooManyAttempts {
            attempts: MAX_ATTEMPTS,
        })
    }

    fn attempt(&mut self, config: &ExerciseConfig) -> Option<Question> {
        let (band_low, band_high) = reference_band();
        let reference = Step::from_index(self.rng.gen_range(band_low..=band_high) as u8);
        match config.exercise() {
            Exercise::EdoSteps { intervals } => {
                let interval = *intervals.choose(&mut self.rng)?;
                interval_question(config, reference, interval)
            }
            Exercise::Ratio { mappings } => {
                let mapping = mappings.choose(&mut self.rng)?;
                ratio_question(config, reference, &mapping.ratio_str, mapping.steps)
            }
            Exercise::Chord { chords, inversions } => {
                let chord = chords.choose(&mut self.rng)?;
                let pivot = if *inversions && chord.intervals.len() > 1 {
                    self.rng.gen_range(0..chord.intervals.len())
                } else {
                    0
                };
                chord_question(reference, chord, pivot)
            }
        }
    }
}

fn with_name(key: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{} ({})", key, name),
        None => key.to_owned(),
    }
}

fn interval_question(config: &ExerciseConfig, reference: Step, interval: i32) -> Option<Question> {
    let target = Step::try_from_index(reference.index() + interval)?;
    let label = with_name(&interval.to_string(), config.step_name(interval));
    Some(Question {
        reference,
        sounded: reference,
        answer: vec![target],
        feedback: vec![reference, target],
        prompt: Prompt::Interval { interval },
        text: format!("Place interval: {}", label),
        reveal: format!(
            "Place interval: {} ({})",
            label,
            format_cents(config.edo(), interval)
        ),
    })
}

fn ratio_question(
    config: &ExerciseConfig,
    reference: Step,
    ratio_str: &str,
    steps: i32,
) -> Option<Question> {
    let target = Step::try_from_index(reference.index() + steps)?;
    let label = with_name(ratio_str, config.ratio_name(ratio_str));
    Some(Question {
        reference,
        sounded: reference,
        answer: vec![target],
        feedback: vec![reference, target],
        prompt: Prompt::Ratio {
            ratio_str: ratio_str.to_owned(),
            steps,
        },
        text: format!("Place ratio: {}", label),
        reveal: format!(
            "Place ratio: {} ({} steps, {})",
            label,
            steps,
            format_cents(config.edo(), steps)
        ),
    })
}

/// The pivot tone is given, so the answer is every other tone.
fn chord_question(reference: Step, chord: &Chord, pivot: usize) -> Option<Question> {
    let tones = chord
        .intervals
        .iter()
        .map(|&i| Step::try_from_index(reference.index() + i))
        .collect::<Option<Vec<Step>>>()?;
    let mut answer: Vec<Step> = tones
        .iter()
        .enumerate()
        .filter(|&(idx, _)| idx != pivot)
        .map(|(_, &step)| step)
        .collect();
    answer.sort();

    let spelled: Vec<String> = chord
        .intervals
        .iter()
        .enumerate()
        .map(|(idx, i)| {
            if idx == pivot {
                format!("_{}_", i)
            } else {
                i.to_string()
            }
        })
        .collect();
    let text = format!("Place chord: {} [{}]", chord.name, spelled.join(", "));

    Some(Question {
        reference,
        sounded: tones[pivot],
        answer,
        feedback: tones,
        prompt: Prompt::Chord {
            name: chord.name.clone(),
            intervals: chord.intervals.clone(),
            pivot,
        },
        reveal: text.clone(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Mode, RawConfig};
    use expect_test::expect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(mode: Mode, edit: impl FnOnce(&mut RawConfig)) -> ExerciseConfig {
        let mut raw = RawConfig::with_defaults(12, mode);
        edit(&mut raw);
        ExerciseConfig::resolve(&raw).unwrap()
    }

    fn generator(seed: u64) -> QuestionGenerator<StdRng> {
        QuestionGenerator::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn fifth_questions_land_seven_steps_up() {
        let config = config(Mode::EdoSteps, |raw| {
            raw.intervals = "7".to_owned();
            raw.question_count = "1".to_owned();
        });
        let mut gen = generator(1);
        for _ in 0..200 {
            let q = gen.generate(&config).unwrap();
            assert_eq!(q.answer.len(), 1);
            assert_eq!(q.answer[0].index() - q.reference.index(), 7);
            assert!(q.reference.index() >= 51 && q.reference.index() <= 75);
            assert_eq!(q.sounded, q.reference);
            assert_eq!(q.pivot_index(), None);
        }
    }

    #[test]
    fn questions_near_the_top_are_redrawn() {
        // 70 only fits for references up to 56
        let config = config(Mode::EdoSteps, |raw| {
            raw.edo = "127".to_owned();
            raw.intervals = "70".to_owned();
        });
        let mut gen = generator(7);
        for _ in 0..100 {
            let q = gen.generate(&config).unwrap();
            assert!(q.reference.index() <= 56);
            assert_eq!(q.answer[0].index(), q.reference.index() + 70);
        }
    }

    #[test]
    fn same_seed_gives_same_questions() {
        let config = config(Mode::Chord, |raw| raw.inversions = true);
        let a: Vec<Question> = {
            let mut gen = generator(42);
            (0..20).map(|_| gen.generate(&config).unwrap()).collect()
        };
        let b: Vec<Question> = {
            let mut gen = generator(42);
            (0..20).map(|_| gen.generate(&config).unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn root_position_chords_ask_for_the_upper_tones() {
        let config = config(Mode::Chord, |raw| {
            raw.chords = "[0, 4, 7] : major".to_owned();
        });
        let mut gen = generator(3);
        for _ in 0..100 {
            let q = gen.generate(&config).unwrap();
            let r = q.reference.index();
            assert_eq!(q.pivot_index(), Some(0));
            assert_eq!(q.sounded, q.reference);
            let answer: Vec<i32> = q.answer.iter().map(|s| s.index()).collect();
            assert_eq!(answer, vec![r + 4, r + 7]);
            assert_eq!(q.text, "Place chord: major [_0_, 4, 7]");
        }
    }

    #[test]
    fn inversions_give_away_a_random_tone() {
        let config = config(Mode::Chord, |raw| {
            raw.chords = "[0, 4, 7] : major".to_owned();
            raw.inversions = true;
        });
        let mut gen = generator(5);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let q = gen.generate(&config).unwrap();
            let pivot = q.pivot_index().unwrap();
            seen[pivot] = true;
            let r = q.reference.index();
            let pivot_step = r + [0, 4, 7][pivot];
            assert_eq!(q.sounded.index(), pivot_step);
            assert_eq!(q.answer.len(), 2);
            assert!(q.answer.iter().all(|s| s.index() != pivot_step));
            assert_eq!(q.feedback.len(), 3);
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn single_tone_chords_never_invert() {
        let config = config(Mode::Chord, |raw| {
            raw.chords = "[5] : lonely".to_owned();
            raw.inversions = true;
        });
        let q = generator(9).generate(&config).unwrap();
        assert_eq!(q.pivot_index(), Some(0));
        assert!(q.answer.is_empty());
    }

    #[test]
    fn ratio_questions_use_the_mapped_steps() {
        let config = config(Mode::Ratio, |raw| {
            raw.ratios = "3/2 : fifth".to_owned();
        });
        let q = generator(11).generate(&config).unwrap();
        assert_eq!(q.answer[0].index() - q.reference.index(), 7);
        expect![[r#"Place ratio: 3/2 (fifth)"#]].assert_eq(&q.text);
        expect![[r#"Place ratio: 3/2 (fifth) (7 steps, 700.0¢)"#]].assert_eq(&q.reveal);
    }

    #[test]
    fn interval_text_reveals_cents() {
        let config = config(Mode::EdoSteps, |raw| {
            raw.intervals = "4 : major third".to_owned();
        });
        let q = generator(2).generate(&config).unwrap();
        expect![[r#"Place interval: 4 (major third)"#]].assert_eq(&q.text);
        expect![[r#"Place interval: 4 (major third) (400.0¢)"#]].assert_eq(&q.reveal);
    }

    #[test]
    fn unnamed_intervals_show_just_the_number() {
        let config = config(Mode::EdoSteps, |raw| raw.intervals = "3".to_owned());
        let q = generator(2).generate(&config).unwrap();
        assert_eq!(q.text, "Place interval: 3");
    }
}
