// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Turning the text entered by the user into a validated exercise configuration.

pub mod lines;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use log::info;
use snafu::Snafu;

use crate::audio::Waveform;
use crate::catalog::{self, RatioMapping, INTERVAL_THRESHOLD};
use crate::note::NoteLabels;
use crate::question;
use crate::tuning::{Tuning, MAX_EDO};

/// The three kinds of exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Place an interval given as a number of steps.
    EdoSteps,
    /// Place the step approximating a just ratio.
    Ratio,
    /// Complete a chord from one given tone.
    Chord,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edo-steps" => Ok(Mode::EdoSteps),
            "ratio" => Ok(Mode::Ratio),
            "chord" => Ok(Mode::Chord),
            other => Err(format!(
                "unknown mode {:?}, expected edo-steps, ratio or chord",
                other
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::EdoSteps => "edo-steps",
            Mode::Ratio => "ratio",
            Mode::Chord => "chord",
        })
    }
}

/// A chord given as step offsets from its root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub intervals: Vec<i32>,
    pub name: String,
}

/// The exercise material of one session.
#[derive(Debug, Clone, PartialEq)]
pub enum Exercise {
    EdoSteps { intervals: Vec<i32> },
    Ratio { mappings: Vec<RatioMapping> },
    Chord { chords: Vec<Chord>, inversions: bool },
}

impl Exercise {
    pub fn mode(&self) -> Mode {
        match self {
            Exercise::EdoSteps { .. } => Mode::EdoSteps,
            Exercise::Ratio { .. } => Mode::Ratio,
            Exercise::Chord { .. } => Mode::Chord,
        }
    }
}

/// Configuration exactly as entered, before any validation.
#[derive(Debug, Clone)]
pub struct RawConfig {
    pub edo: String,
    pub question_count: String,
    pub mode: Mode,
    pub synth: String,
    pub note_labels: String,
    pub use_custom_labels: bool,
    pub intervals: String,
    pub ratios: String,
    pub chords: String,
    pub inversions: bool,
    /// Extra `step : name` lines, overridden by names given in `intervals`.
    pub step_names: String,
    /// Extra `ratio : name` lines, overridden by names given in `ratios`.
    pub ratio_names: String,
}

impl RawConfig {
    /// The configuration form as first shown for an EDO: interval and chord
    /// lists are prefilled from the reference ratios.
    pub fn with_defaults(edo: u32, mode: Mode) -> RawConfig {
        RawConfig {
            edo: edo.to_string(),
            question_count: "10".to_owned(),
            mode,
            synth: Waveform::Sine.to_string(),
            note_labels: String::new(),
            use_custom_labels: false,
            intervals: catalog::default_interval_text(edo),
            ratios: catalog::default_ratio_text(),
            chords: catalog::default_chord_text(edo),
            inversions: false,
            step_names: String::new(),
            ratio_names: String::new(),
        }
    }
}

/// Reasons for rejecting a configuration. All of them can be fixed by the user.
#[derive(Debug, PartialEq, Snafu)]
pub enum ValidationError {
    #[snafu(display("Please enter a valid EDO between 1 and {}, got {:?}", max, value))]
    InvalidEdo { value: String, max: u32 },
    #[snafu(display("Please enter a valid question count, got {:?}", value))]
    InvalidQuestionCount { value: String },
    #[snafu(display("Unknown synth type {:?}", value))]
    UnknownWaveform { value: String },
    #[snafu(display("Please enter at least one valid interval"))]
    NoIntervals,
    #[snafu(display("Intervals must be between 1 and {}, got {:?}", max, invalid))]
    IntervalsOutOfRange { max: i32, invalid: Vec<i32> },
    #[snafu(display("Please enter at least one ratio"))]
    NoRatios,
    #[snafu(display("No valid ratios found with error < {}% for {}-EDO", threshold, edo))]
    NoValidRatios { edo: u32, threshold: f64 },
    #[snafu(display("Please enter at least one chord"))]
    NoChords,
    #[snafu(display("Invalid chord format: {}\nExpected format: [0, 4, 7] : major", line))]
    MalformedChord { line: String },
    #[snafu(display("Chord {:?} has intervals outside the range 0 to {}", name, max))]
    ChordOutOfRange { name: String, max: i32 },
    #[snafu(display("None of the configured {} exercises fits on the keyboard", mode))]
    Unplayable { mode: Mode },
}

/// A validated configuration for one session. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseConfig {
    tuning: Tuning,
    question_count: usize,
    waveform: Waveform,
    labels: NoteLabels,
    step_names: BTreeMap<i32, String>,
    ratio_names: HashMap<String, String>,
    exercise: Exercise,
}

impl ExerciseConfig {
    /// Validate raw user input.
    ///
    /// Names from the auxiliary name blocks are merged first, so that names
    /// given inline in the exercise list take precedence.
    pub fn resolve(raw: &RawConfig) -> Result<ExerciseConfig, ValidationError> {
        let edo = match raw.edo.trim().parse::<u32>() {
            Ok(edo) if edo >= 1 && edo <= MAX_EDO => edo,
            _ => {
                return Err(ValidationError::InvalidEdo {
                    value: raw.edo.clone(),
                    max: MAX_EDO,
                })
            }
        };
        let question_count = match raw.question_count.trim().parse::<usize>() {
            Ok(count) if count >= 1 => count,
            _ => {
                return Err(ValidationError::InvalidQuestionCount {
                    value: raw.question_count.clone(),
                })
            }
        };
        let waveform = raw
            .synth
            .trim()
            .parse::<Waveform>()
            .map_err(|_| ValidationError::UnknownWaveform {
                value: raw.synth.clone(),
            })?;

        let labels = NoteLabels::parse(&raw.note_labels, edo, raw.use_custom_labels);
        let mut step_names = lines::parse_step_names(&raw.step_names);
        let mut ratio_names = lines::parse_ratio_names(&raw.ratio_names);

        let exercise = match raw.mode {
            Mode::EdoSteps => {
                let (intervals, names) = lines::parse_step_lines(&raw.intervals);
                step_names.extend(names);
                resolve_intervals(edo, intervals)?
            }
            Mode::Ratio => {
                let (ratios, names) = lines::parse_ratio_lines(&raw.ratios);
                ratio_names.extend(names);
                resolve_ratios(edo, &ratios)?
            }
            Mode::Chord => resolve_chords(edo, &raw.chords, raw.inversions)?,
        };

        if !question::is_playable(&exercise) {
            return Err(ValidationError::Unplayable {
                mode: exercise.mode(),
            });
        }

        info!(
            "{} exercise in {}-EDO with {} questions",
            exercise.mode(),
            edo,
            question_count
        );

        Ok(ExerciseConfig {
            tuning: Tuning::new(edo),
            question_count,
            waveform,
            labels,
            step_names,
            ratio_names,
            exercise,
        })
    }

    pub fn edo(&self) -> u32 {
        self.tuning.edo
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn mode(&self) -> Mode {
        self.exercise.mode()
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn labels(&self) -> &NoteLabels {
        &self.labels
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn step_name(&self, steps: i32) -> Option<&str> {
        self.step_names.get(&steps).map(String::as_str)
    }

    pub fn ratio_name(&self, ratio_str: &str) -> Option<&str> {
        self.ratio_names.get(ratio_str).map(String::as_str)
    }
}

fn resolve_intervals(edo: u32, intervals: Vec<i32>) -> Result<Exercise, ValidationError> {
    if intervals.is_empty() {
        return Err(ValidationError::NoIntervals);
    }
    let edo = edo as i32;
    let invalid: Vec<i32> = intervals
        .iter()
        .copied()
        .filter(|&i| i < 1 || i >= edo)
        .collect();
    if !invalid.is_empty() {
        return Err(ValidationError::IntervalsOutOfRange {
            max: edo - 1,
            invalid,
        });
    }
    Ok(Exercise::EdoSteps { intervals })
}

/// Ratios too far from any step are dropped one by one, without complaint.
fn resolve_ratios(edo: u32, ratios: &[String]) -> Result<Exercise, ValidationError> {
    if ratios.is_empty() {
        return Err(ValidationError::NoRatios);
    }
    let mappings = catalog::map_ratios_to_steps(edo, ratios, INTERVAL_THRESHOLD);
    if mappings.is_empty() {
        return Err(ValidationError::NoValidRatios {
            edo,
            threshold: INTERVAL_THRESHOLD,
        });
    }
    if mappings.len() < ratios.len() {
        log::debug!(
            "dropped {} of {} ratios in {}-EDO",
            ratios.len() - mappings.len(),
            ratios.len(),
            edo
        );
    }
    Ok(Exercise::Ratio { mappings })
}

fn resolve_chords(edo: u32, text: &str, inversions: bool) -> Result<Exercise, ValidationError> {
    let chords = lines::parse_chord_lines(text).map_err(|line| ValidationError::MalformedChord { line })?;
    if chords.is_empty() {
        return Err(ValidationError::NoChords);
    }
    let edo = edo as i32;
    if let Some(chord) = chords
        .iter()
        .find(|c| c.intervals.iter().any(|&i| i < 0 || i >= edo))
    {
        return Err(ValidationError::ChordOutOfRange {
            name: chord.name.clone(),
            max: edo - 1,
        });
    }
    Ok(Exercise::Chord { chords, inversions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(edo: &str, mode: Mode) -> RawConfig {
        let mut raw = RawConfig::with_defaults(12, mode);
        raw.edo = edo.to_owned();
        raw
    }

    #[test]
    fn edo_must_be_between_1_and_127() {
        for bad in &["0", "128", "-3", "twelve", ""] {
            let err = ExerciseConfig::resolve(&raw(bad, Mode::EdoSteps)).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidEdo { .. }), "{}", bad);
        }
        let mut ok = raw("127", Mode::EdoSteps);
        ok.intervals = "1\n70".to_owned();
        assert!(ExerciseConfig::resolve(&ok).is_ok());
    }

    #[test]
    fn question_count_must_be_positive() {
        let mut r = raw("12", Mode::EdoSteps);
        r.question_count = "0".to_owned();
        assert_eq!(
            ExerciseConfig::resolve(&r),
            Err(ValidationError::InvalidQuestionCount { value: "0".to_owned() })
        );
    }

    #[test]
    fn unknown_synth_is_rejected() {
        let mut r = raw("12", Mode::EdoSteps);
        r.synth = "theremin".to_owned();
        assert!(matches!(
            ExerciseConfig::resolve(&r),
            Err(ValidationError::UnknownWaveform { .. })
        ));
    }

    #[test]
    fn intervals_outside_the_octave_are_listed() {
        let mut r = raw("12", Mode::EdoSteps);
        r.intervals = "0\n7 : fifth\n12\n3".to_owned();
        let err = ExerciseConfig::resolve(&r).unwrap_err();
        assert_eq!(
            err,
            ValidationError::IntervalsOutOfRange {
                max: 11,
                invalid: vec![0, 12]
            }
        );
        assert_eq!(err.to_string(), "Intervals must be between 1 and 11, got [0, 12]");
    }

    #[test]
    fn empty_interval_list_is_rejected() {
        let mut r = raw("12", Mode::EdoSteps);
        r.intervals = "\n  \nfoo".to_owned();
        assert_eq!(ExerciseConfig::resolve(&r), Err(ValidationError::NoIntervals));
    }

    #[test]
    fn inline_names_override_auxiliary_names() {
        let mut r = raw("12", Mode::EdoSteps);
        r.intervals = "7 : fifth\n4".to_owned();
        r.step_names = "7 : perfect fifth\n4 : major third".to_owned();
        let config = ExerciseConfig::resolve(&r).unwrap();
        assert_eq!(config.step_name(7), Some("fifth"));
        assert_eq!(config.step_name(4), Some("major third"));
        assert_eq!(config.step_name(5), None);
        assert_eq!(config.exercise(), &Exercise::EdoSteps { intervals: vec![7, 4] });
    }

    #[test]
    fn ratio_mode_drops_individual_ratios_silently() {
        let mut r = raw("12", Mode::Ratio);
        r.ratios = "3/2 : fifth\n11/8\nnot a ratio\n5/4".to_owned();
        r.ratio_names = "3/2 : just fifth\n5/4 : third".to_owned();
        let config = ExerciseConfig::resolve(&r).unwrap();
        match config.exercise() {
            Exercise::Ratio { mappings } => {
                // 11/8 is almost exactly between two semitones
                let kept: Vec<&str> = mappings.iter().map(|m| m.ratio_str.as_str()).collect();
                assert_eq!(kept, vec!["3/2", "5/4"]);
            }
            other => panic!("unexpected exercise {:?}", other),
        }
        assert_eq!(config.ratio_name("3/2"), Some("fifth"));
        assert_eq!(config.ratio_name("5/4"), Some("third"));
    }

    #[test]
    fn ratio_mode_needs_one_usable_ratio() {
        let mut r = raw("12", Mode::Ratio);
        r.ratios = "11/8\nabc".to_owned();
        assert_eq!(
            ExerciseConfig::resolve(&r),
            Err(ValidationError::NoValidRatios {
                edo: 12,
                threshold: 40.0
            })
        );
        r.ratios = String::new();
        assert_eq!(ExerciseConfig::resolve(&r), Err(ValidationError::NoRatios));
    }

    #[test]
    fn chord_mode_rejects_the_whole_config_for_one_bad_line() {
        let mut r = raw("12", Mode::Chord);
        r.chords = "[0, 4, 7] : major\n0 3 7 minor".to_owned();
        let err = ExerciseConfig::resolve(&r).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedChord {
                line: "0 3 7 minor".to_owned()
            }
        );
        assert!(err.to_string().starts_with("Invalid chord format: 0 3 7 minor"));
    }

    #[test]
    fn chord_tones_must_lie_within_one_octave() {
        let mut r = raw("12", Mode::Chord);
        r.chords = "[0, 4, 7] : major\n[0, 4, 14] : wide".to_owned();
        assert_eq!(
            ExerciseConfig::resolve(&r),
            Err(ValidationError::ChordOutOfRange {
                name: "wide".to_owned(),
                max: 11
            })
        );
    }

    #[test]
    fn chord_mode_keeps_inversion_flag() {
        let mut r = raw("12", Mode::Chord);
        r.inversions = true;
        let config = ExerciseConfig::resolve(&r).unwrap();
        match config.exercise() {
            Exercise::Chord { chords, inversions } => {
                assert!(*inversions);
                assert_eq!(chords.len(), 5);
            }
            other => panic!("unexpected exercise {:?}", other),
        }
    }

    #[test]
    fn intervals_that_never_fit_are_rejected_up_front() {
        let mut r = raw("127", Mode::EdoSteps);
        r.intervals = "100\n110".to_owned();
        assert_eq!(
            ExerciseConfig::resolve(&r),
            Err(ValidationError::Unplayable { mode: Mode::EdoSteps })
        );
        r.intervals = "100\n75".to_owned();
        assert!(ExerciseConfig::resolve(&r).is_ok());
    }

    #[test]
    fn twelve_edo_labels_fall_back_to_note_names() {
        let mut r = raw("12", Mode::EdoSteps);
        r.note_labels = "do, re, mi".to_owned();
        r.use_custom_labels = true;
        let config = ExerciseConfig::resolve(&r).unwrap();
        assert_eq!(config.labels().labels()[1], "Db");
    }
}
