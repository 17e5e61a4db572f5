// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a step on the keyboard is, and how it is labelled.

use std::fmt;

/// A "step" is just an index on the trainer's keyboard.
///
/// Step indices range from 0 to 126. The meaning of one step depends on the
/// tuning: in 12-EDO it is a semitone, in 31-EDO it is about 39 cents.
/// Step 63 sits in the middle of the keyboard and sounds at the tuning's
/// reference frequency.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Step(u8);

impl Step {
    /// Number of steps on the keyboard.
    pub const COUNT: i32 = 127;
    /// The fixed middle of the keyboard.
    pub const MIDDLE: Step = Step(63);

    pub fn from_index(index: u8) -> Step {
        assert!((index as i32) < Self::COUNT, "Steps only range from 0 - 126");
        Step(index)
    }

    /// Returns `None` for positions that fall off the keyboard.
    ///
    /// ```
    /// use edo_trainer::note::Step;
    ///
    /// assert_eq!(Step::try_from_index(0), Some(Step::from_index(0)));
    /// assert_eq!(Step::try_from_index(126), Some(Step::from_index(126)));
    /// assert_eq!(Step::try_from_index(127), None);
    /// assert_eq!(Step::try_from_index(-1), None);
    /// ```
    pub fn try_from_index(index: i32) -> Option<Step> {
        if Self::contains(index) {
            Some(Step(index as u8))
        } else {
            None
        }
    }

    /// Whether an unchecked index is a valid keyboard position.
    pub fn contains(index: i32) -> bool {
        index >= 0 && index < Self::COUNT
    }

    /// Return the step index in a signed type, convenient for further calculations.
    pub fn index(self) -> i32 {
        self.0 as i32
    }

    /// Position of this step within its octave, counted from the middle step.
    ///
    /// ```
    /// use edo_trainer::note::Step;
    ///
    /// assert_eq!(Step::from_index(63).step_in_octave(12), 0);
    /// assert_eq!(Step::from_index(62).step_in_octave(12), 11);
    /// assert_eq!(Step::from_index(80).step_in_octave(17), 0);
    /// ```
    pub fn step_in_octave(self, edo: u32) -> u32 {
        let edo = edo as i32;
        (self.index() - Self::MIDDLE.index()).rem_euclid(edo) as u32
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Note names used when 12-EDO is selected without a matching custom label list.
pub const DEFAULT_12_EDO_LABELS: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Display names for the steps within one octave.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteLabels {
    labels: Vec<String>,
    /// Whether the custom labels should be shown instead of the numeric `k\edo` names.
    pub enabled: bool,
}

impl NoteLabels {
    /// Parse a comma separated label list, dropping empty entries.
    ///
    /// When 12-EDO is selected and the list does not have exactly twelve entries,
    /// the standard note names are used instead.
    ///
    /// ```
    /// use edo_trainer::note::NoteLabels;
    ///
    /// let labels = NoteLabels::parse("a, b,, c", 3, true);
    /// assert_eq!(labels.labels(), &["a", "b", "c"]);
    /// assert_eq!(NoteLabels::parse("a, b", 12, true).labels().len(), 12);
    /// ```
    pub fn parse(text: &str, edo: u32, enabled: bool) -> NoteLabels {
        let mut labels: Vec<String> = text
            .split(',')
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .map(String::from)
            .collect();
        if edo == 12 && labels.len() != 12 {
            labels = DEFAULT_12_EDO_LABELS.iter().map(|&l| l.to_owned()).collect();
        }
        NoteLabels { labels, enabled }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Name of a step for display on the keyboard.
    ///
    /// Without custom labels, or when the label list is too short to cover the
    /// step's position in the octave, the name is `k\edo`.
    ///
    /// ```
    /// use edo_trainer::note::{NoteLabels, Step};
    ///
    /// let plain = NoteLabels::default();
    /// assert_eq!(plain.name(Step::from_index(65), 19), "2\\19");
    ///
    /// let named = NoteLabels::parse("", 12, true);
    /// assert_eq!(named.name(Step::from_index(70), 12), "G");
    /// ```
    pub fn name(&self, step: Step, edo: u32) -> String {
        let k = step.step_in_octave(edo);
        match self.labels.get(k as usize) {
            Some(label) if self.enabled => label.clone(),
            _ => format!("{}\\{}", k, edo),
        }
    }
}
