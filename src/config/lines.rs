// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Line oriented parsing of the free-text configuration blocks.
//!
//! Every block has one entry per line, optionally followed by `: name`.
//! Lines that cannot be read are skipped, except for chord lines, where the
//! caller decides how to report them.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use super::Chord;
use crate::ratio::canonical_text;

static NAMED_STEP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(-?\d+)\s*:\s*(.+)$").unwrap());
static NAMED_RATIO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([^:]+)\s*:\s*(.+)$").unwrap());
static CHORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[([^\]]+)\]\s*:\s*(.+)$").unwrap());

/// Non-empty, trimmed lines of a text block.
fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// A `step : name` line.
fn named_step(line: &str) -> Option<(i32, String)> {
    let caps = NAMED_STEP.captures(line)?;
    let step = caps[1].parse().ok()?;
    Some((step, caps[2].trim().to_owned()))
}

/// A `ratio : name` line. The ratio itself is not checked here.
fn named_ratio(line: &str) -> Option<(String, String)> {
    let caps = NAMED_RATIO.captures(line)?;
    Some((canonical_text(&caps[1]), caps[2].trim().to_owned()))
}

/// Intervals of the step-counting exercise, plus the names given inline.
///
/// ```
/// use edo_trainer::config::lines::parse_step_lines;
///
/// let (steps, names) = parse_step_lines("7 : fifth\n\n  4\nfoo\n-2");
/// assert_eq!(steps, vec![7, 4, -2]);
/// assert_eq!(names[&7], "fifth");
/// assert_eq!(names.len(), 1);
/// ```
pub fn parse_step_lines(text: &str) -> (Vec<i32>, BTreeMap<i32, String>) {
    let mut steps = Vec::new();
    let mut names = BTreeMap::new();
    for line in content_lines(text) {
        if let Some((step, name)) = named_step(line) {
            steps.push(step);
            names.insert(step, name);
        } else if let Ok(step) = line.parse() {
            steps.push(step);
        } else {
            log::debug!("ignoring interval line {:?}", line);
        }
    }
    (steps, names)
}

/// Names for step counts; lines without a name are ignored.
pub fn parse_step_names(text: &str) -> BTreeMap<i32, String> {
    content_lines(text).filter_map(named_step).collect()
}

/// Ratio texts of the ratio exercise, plus the names given inline.
///
/// Ratios are returned as typed; invalid ones are weeded out when mapping them to steps.
///
/// ```
/// use edo_trainer::config::lines::parse_ratio_lines;
///
/// let (ratios, names) = parse_ratio_lines("3/2 : fifth\n5 / 4");
/// assert_eq!(ratios, vec!["3/2", "5 / 4"]);
/// assert_eq!(names["3/2"], "fifth");
/// ```
pub fn parse_ratio_lines(text: &str) -> (Vec<String>, HashMap<String, String>) {
    let mut ratios = Vec::new();
    let mut names = HashMap::new();
    for line in content_lines(text) {
        if let Some((ratio, name)) = named_ratio(line) {
            ratios.push(ratio.clone());
            names.insert(ratio, name);
        } else {
            ratios.push(line.to_owned());
        }
    }
    (ratios, names)
}

/// Names for ratios, keyed by their canonical spelling.
pub fn parse_ratio_names(text: &str) -> HashMap<String, String> {
    content_lines(text).filter_map(named_ratio).collect()
}

/// A `[i1, i2, ...] : name` line.
///
/// Entries that are not integers are dropped. Returns `None` if nothing
/// usable is left or the line does not have the chord shape at all.
///
/// ```
/// use edo_trainer::config::lines::parse_chord_line;
///
/// let chord = parse_chord_line("[0, 4, 7] : major").unwrap();
/// assert_eq!(chord.intervals, vec![0, 4, 7]);
/// assert_eq!(chord.name, "major");
/// assert!(parse_chord_line("0 4 7 major").is_none());
/// assert!(parse_chord_line("[x, y] : nothing").is_none());
/// ```
pub fn parse_chord_line(line: &str) -> Option<Chord> {
    let caps = CHORD.captures(line)?;
    let intervals: Vec<i32> = caps[1]
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    let name = caps[2].trim();
    if intervals.is_empty() || name.is_empty() {
        return None;
    }
    Some(Chord {
        intervals,
        name: name.to_owned(),
    })
}

/// All chord lines of a block, or the first line that is not a chord.
pub fn parse_chord_lines(text: &str) -> Result<Vec<Chord>, String> {
    content_lines(text)
        .map(|line| parse_chord_line(line).ok_or_else(|| line.to_owned()))
        .collect()
}
