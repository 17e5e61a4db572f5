// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Named just-intonation ratios and chords, and their best approximations in an EDO.

use std::collections::BTreeMap;

use crate::ratio::canonical_text;
use crate::tuning::{best_step_approximation, parse_ratio, relative_error};

/// Maximum error (in percent of a step) for a ratio to be usable as an interval.
pub const INTERVAL_THRESHOLD: f64 = 40.0;
/// Maximum error (in percent of a step) for a ratio to be usable as a chord tone.
pub const CHORD_THRESHOLD: f64 = 50.0;

/// A just ratio with its traditional name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedRatio {
    pub ratio: &'static str,
    pub name: &'static str,
}

/// A chord spelled as just ratios above its root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordFormula {
    pub name: &'static str,
    pub ratios: &'static [&'static str],
}

const fn named(ratio: &'static str, name: &'static str) -> NamedRatio {
    NamedRatio { ratio, name }
}

/// The reference intervals, in order of precedence for naming.
pub const RATIOS: [NamedRatio; 14] = [
    named("8/7", "septimal major second"),
    named("10/9", "minor whole tone"),
    named("9/8", "major second"),
    named("6/5", "minor third"),
    named("5/4", "major third"),
    named("4/3", "perfect fourth"),
    named("7/5", "lesser septimal tritone"),
    named("10/7", "greater septimal tritone"),
    named("3/2", "perfect fifth"),
    named("8/5", "minor sixth"),
    named("5/3", "major sixth"),
    named("9/5", "minor seventh"),
    named("7/4", "harmonic seventh"),
    named("15/8", "major seventh"),
];

const DOM7: ChordFormula = ChordFormula {
    name: "dom7",
    ratios: &["1/1", "5/4", "3/2", "9/5"],
};

const HARMONIC7: &str = "harmonic7";

pub const CHORDS: [ChordFormula; 6] = [
    ChordFormula {
        name: "major",
        ratios: &["1/1", "5/4", "3/2"],
    },
    ChordFormula {
        name: "minor",
        ratios: &["1/1", "6/5", "3/2"],
    },
    ChordFormula {
        name: "maj7",
        ratios: &["1/1", "5/4", "3/2", "15/8"],
    },
    ChordFormula {
        name: "min7",
        ratios: &["1/1", "6/5", "3/2", "9/5"],
    },
    DOM7,
    ChordFormula {
        name: HARMONIC7,
        ratios: &["1/1", "5/4", "3/2", "7/4"],
    },
];

/// The best approximation of a just ratio in some EDO.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioMapping {
    pub ratio: f64,
    /// The ratio as entered, without whitespace.
    pub ratio_str: String,
    pub steps: i32,
    /// Distance between `steps` and the exact ratio, in percent of one step.
    pub error: f64,
}

/// Approximate each ratio in the given EDO, in input order.
///
/// Unparseable and non-positive ratios are skipped, as are ratios whose
/// approximation error is `threshold` percent or more.
///
/// ```
/// use edo_trainer::catalog::map_ratios_to_steps;
///
/// let mapped = map_ratios_to_steps(12, &["3/2", "oops", "7/4"], 30.0);
/// assert_eq!(mapped.len(), 1);
/// assert_eq!(mapped[0].steps, 7);
/// ```
pub fn map_ratios_to_steps<S: AsRef<str>>(edo: u32, ratios: &[S], threshold: f64) -> Vec<RatioMapping> {
    let mut mappings = Vec::new();
    for text in ratios {
        let text = text.as_ref();
        let ratio = match parse_ratio(text) {
            Ok(ratio) if ratio > 0.0 => ratio,
            _ => {
                log::trace!("skipping ratio {:?}", text);
                continue;
            }
        };
        let error = relative_error(edo, ratio);
        if error < threshold {
            mappings.push(RatioMapping {
                ratio,
                ratio_str: canonical_text(text),
                steps: best_step_approximation(edo, ratio),
                error,
            });
        } else {
            log::trace!("{} is off by {:.1}% in {}-EDO", text, error, edo);
        }
    }
    mappings
}

/// Pick a name for every step that approximates one of the reference ratios.
///
/// When several ratios collapse onto the same step, the one with the lowest
/// error wins, except that the two septimal tritones together are simply a "tritone".
pub fn default_interval_naming(edo: u32) -> BTreeMap<i32, String> {
    let ratio_texts: Vec<&str> = RATIOS.iter().map(|r| r.ratio).collect();
    let mappings = map_ratios_to_steps(edo, &ratio_texts, INTERVAL_THRESHOLD);

    let mut by_step: BTreeMap<i32, Vec<(NamedRatio, f64)>> = BTreeMap::new();
    for mapping in &mappings {
        if let Some(info) = RATIOS.iter().find(|r| r.ratio == mapping.ratio_str) {
            by_step
                .entry(mapping.steps)
                .or_default()
                .push((*info, mapping.error));
        }
    }

    by_step
        .into_iter()
        .map(|(step, candidates)| (step, best_name(&candidates).to_owned()))
        .collect()
}

fn best_name(candidates: &[(NamedRatio, f64)]) -> &'static str {
    let is_tritone_pair = candidates.len() == 2
        && candidates.iter().any(|(r, _)| r.ratio == "7/5")
        && candidates.iter().any(|(r, _)| r.ratio == "10/7");
    if is_tritone_pair {
        return "tritone";
    }
    let mut best = &candidates[0];
    for candidate in &candidates[1..] {
        // strictly smaller, so the first seen wins on ties
        if candidate.1 < best.1 {
            best = candidate;
        }
    }
    best.0.name
}

/// A chord from the catalog as it sounds in some EDO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSuggestion {
    pub steps: Vec<i32>,
    pub name: &'static str,
}

/// Steps of a chord given as ratios, or `None` if any tone cannot be approximated.
pub(crate) fn chord_steps(edo: u32, ratios: &[&str], threshold: f64) -> Option<Vec<i32>> {
    let mappings = map_ratios_to_steps(edo, ratios, threshold);
    if mappings.len() == ratios.len() {
        Some(mappings.iter().map(|m| m.steps).collect())
    } else {
        None
    }
}

/// The catalog chords that can be played in the given EDO.
///
/// A chord is left out entirely if one of its tones cannot be approximated.
/// The harmonic seventh chord is left out when it is indistinguishable from
/// the dominant seventh chord.
pub fn default_chord_suggestions(edo: u32) -> Vec<ChordSuggestion> {
    let mut suggestions = Vec::new();
    for chord in CHORDS.iter() {
        let steps = match chord_steps(edo, chord.ratios, CHORD_THRESHOLD) {
            Some(steps) => steps,
            None => continue,
        };
        if chord.name == HARMONIC7 {
            let dom7 = chord_steps(edo, DOM7.ratios, CHORD_THRESHOLD);
            if dom7.as_ref() == Some(&steps) {
                log::debug!("harmonic7 coincides with dom7 in {}-EDO", edo);
                continue;
            }
        }
        suggestions.push(ChordSuggestion {
            steps,
            name: chord.name,
        });
    }
    suggestions
}

/// Interval list prefilled for an EDO, one `step : name` line per distinct step.
pub fn default_interval_text(edo: u32) -> String {
    default_interval_naming(edo)
        .iter()
        .map(|(step, name)| format!("{} : {}", step, name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Chord list prefilled for an EDO, one `[steps] : name` line per chord.
pub fn default_chord_text(edo: u32) -> String {
    default_chord_suggestions(edo)
        .iter()
        .map(|chord| {
            let steps: Vec<String> = chord.steps.iter().map(|s| s.to_string()).collect();
            format!("[{}] : {}", steps.join(", "), chord.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ratio list prefilled for ratio mode, one `ratio : name` line per reference ratio.
pub fn default_ratio_text() -> String {
    RATIOS
        .iter()
        .map(|r| format!("{} : {}", r.ratio, r.name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn septimal_tritones_share_a_step_in_12_edo() {
        let mapped = map_ratios_to_steps(12, &["7/5", "10/7"], CHORD_THRESHOLD);
        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].steps, 6);
        assert_eq!(mapped[1].steps, 6);
        assert_eq!(default_interval_naming(12)[&6], "tritone");
    }

    #[test]
    fn septimal_tritones_keep_their_names_in_31_edo() {
        let names = default_interval_naming(31);
        assert_eq!(names[&15], "lesser septimal tritone");
        assert_eq!(names[&16], "greater septimal tritone");
    }

    #[test]
    fn mapping_skips_bad_ratios_and_keeps_input_order() {
        let mapped = map_ratios_to_steps(12, &["5/4", "abc", "3/0", "-3/2", "0/1", " 3 / 2 ", "9/8"], 40.0);
        let strs: Vec<&str> = mapped.iter().map(|m| m.ratio_str.as_str()).collect();
        assert_eq!(strs, vec!["5/4", "3/2", "9/8"]);
        assert_eq!(mapped.iter().map(|m| m.steps).collect::<Vec<_>>(), vec![4, 7, 2]);
        for m in &mapped {
            assert!(m.error >= 0.0 && m.error < 40.0);
        }
    }

    #[test]
    fn mapping_drops_ratios_at_or_above_threshold() {
        // 7/4 is about 31% of a semitone off in 12-EDO
        assert_eq!(map_ratios_to_steps(12, &["7/4"], 40.0).len(), 1);
        assert!(map_ratios_to_steps(12, &["7/4"], 31.0).is_empty());
    }

    #[test]
    fn decimal_ratios_are_mapped() {
        let mapped = map_ratios_to_steps(12, &["1.5/1", "2.5/2"], INTERVAL_THRESHOLD);
        assert_eq!(mapped.iter().map(|m| m.steps).collect::<Vec<_>>(), vec![7, 4]);
        assert_eq!(mapped[0].ratio_str, "1.5/1");
    }

    #[test]
    fn extreme_integers_are_skipped_without_failing() {
        let mapped = map_ratios_to_steps(
            12,
            &["3/2", "-9223372036854775808/1", "99999999999999999999/66666666666666666666"],
            INTERVAL_THRESHOLD,
        );
        assert_eq!(mapped.iter().map(|m| m.steps).collect::<Vec<_>>(), vec![7, 7]);
    }

    #[test]
    fn lowest_error_names_a_crowded_step() {
        // 8/7, 10/9 and 9/8 all land on step 2 of 12-EDO; 9/8 is closest
        assert_eq!(default_interval_naming(12)[&2], "major second");
        // 9/5 beats 7/4 on step 10
        assert_eq!(default_interval_naming(12)[&10], "minor seventh");
    }

    #[test]
    fn default_intervals_for_12_edo() {
        expect![[r#"
            2 : major second
            3 : minor third
            4 : major third
            5 : perfect fourth
            6 : tritone
            7 : perfect fifth
            8 : minor sixth
            9 : major sixth
            10 : minor seventh
            11 : major seventh"#]]
        .assert_eq(&default_interval_text(12));
    }

    #[test]
    fn harmonic_seventh_is_dropped_when_it_equals_dom7() {
        let steps_12 = chord_steps(12, &["1/1", "5/4", "3/2", "9/5"], 50.0);
        let harm_12 = chord_steps(12, &["1/1", "5/4", "3/2", "7/4"], 50.0);
        assert_eq!(steps_12, harm_12);

        let names: Vec<&str> = default_chord_suggestions(12).iter().map(|c| c.name).collect();
        assert!(names.contains(&"dom7"));
        assert!(!names.contains(&"harmonic7"));

        expect![[r#"
            [0, 4, 7] : major
            [0, 3, 7] : minor
            [0, 4, 7, 11] : maj7
            [0, 3, 7, 10] : min7
            [0, 4, 7, 10] : dom7"#]]
        .assert_eq(&default_chord_text(12));
    }

    #[test]
    fn harmonic_seventh_is_kept_when_distinct() {
        let chords = default_chord_suggestions(31);
        let harmonic = chords.iter().find(|c| c.name == "harmonic7").expect("harmonic7 in 31-EDO");
        let dom7 = chords.iter().find(|c| c.name == "dom7").expect("dom7 in 31-EDO");
        assert_eq!(harmonic.steps, vec![0, 10, 18, 25]);
        assert_eq!(dom7.steps, vec![0, 10, 18, 26]);
    }

    #[test]
    fn chords_with_an_unmappable_tone_are_dropped_whole() {
        assert_eq!(chord_steps(12, &["1/1", "5/4", "x/4"], 50.0), None);
        assert_eq!(chord_steps(12, &["1/1", "5/4"], 50.0), Some(vec![0, 4]));
    }

    #[test]
    fn default_ratio_text_lists_every_reference_ratio() {
        let text = default_ratio_text();
        assert_eq!(text.lines().count(), RATIOS.len());
        assert!(text.starts_with("8/7 : septimal major second"));
    }
}
