// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This namespace contains everything turning steps into sound.
//!
//! The exercise logic only emits [`Cue`]s. A [`CuePlayer`] decides what to do
//! with them and never reports back, so playback can not hold up a session.

pub mod envelope;
pub mod oscillator;
pub mod sox;

pub use envelope::*;
pub use oscillator::*;
pub use sox::SoxPlayer;

use log::debug;

use crate::note::Step;
use crate::tuning::Tuning;

/// How long the given tone of a question sounds, in seconds.
pub const REFERENCE_DURATION: f64 = 0.5;
/// How long the interval or chord sounds after answering, in seconds.
pub const FEEDBACK_DURATION: f64 = 1.0;
/// Overall output level applied after the envelopes.
pub const MASTER_GAIN: f64 = 0.3;

/// Convenience type for making things stereo, e.g. individual samples or whole buffers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stereo<T> {
    pub left: T,
    pub right: T,
}

impl<T: Copy> Stereo<T> {
    pub fn mono(value: T) -> Stereo<T> {
        Stereo {
            left: value,
            right: value,
        }
    }
}

/// An instruction to sound something.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    /// Sound a single step.
    Note { step: Step, duration: f64 },
    /// Sound several steps at once.
    Chord { steps: Vec<Step>, duration: f64 },
}

impl Cue {
    pub fn duration(&self) -> f64 {
        match self {
            Cue::Note { duration, .. } | Cue::Chord { duration, .. } => *duration,
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        match self {
            Cue::Note { step, .. } => vec![*step],
            Cue::Chord { steps, .. } => steps.clone(),
        }
    }

    fn envelope(&self) -> &'static Envelope {
        match self {
            Cue::Note { .. } => &Envelope::NOTE,
            Cue::Chord { .. } => &Envelope::CHORD,
        }
    }
}

/// Something that can sound cues. Playing is fire-and-forget.
pub trait CuePlayer {
    fn play(&mut self, cue: &Cue);
}

/// Only logs the cues, for running without a sound device.
pub struct SilentPlayer {
    tuning: Tuning,
}

impl SilentPlayer {
    pub fn new(tuning: Tuning) -> Self {
        SilentPlayer { tuning }
    }
}

impl CuePlayer for SilentPlayer {
    fn play(&mut self, cue: &Cue) {
        let freqs: Vec<String> = cue
            .steps()
            .iter()
            .map(|&s| format!("{:.2}", self.tuning.frequency(s)))
            .collect();
        debug!("cue {:?} at [{}] Hz", cue, freqs.join(", "));
    }
}

/// Synthesize a cue.
pub fn render(cue: &Cue, tuning: &Tuning, shape: Waveform, sample_rate: f64) -> Vec<Stereo<f64>> {
    let num_samples = (cue.duration() * sample_rate).round() as usize;
    let mut output = vec![Stereo::mono(0.0); num_samples];
    for step in cue.steps() {
        let mut osc = Oscillator::new(shape, sample_rate, tuning.frequency(step));
        let mut env = cue.envelope().instantiate(cue.duration(), sample_rate);
        for out_sample in output.iter_mut() {
            let value = osc.next_sample() * env.step() * MASTER_GAIN;
            out_sample.left += value;
            out_sample.right += value;
        }
    }
    output
}
