// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use std::fmt;
use std::str::FromStr;

/// Shape of the synthesized tone.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "sawtooth" => Ok(Waveform::Sawtooth),
            "triangle" => Ok(Waveform::Triangle),
            other => Err(format!("unknown waveform {:?}", other)),
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        })
    }
}

/// An oscillator sampling a wave of some shape at a fixed sample rate.
#[derive(Debug)]
pub struct Oscillator {
    shape: Waveform,
    sample_rate: f64,
    frequency: f64,
    phase_offset: f64,
}

impl Oscillator {
    pub fn new(shape: Waveform, sample_rate: f64, frequency: f64) -> Self {
        Self {
            shape,
            sample_rate,
            frequency,
            phase_offset: 0.0,
        }
    }

    /// Next sample in `[-1, 1]`.
    ///
    /// ```
    /// use edo_trainer::audio::{Oscillator, Waveform};
    ///
    /// let mut osc = Oscillator::new(Waveform::Square, 4.0, 1.0);
    /// let samples: Vec<f64> = (0..4).map(|_| osc.next_sample()).collect();
    /// assert_eq!(samples, vec![1.0, 1.0, -1.0, -1.0]);
    /// ```
    pub fn next_sample(&mut self) -> f64 {
        let phase = self.phase_offset;
        // Increment phase
        let phase_increment = self.frequency / self.sample_rate;
        self.phase_offset += phase_increment;
        while self.phase_offset >= 1.0 {
            self.phase_offset -= 1.0;
        }
        // Compute wave
        use std::f64::consts::PI;
        match self.shape {
            Waveform::Sine => (phase * 2.0 * PI).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Triangle => {
                if phase < 0.5 {
                    4.0 * phase - 1.0
                } else {
                    3.0 - 4.0 * phase
                }
            }
        }
    }
}
