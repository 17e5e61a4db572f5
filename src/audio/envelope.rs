// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

/// An attack-release envelope for a note of known length.
/// The amplitude rises from zero to `peak` over `attack` seconds, and falls
/// back to zero over the last `release` seconds of the note. If the note is
/// too short for both, the two ramps meet wherever they cross.
///
/// # Example
///
/// ```
/// use edo_trainer::audio::Envelope;
/// let e = Envelope {
///     attack: 0.5,
///     release: 1.0,
///     peak: 0.5,
/// };
/// let mut eval = e.instantiate(2.0, 4.0); // 4 samples per second
/// let gains: Vec<f64> = (0..8).map(|_| eval.step()).collect();
/// assert_eq!(gains, vec![0.0, 0.25, 0.5, 0.5, 0.5, 0.375, 0.25, 0.125]);
/// assert_eq!(eval.step(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Time in seconds to go from 0.0 to `peak`.
    pub attack: f64,
    /// Time in seconds to go from `peak` to 0.0 at the end of the note.
    pub release: f64,
    /// Amplitude while the note is held.
    pub peak: f64,
}

impl Envelope {
    /// Envelope for a single sounding step.
    pub const NOTE: Envelope = Envelope {
        attack: 0.02,
        release: 0.5,
        peak: 0.7,
    };

    /// Envelope for each tone of a chord, a bit softer than a single note.
    pub const CHORD: Envelope = Envelope {
        attack: 0.02,
        release: 0.5,
        peak: 0.5,
    };

    pub fn instantiate(&self, duration: f64, sample_rate: f64) -> EvalEnvelope {
        EvalEnvelope {
            attack_samples: (self.attack * sample_rate).round() as usize,
            release_samples: (self.release * sample_rate).round() as usize,
            total_samples: (duration * sample_rate).round() as usize,
            peak: self.peak,
            current_sample: 0,
        }
    }
}

/// Sample-exact evaluator for an `Envelope`.
pub struct EvalEnvelope {
    attack_samples: usize,
    release_samples: usize,
    total_samples: usize,
    peak: f64,
    current_sample: usize,
}

impl EvalEnvelope {
    /// Called for every sample, returning the envelope gain at that sample.
    pub fn step(&mut self) -> f64 {
        let gain = self.compute_gain();
        if self.current_sample < self.total_samples {
            self.current_sample += 1;
        }
        gain
    }

    fn compute_gain(&self) -> f64 {
        let n = self.current_sample;
        if n >= self.total_samples {
            return 0.0;
        }
        let rising = if n < self.attack_samples {
            n as f64 / self.attack_samples as f64
        } else {
            1.0
        };
        let remaining = self.total_samples - n;
        let falling = if remaining < self.release_samples {
            remaining as f64 / self.release_samples as f64
        } else {
            1.0
        };
        self.peak * rising.min(falling)
    }

    /// The envelope has faded when all subsequent `step` calls would return zero.
    pub fn faded(&self) -> bool {
        self.current_sample >= self.total_samples
    }
}
