// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Easy interface for getting sound to play using a sox subprocess.

use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use log::error;

use super::{render, Cue, CuePlayer, Stereo, Waveform};
use crate::tuning::Tuning;

/// Plays every cue through its own `play` process, on a background thread.
pub struct SoxPlayer {
    play_bin: PathBuf,
    tuning: Tuning,
    shape: Waveform,
    sample_rate: i32,
}

impl SoxPlayer {
    pub fn new(tuning: Tuning, shape: Waveform, sample_rate: i32) -> Self {
        // For properly recording the sox dependency on nix:
        let play_bin = if let Some(sox_bin) = option_env!("NIX_SOX_BIN") {
            log::debug!("using sox from nix store {}", sox_bin);
            PathBuf::from(sox_bin).join("play")
        } else {
            "play".into()
        };
        SoxPlayer {
            play_bin,
            tuning,
            shape,
            sample_rate,
        }
    }
}

impl CuePlayer for SoxPlayer {
    fn play(&mut self, cue: &Cue) {
        let samples = render(cue, &self.tuning, self.shape, self.sample_rate as f64);
        let mut bytes = vec![0; samples.len() * 16];
        copy_f64_bytes(&samples, &mut bytes);

        let play_bin = self.play_bin.clone();
        let sample_rate = self.sample_rate;
        thread::spawn(move || {
            if let Err(err) = play_bytes(&play_bin, sample_rate, &bytes) {
                error!("Failed to play audio with sox: {}", err);
            }
        });
    }
}

fn play_bytes(play_bin: &Path, sample_rate: i32, bytes: &[u8]) -> io::Result<()> {
    let mut player = Command::new(play_bin)
        .arg("-q")
        .arg("--channels")
        .arg("2")
        .arg("--rate")
        .arg(format!("{}", sample_rate))
        .arg("--type")
        .arg("f64")
        .arg("/dev/stdin")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut audio_stream) = player.stdin.take() {
        audio_stream.write_all(bytes)?;
        // sox exits once the input stream is closed
    }
    player.wait()?;
    Ok(())
}

/// Copy the stereo `f64` samples to bytes, interleaving the left and right samples.
///
/// Returns the number of samples that were actually copied.
/// Might be less than the number of input samples if the output buffer was not large enough.
pub fn copy_f64_bytes(audio: &[Stereo<f64>], bytes: &mut [u8]) -> usize {
    let mut processed = 0;
    for (sample, target) in audio.iter().zip(bytes.chunks_exact_mut(16)) {
        target[0..8].copy_from_slice(&sample.left.to_le_bytes());
        target[8..16].copy_from_slice(&sample.right.to_le_bytes());
        processed += 1;
    }
    processed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_interleaved() {
        let audio = [
            Stereo {
                left: 1.0,
                right: -1.0,
            },
            Stereo::mono(0.5),
        ];
        let mut bytes = [0u8; 24];
        assert_eq!(copy_f64_bytes(&audio, &mut bytes), 1);
        assert_eq!(&bytes[0..8], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[8..16], &(-1.0f64).to_le_bytes());
    }
}
