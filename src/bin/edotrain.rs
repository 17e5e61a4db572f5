// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `edotrain` - place intervals, ratios and chords on an EDO keyboard by ear.

use std::io;
use std::path::{Path, PathBuf};

use log::error;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simple_logger;
use structopt::StructOpt;

use edo_trainer::audio::{CuePlayer, SilentPlayer, SoxPlayer};
use edo_trainer::catalog;
use edo_trainer::config::{ExerciseConfig, Mode, RawConfig};
use edo_trainer::drill;
use edo_trainer::session::Session;
use edo_trainer::tuning::MAX_EDO;

#[derive(Debug, StructOpt)]
#[structopt(name = "edotrain", about = "Ear training for equal divisions of the octave")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Number of equal divisions of the octave.
    #[structopt(short, long, default_value = "12")]
    edo: String,

    /// Number of questions in the session.
    #[structopt(short, long, default_value = "10")]
    questions: String,

    /// One of `edo-steps`, `ratio` or `chord`.
    #[structopt(short, long, default_value = "edo-steps")]
    mode: Mode,

    /// File with `steps : name` lines. Defaults to the intervals the EDO approximates well.
    #[structopt(long, parse(from_os_str))]
    intervals: Option<PathBuf>,

    /// File with `ratio : name` lines. Defaults to the built-in ratio list.
    #[structopt(long, parse(from_os_str))]
    ratios: Option<PathBuf>,

    /// File with `[offsets] : name` lines. Defaults to the chords the EDO approximates well.
    #[structopt(long, parse(from_os_str))]
    chords: Option<PathBuf>,

    /// Extra interval names, overridden by names given with the intervals.
    #[structopt(long, parse(from_os_str))]
    step_names: Option<PathBuf>,

    /// Extra ratio names, overridden by names given with the ratios.
    #[structopt(long, parse(from_os_str))]
    ratio_names: Option<PathBuf>,

    /// Comma separated note names, one per step of the octave.
    #[structopt(long, default_value = "")]
    labels: String,

    /// Show the custom note names instead of step numbers.
    #[structopt(long)]
    custom_labels: bool,

    /// Sound any chord tone, not just the root, in chord mode.
    #[structopt(long)]
    inversions: bool,

    /// Waveform of the synthesizer: sine, square, sawtooth or triangle.
    #[structopt(long, default_value = "sine")]
    synth: String,

    /// Seed for the question generator, for reproducible sessions.
    #[structopt(long)]
    seed: Option<u64>,

    /// Play the cues through sox. Without this flag nothing is sounded.
    #[structopt(short, long)]
    audio: bool,

    /// Print the default interval and chord lists for the EDO and exit.
    #[structopt(long)]
    show_defaults: bool,
}

const SAMPLE_RATE: i32 = 44100;

fn read_block(path: Option<&Path>) -> io::Result<Option<String>> {
    path.map(std::fs::read_to_string).transpose()
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).unwrap();

    // Defaults are computed for the requested EDO when it parses, the resolver
    // reports the bad value otherwise.
    let default_edo = opt
        .edo
        .trim()
        .parse()
        .ok()
        .filter(|edo| (1..=MAX_EDO).contains(edo))
        .unwrap_or(12);

    if opt.show_defaults {
        println!("# intervals\n{}", catalog::default_interval_text(default_edo));
        println!("# ratios\n{}", catalog::default_ratio_text());
        println!("# chords\n{}", catalog::default_chord_text(default_edo));
        return Ok(());
    }

    let mut raw = RawConfig::with_defaults(default_edo, opt.mode);
    raw.edo = opt.edo.clone();
    raw.question_count = opt.questions.clone();
    raw.synth = opt.synth.clone();
    raw.note_labels = opt.labels.clone();
    raw.use_custom_labels = opt.custom_labels;
    raw.inversions = opt.inversions;
    if let Some(text) = read_block(opt.intervals.as_deref())? {
        raw.intervals = text;
    }
    if let Some(text) = read_block(opt.ratios.as_deref())? {
        raw.ratios = text;
    }
    if let Some(text) = read_block(opt.chords.as_deref())? {
        raw.chords = text;
    }
    if let Some(text) = read_block(opt.step_names.as_deref())? {
        raw.step_names = text;
    }
    if let Some(text) = read_block(opt.ratio_names.as_deref())? {
        raw.ratio_names = text;
    }

    let config = match ExerciseConfig::resolve(&raw) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return Err(io::Error::new(io::ErrorKind::InvalidInput, err));
        }
    };

    let rng = match opt.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut player: Box<dyn CuePlayer> = if opt.audio {
        Box::new(SoxPlayer::new(
            config.tuning().clone(),
            config.waveform(),
            SAMPLE_RATE,
        ))
    } else {
        Box::new(SilentPlayer::new(config.tuning().clone()))
    };

    let session = Session::new(config, rng);
    let stdin = io::stdin();
    drill::run(
        session,
        player.as_mut(),
        stdin.lock(),
        io::stdout(),
        drill::FEEDBACK_DELAY,
    )?;
    Ok(())
}
