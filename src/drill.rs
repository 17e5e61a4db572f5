// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Line based front end for running a session in a terminal.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::audio::CuePlayer;
use crate::note::{NoteLabels, Step};
use crate::session::{Advance, Session, SessionStats};

/// Pause after showing the result of a question, before the next one.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Replay,
    Answer(Vec<Step>),
    Empty,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => return Command::Empty,
        "q" | "quit" => return Command::Quit,
        "r" | "replay" => return Command::Replay,
        _ => {}
    }
    let mut steps = Vec::new();
    for token in line
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        match token.parse().ok().and_then(Step::try_from_index) {
            Some(step) => steps.push(step),
            None => {
                return Command::Invalid(format!(
                    "{:?} is not a step between 0 and {}",
                    token,
                    Step::COUNT - 1
                ))
            }
        }
    }
    Command::Answer(steps)
}

fn describe_steps(steps: &[Step], labels: &NoteLabels, edo: u32) -> String {
    steps
        .iter()
        .map(|&s| format!("{} ({})", s, labels.name(s, edo)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run a session to the end, reading answers from `input`.
///
/// The reported total time is wall-clock time from the first question to the
/// report, pauses after each answer included.
///
/// Returns `None` if the user quit or the input ended before the last question.
pub fn run<R, I, O>(
    mut session: Session<R>,
    player: &mut dyn CuePlayer,
    mut input: I,
    mut output: O,
    feedback_delay: Duration,
) -> io::Result<Option<SessionStats>>
where
    R: Rng,
    I: BufRead,
    O: Write,
{
    let labels = session.config().labels().clone();
    let edo = session.config().edo();
    let total = session.config().question_count();
    let session_started = Instant::now();

    loop {
        let advance = session
            .request_next()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        let (number, question, cue) = match advance {
            Advance::Finished(stats) => {
                let stats = SessionStats {
                    total_time: session_started.elapsed().as_secs_f64(),
                    ..stats
                };
                write_report(&mut output, &stats)?;
                return Ok(Some(stats));
            }
            Advance::Question {
                number,
                question,
                cue,
            } => (number, question, cue),
        };

        writeln!(output, "Question {}/{}", number, total)?;
        writeln!(output, "{}", question.text)?;
        writeln!(
            output,
            "Given: {}",
            describe_steps(&[question.sounded], &labels, edo)
        )?;
        player.play(&cue);
        let started = Instant::now();

        let steps = loop {
            write!(output, "> ")?;
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                session.quit();
                return Ok(None);
            }
            match parse_command(&line) {
                Command::Quit => {
                    session.quit();
                    return Ok(None);
                }
                Command::Replay => player.play(&cue),
                Command::Answer(steps) => break steps,
                Command::Invalid(msg) => writeln!(output, "{}", msg)?,
                Command::Empty => {}
            }
        };

        let elapsed = started.elapsed().as_secs_f64();
        if let Some(feedback) = session.submit_answer(&steps, elapsed) {
            writeln!(
                output,
                "{}",
                if feedback.correct { "Correct!" } else { "Incorrect" }
            )?;
            writeln!(output, "{}", feedback.reveal)?;
            writeln!(
                output,
                "Answer: {}",
                describe_steps(&feedback.expected, &labels, edo)
            )?;
            writeln!(
                output,
                "Average time: {:.1}s",
                session.tracker().average_time()
            )?;
            player.play(&feedback.cue);
            thread::sleep(feedback_delay);
        }
    }
}

fn write_report<O: Write>(output: &mut O, stats: &SessionStats) -> io::Result<()> {
    writeln!(output, "Accuracy: {:.1}%", stats.accuracy)?;
    writeln!(output, "Total time: {:.1}s", stats.total_time)?;
    writeln!(output, "Average time: {:.1}s", stats.average_time)?;
    writeln!(
        output,
        "Correct: {}/{}",
        stats.correct_count, stats.total_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Cue;
    use crate::config::{ExerciseConfig, Mode, RawConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingPlayer {
        cues: Vec<Cue>,
    }

    impl CuePlayer for RecordingPlayer {
        fn play(&mut self, cue: &Cue) {
            self.cues.push(cue.clone());
        }
    }

    fn session(count: usize) -> Session<StdRng> {
        let mut raw = RawConfig::with_defaults(12, Mode::EdoSteps);
        raw.question_count = count.to_string();
        raw.intervals = "7".to_owned();
        Session::new(ExerciseConfig::resolve(&raw).unwrap(), StdRng::seed_from_u64(1))
    }

    #[test]
    fn commands_are_recognized() {
        assert_eq!(parse_command(" q \n"), Command::Quit);
        assert_eq!(parse_command("replay"), Command::Replay);
        assert_eq!(parse_command("\n"), Command::Empty);
        assert_eq!(
            parse_command("60, 64 67"),
            Command::Answer(vec![
                Step::from_index(60),
                Step::from_index(64),
                Step::from_index(67)
            ])
        );
        assert_eq!(
            parse_command("60 200"),
            Command::Invalid("\"200\" is not a step between 0 and 126".to_owned())
        );
    }

    #[test]
    fn wrong_answers_run_to_a_report() {
        let mut player = RecordingPlayer::default();
        let input = io::Cursor::new("\nxyz\n0\nr\n0\n");
        let mut output = Vec::new();
        let stats = run(session(2), &mut player, input, &mut output, Duration::from_millis(0))
            .unwrap()
            .expect("session should finish");
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.correct_count, 0);
        assert_eq!(stats.accuracy, 0.0);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Question 1/2"));
        assert!(text.contains("Question 2/2"));
        assert!(text.contains("Place interval: 7"));
        assert!(text.contains("\"xyz\" is not a step"));
        assert_eq!(text.matches("Incorrect").count(), 2);
        assert!(text.contains("Correct: 0/2"));
        // reference, feedback, replay, reference, feedback
        assert_eq!(player.cues.len(), 5);
    }

    #[test]
    fn total_time_includes_the_pause_after_each_answer() {
        let mut player = RecordingPlayer::default();
        let input = io::Cursor::new("0\n0\n");
        let stats = run(session(2), &mut player, input, io::sink(), Duration::from_millis(30))
            .unwrap()
            .expect("session should finish");
        assert!(stats.total_time >= 0.06, "{}", stats.total_time);
        assert!(stats.total_time >= stats.times.iter().sum::<f64>());
    }

    #[test]
    fn quitting_produces_no_report() {
        let mut player = RecordingPlayer::default();
        let input = io::Cursor::new("q\n");
        let mut output = Vec::new();
        let result = run(session(3), &mut player, input, &mut output, Duration::from_millis(0)).unwrap();
        assert_eq!(result, None);
        assert!(!String::from_utf8(output).unwrap().contains("Accuracy"));
    }

    #[test]
    fn end_of_input_counts_as_quitting() {
        let mut player = RecordingPlayer::default();
        let input = io::Cursor::new("0\n");
        let result = run(session(3), &mut player, input, io::sink(), Duration::from_millis(0)).unwrap();
        assert_eq!(result, None);
    }
}
