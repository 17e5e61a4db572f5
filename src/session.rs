// edo-trainer -- ear training for equal divisions of the octave
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Checking answers and keeping score over a session.

use std::collections::BTreeSet;

use log::{debug, info};
use rand::Rng;

use crate::audio::{Cue, FEEDBACK_DURATION, REFERENCE_DURATION};
use crate::config::ExerciseConfig;
use crate::note::Step;
use crate::question::{GenerationError, Question, QuestionGenerator};

/// An answer is right if it contains exactly the expected steps, in any order.
/// Steps entered twice count once.
///
/// ```
/// use edo_trainer::note::Step;
/// use edo_trainer::session::validate;
///
/// let s = |i| Step::from_index(i);
/// assert!(validate(&[s(60), s(64)], &[s(64), s(60)]));
/// assert!(validate(&[s(64), s(64)], &[s(64)]));
/// assert!(!validate(&[s(60)], &[s(60), s(64)]));
/// assert!(!validate(&[s(60), s(64), s(67)], &[s(60), s(64)]));
/// ```
pub fn validate(submitted: &[Step], expected: &[Step]) -> bool {
    let submitted: BTreeSet<Step> = submitted.iter().copied().collect();
    let expected: BTreeSet<Step> = expected.iter().copied().collect();
    submitted == expected
}

/// Running score of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    correct: usize,
    total: usize,
    times: Vec<f64>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_answer(&mut self, correct: bool, elapsed_seconds: f64) {
        self.times.push(elapsed_seconds);
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Mean answer time so far, zero before the first answer.
    pub fn average_time(&self) -> f64 {
        if self.times.is_empty() {
            0.0
        } else {
            self.times.iter().sum::<f64>() / self.times.len() as f64
        }
    }

    /// Final statistics.
    ///
    /// # Panics
    ///
    /// If no answer has been recorded.
    pub fn finalize(self) -> SessionStats {
        assert!(self.total > 0, "cannot finalize a session without answers");
        let accuracy = (self.correct as f64 / self.total as f64 * 1000.0).round() / 10.0;
        SessionStats {
            accuracy,
            total_time: self.times.iter().sum(),
            average_time: self.average_time(),
            correct_count: self.correct,
            total_count: self.total,
            times: self.times,
        }
    }
}

/// Results of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// Percentage of correct answers, rounded to one decimal.
    pub accuracy: f64,
    /// Seconds spent answering, summed over all questions.
    pub total_time: f64,
    pub average_time: f64,
    pub correct_count: usize,
    pub total_count: usize,
    pub times: Vec<f64>,
}

/// Outcome of asking for the next question.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// A question to show, numbered from one, and the cue to sound for it.
    Question {
        number: usize,
        question: Question,
        cue: Cue,
    },
    /// All questions have been answered.
    Finished(SessionStats),
}

/// What the learner gets to see and hear after answering.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub correct: bool,
    /// Steps that should have been placed.
    pub expected: Vec<Step>,
    pub reveal: String,
    pub cue: Cue,
}

/// State of one exercise session: the questions asked so far and the score.
///
/// The shell in front of it only ever calls `request_next`, `submit_answer`
/// and `quit`.
pub struct Session<R> {
    config: ExerciseConfig,
    generator: QuestionGenerator<R>,
    tracker: SessionTracker,
    current: Option<Question>,
    asked: usize,
    finished: Option<SessionStats>,
}

impl<R: Rng> Session<R> {
    pub fn new(config: ExerciseConfig, rng: R) -> Self {
        Session {
            config,
            generator: QuestionGenerator::new(rng),
            tracker: SessionTracker::new(),
            current: None,
            asked: 0,
            finished: None,
        }
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// The open question, if any.
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Number of questions asked so far and in total.
    pub fn progress(&self) -> (usize, usize) {
        (self.asked, self.config.question_count())
    }

    /// Move on to the next question, or finish the session.
    ///
    /// While a question is still open it is returned again, so a question
    /// can never be skipped without an answer.
    pub fn request_next(&mut self) -> Result<Advance, GenerationError> {
        if let Some(question) = &self.current {
            return Ok(self.ask(question.clone()));
        }
        if let Some(stats) = &self.finished {
            return Ok(Advance::Finished(stats.clone()));
        }
        if self.asked >= self.config.question_count() {
            let stats = std::mem::take(&mut self.tracker).finalize();
            info!(
                "session finished: {}/{} correct ({}%)",
                stats.correct_count, stats.total_count, stats.accuracy
            );
            self.finished = Some(stats.clone());
            return Ok(Advance::Finished(stats));
        }
        let question = self.generator.generate(&self.config)?;
        self.asked += 1;
        debug!("question {}: {:?}", self.asked, question);
        self.current = Some(question.clone());
        Ok(self.ask(question))
    }

    fn ask(&self, question: Question) -> Advance {
        Advance::Question {
            number: self.asked,
            cue: Cue::Note {
                step: question.sounded,
                duration: REFERENCE_DURATION,
            },
            question,
        }
    }

    /// Grade the open question. Returns `None` if there is no open question.
    pub fn submit_answer(&mut self, steps: &[Step], elapsed_seconds: f64) -> Option<Feedback> {
        let question = self.current.take()?;
        let correct = validate(steps, &question.answer);
        self.tracker.record_answer(correct, elapsed_seconds);
        debug!(
            "answer {:?} for {:?} is {}",
            steps,
            question.answer,
            if correct { "correct" } else { "wrong" }
        );
        Some(Feedback {
            correct,
            expected: question.answer,
            reveal: question.reveal,
            cue: Cue::Chord {
                steps: question.feedback,
                duration: FEEDBACK_DURATION,
            },
        })
    }

    /// Abandon the session. No statistics are produced.
    pub fn quit(self) {
        info!(
            "session quit after {} of {} questions",
            self.asked,
            self.config.question_count()
        );
    }
}
