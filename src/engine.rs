//! The quiz round engine: answer evaluation, streak bookkeeping and requeueing.
//!
//! One `QuizEngine` is one session over one deck. It is driven from a single
//! thread and performs no I/O; persistence goes through [`Snapshot`].

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::{EngineConfig, EnginePhase, FeedbackEvent, InputNormalization, QuizItem, RequeuePolicy};
use crate::normalize::{answers_match, fold_greek_case};
use crate::snapshot::Snapshot;

#[derive(Debug)]
pub struct QuizEngine {
    queue: VecDeque<QuizItem>,
    current_input: String,
    streak: u32,
    best_streak: u32,
    correct_count: u32,
    log: VecDeque<String>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    config: EngineConfig,
    rng: StdRng,
}

impl QuizEngine {
    /// Starts a session over a fresh shuffle of `dataset`.
    pub fn new(dataset: Vec<QuizItem>, config: EngineConfig) -> Self {
        Self::with_rng(dataset, config, StdRng::from_entropy())
    }

    pub fn with_rng(mut dataset: Vec<QuizItem>, config: EngineConfig, mut rng: StdRng) -> Self {
        dataset.shuffle(&mut rng);
        Self::build(dataset.into(), config, rng)
    }

    /// Starts a session that asks the items in the given order.
    pub fn in_order(dataset: Vec<QuizItem>, config: EngineConfig) -> Self {
        Self::build(dataset.into(), config, StdRng::from_entropy())
    }

    /// Resumes a saved session. The timer restarts from now.
    pub fn restore(snapshot: Snapshot, config: EngineConfig) -> Self {
        let mut engine = Self::build(snapshot.remaining_items.into(), config, StdRng::from_entropy());
        engine.streak = snapshot.streak;
        engine.best_streak = snapshot.best_streak.max(snapshot.streak);
        engine.correct_count = snapshot.correct_count;
        engine.log = snapshot.log.into();
        engine
    }

    fn build(queue: VecDeque<QuizItem>, config: EngineConfig, rng: StdRng) -> Self {
        let started_at = Utc::now();
        // An empty deck is finished before the first question.
        let finished_at = queue.is_empty().then_some(started_at);
        Self {
            queue,
            current_input: String::new(),
            streak: 0,
            best_streak: 0,
            correct_count: 0,
            log: VecDeque::new(),
            started_at: Some(started_at),
            finished_at,
            config,
            rng,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        if self.queue.is_empty() {
            EnginePhase::Finished
        } else {
            EnginePhase::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase() == EnginePhase::Finished
    }

    pub fn set_input(&mut self, raw_text: &str) {
        if self.is_finished() {
            return;
        }
        self.current_input = match self.config.input {
            InputNormalization::Verbatim => raw_text.to_string(),
            InputNormalization::FoldGreekCase => fold_greek_case(raw_text),
        };
    }

    /// Evaluates the current input against the head of the queue and
    /// advances the queue. Returns `None` once the session is finished.
    pub fn submit(&mut self) -> Option<FeedbackEvent> {
        let head = self.queue.pop_front()?;
        let input = std::mem::take(&mut self.current_input);

        let event = if answers_match(&input, &head.answer) {
            let is_perfect_match = input == head.answer;
            self.streak += 1;
            self.correct_count += 1;
            self.best_streak = self.best_streak.max(self.streak);
            if self.config.shuffle_after_correct {
                self.queue.make_contiguous().shuffle(&mut self.rng);
            }

            let message = if is_perfect_match {
                format!("✅ Correct! Streak: {}", self.streak)
            } else {
                format!("✅ Correct! The proper way is: {}", head.answer)
            };
            FeedbackEvent {
                message,
                is_correct: true,
                is_perfect_match,
                item: head,
            }
        } else {
            let lost_streak = self.streak;
            self.best_streak = self.best_streak.max(lost_streak);
            self.streak = 0;

            let message = format!(
                "❌ Incorrect! The correct answer was: {} ({}). Your streak was: {}",
                head.answer, head.prompt, lost_streak
            );
            self.queue.push_back(head.clone());
            if self.config.requeue == RequeuePolicy::ShuffleAll {
                self.queue.make_contiguous().shuffle(&mut self.rng);
            }
            FeedbackEvent {
                message,
                is_correct: false,
                is_perfect_match: false,
                item: head,
            }
        };

        if self.queue.is_empty() && self.finished_at.is_none() {
            self.finished_at = Some(Utc::now());
        }
        self.log.push_front(event.message.clone());

        Some(event)
    }

    pub fn current_item(&self) -> Option<&QuizItem> {
        self.queue.front()
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> impl Iterator<Item = &QuizItem> {
        self.queue.iter()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Feedback messages, most recent first.
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Time spent so far, frozen once the session is finished.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let start = self.started_at?;
        let end = self.finished_at.unwrap_or(now);
        Some((end - start).max(Duration::zero()))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            remaining_items: self.queue.iter().cloned().collect(),
            streak: self.streak,
            best_streak: self.best_streak,
            correct_count: self.correct_count,
            log: self.log.iter().cloned().collect(),
        }
    }
}
