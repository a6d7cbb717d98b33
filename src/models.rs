use serde::{Deserialize, Serialize};

/// One translation pair: the form the user must type and the prompt shown.
///
/// Serialised as a two-element array `["answer", "prompt"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct QuizItem {
    pub answer: String,
    pub prompt: String,
}

impl QuizItem {
    pub fn new(answer: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            prompt: prompt.into(),
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            answer: self.prompt.clone(),
            prompt: self.answer.clone(),
        }
    }
}

impl From<(String, String)> for QuizItem {
    fn from((answer, prompt): (String, String)) -> Self {
        Self { answer, prompt }
    }
}

impl From<QuizItem> for (String, String) {
    fn from(item: QuizItem) -> Self {
        (item.answer, item.prompt)
    }
}

/// Result of one `submit`, handed to the UI for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEvent {
    pub message: String,
    pub is_correct: bool,
    pub is_perfect_match: bool,
    pub item: QuizItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    InProgress,
    Finished,
}

/// What happens to a missed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequeuePolicy {
    /// Move the missed item to the back of the queue.
    #[default]
    AppendToEnd,
    /// Put the missed item back and reshuffle the whole queue.
    ShuffleAll,
}

/// How raw keyboard text is stored as the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputNormalization {
    #[default]
    Verbatim,
    FoldGreekCase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub requeue: RequeuePolicy,
    pub shuffle_after_correct: bool,
    pub input: InputNormalization,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            requeue: RequeuePolicy::AppendToEnd,
            shuffle_after_correct: true,
            input: InputNormalization::Verbatim,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AppState {
    Menu,
    Quiz,
    QuizQuitConfirm,
    ResetConfirm,
    Summary,
}
