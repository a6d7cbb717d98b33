use std::collections::{HashMap, HashSet};

use crate::decks::Deck;
use crate::snapshot::Snapshot;
use crate::store::CompletionRecord;

/// Completed decks needed per level.
pub const LEVEL_UP_THRESHOLD: usize = 3;

/// Percentage shown next to a deck in the menu.
pub fn deck_percent(total_items: usize, saved: Option<&Snapshot>, completed: bool) -> u8 {
    if completed {
        return 100;
    }
    let Some(saved) = saved else {
        return 0;
    };
    if total_items == 0 {
        return 0;
    }
    let cleared = total_items.saturating_sub(saved.remaining_items.len());
    ((cleared * 100) / total_items).min(100) as u8
}

/// Decks completed at least once: the stored set plus anything in `history`
/// not yet reflected in it.
pub fn completed_keys<'a>(
    completed: &'a HashSet<String>,
    history: &'a [CompletionRecord],
) -> HashSet<&'a str> {
    completed
        .iter()
        .map(String::as_str)
        .chain(history.iter().map(|r| r.session_key.as_str()))
        .collect()
}

pub fn completed_count(percentages: &[u8]) -> usize {
    percentages.iter().filter(|p| **p == 100).count()
}

pub fn level(completed: usize) -> usize {
    completed / LEVEL_UP_THRESHOLD + 1
}

/// Mean of the deck percentages, rounded.
pub fn overall_progress(percentages: &[u8]) -> u8 {
    if percentages.is_empty() {
        return 0;
    }
    let sum: usize = percentages.iter().map(|p| *p as usize).sum();
    let total = percentages.len() * 100;
    ((sum as f64 / total as f64) * 100.0).round() as u8
}

/// Everything the menu needs to render progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressSummary {
    pub percentages: Vec<u8>,
    pub resumable: Vec<bool>,
    pub completed: usize,
    pub level: usize,
    pub overall: u8,
}

impl ProgressSummary {
    pub fn compute(
        decks: &[Deck],
        saved: &HashMap<String, Snapshot>,
        history: &[CompletionRecord],
        completed: &HashSet<String>,
    ) -> Self {
        let done = completed_keys(completed, history);
        let percentages: Vec<u8> = decks
            .iter()
            .map(|deck| {
                deck_percent(
                    deck.len(),
                    saved.get(&deck.key),
                    done.contains(deck.key.as_str()),
                )
            })
            .collect();
        let resumable = decks
            .iter()
            .map(|deck| saved.get(&deck.key).is_some_and(Snapshot::is_resumable))
            .collect();
        let completed = completed_count(&percentages);

        Self {
            overall: overall_progress(&percentages),
            level: level(completed),
            completed,
            percentages,
            resumable,
        }
    }
}
