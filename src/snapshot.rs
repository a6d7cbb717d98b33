//! The persisted subset of a quiz session.

use serde::{Deserialize, Serialize};

use crate::models::QuizItem;

/// Wire shape shared by every store:
/// `{ remainingItems, streak, bestStreak, correctCount, log }`.
///
/// Timestamps are not part of it, a resumed session restarts its timer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub remaining_items: Vec<QuizItem>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub log: Vec<String>,
}

impl Snapshot {
    /// A snapshot only counts as a saved session while it still has items.
    pub fn is_resumable(&self) -> bool {
        !self.remaining_items.is_empty()
    }

    /// Decodes a stored snapshot, treating anything unusable as "no session".
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Snapshot>(raw) {
            Ok(snapshot) => snapshot.into_resumable(),
            Err(e) => {
                tracing::warn!("Discarding malformed snapshot: {}", e);
                None
            }
        }
    }

    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        match serde_json::from_value::<Snapshot>(value) {
            Ok(snapshot) => snapshot.into_resumable(),
            Err(e) => {
                tracing::warn!("Discarding malformed snapshot: {}", e);
                None
            }
        }
    }

    fn into_resumable(self) -> Option<Self> {
        self.is_resumable().then_some(self)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_shape() {
        let snapshot = Snapshot {
            remaining_items: vec![QuizItem::new("δύο", "2")],
            streak: 1,
            best_streak: 3,
            correct_count: 4,
            log: vec!["✅ Correct! Streak: 1".to_string()],
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "remainingItems": [["δύο", "2"]],
                "streak": 1,
                "bestStreak": 3,
                "correctCount": 4,
                "log": ["✅ Correct! Streak: 1"]
            })
        );
    }

    #[test]
    fn test_from_json_fills_missing_counters() {
        let snapshot = Snapshot::from_json(r#"{"remainingItems":[["ένα","1"]]}"#).unwrap();
        assert_eq!(snapshot.streak, 0);
        assert_eq!(snapshot.best_streak, 0);
        assert_eq!(snapshot.correct_count, 0);
        assert!(snapshot.log.is_empty());
    }

    #[test]
    fn test_from_json_rejects_empty_queue() {
        assert!(Snapshot::from_json(r#"{"remainingItems":[],"streak":2}"#).is_none());
        assert!(Snapshot::from_json("{}").is_none());
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(Snapshot::from_json("not json").is_none());
        assert!(Snapshot::from_json(r#"{"remainingItems":"oops"}"#).is_none());
        assert!(Snapshot::from_json(r#"{"remainingItems":[["only one"]]}"#).is_none());
        assert!(Snapshot::from_json(r#"{"remainingItems":[["a","b"]],"streak":-1}"#).is_none());
    }

    #[test]
    fn test_from_value_null_is_no_session() {
        assert!(Snapshot::from_value(serde_json::Value::Null).is_none());
    }

    #[test]
    fn test_to_json_then_from_json() {
        let snapshot = Snapshot {
            remaining_items: vec![QuizItem::new("Δευτέρα", "Monday"), QuizItem::new("Monday", "Δευτέρα")],
            streak: 0,
            best_streak: 5,
            correct_count: 12,
            log: vec!["a".to_string(), "b".to_string()],
        };
        let raw = snapshot.to_json().unwrap();
        assert_eq!(Snapshot::from_json(&raw), Some(snapshot));
    }
}
