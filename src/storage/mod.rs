//! Wellness interaction log
//!
//! The wellness-chat endpoint records each exchange as a wellness log row.
//! Writes are best-effort: callers log and discard failures.

pub mod sqlite;

pub use sqlite::SqliteInteractionLog;

use crate::error::StorageError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One wellness-chat exchange to be recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellnessChatEntry {
    pub user_id: i64,
    pub user_message: String,
    pub ai_text: String,
}

impl WellnessChatEntry {
    /// Notes column text: `User: {message}\nAI: {text}`
    pub fn notes(&self) -> String {
        format!("User: {}\nAI: {}", self.user_message, self.ai_text)
    }
}

/// A stored wellness log row
#[derive(Debug, Clone, PartialEq)]
pub struct WellnessLogRecord {
    pub id: i64,
    pub user_id: i64,
    pub mood: i64,
    pub stress: i64,
    pub sleep_hours: f64,
    pub sleep_quality: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sink for wellness-chat exchanges
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Persist one exchange
    async fn record(&self, entry: &WellnessChatEntry) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_format() {
        let entry = WellnessChatEntry {
            user_id: 1,
            user_message: "I feel tired".to_string(),
            ai_text: "Rest a bit.".to_string(),
        };
        assert_eq!(entry.notes(), "User: I feel tired\nAI: Rest a bit.");
    }
}
