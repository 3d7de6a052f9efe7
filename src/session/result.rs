use chrono::{DateTime, Utc};

use crate::session::answer;

/// Outcome of one submitted answer. Created once, never amended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordResult {
    pub word: String,
    pub user_input: String,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

impl WordResult {
    pub fn grade(word: &str, answer: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            word: word.to_string(),
            user_input: answer.trim().to_string(),
            is_correct: answer::is_match(word, answer),
            timestamp,
        }
    }
}
