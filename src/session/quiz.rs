use chrono::{DateTime, Utc};

use crate::session::result::WordResult;
use crate::words::pool::WordPool;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizState {
    AwaitingAnswer { index: usize },
    Feedback { index: usize, verdict: Verdict },
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    /// The whole result log, in the order the words were asked.
    Finished(Vec<WordResult>),
    /// `advance` outside of feedback does nothing.
    Ignored,
}

/// One practice run over a word pool: present, answer, feedback, repeat.
///
/// The index only moves forward and every word gets exactly one result.
/// A finished session stays finished; practicing again means building a new
/// `QuizSession`.
pub struct QuizSession {
    pool: WordPool,
    state: QuizState,
    results: Vec<WordResult>,
}

impl QuizSession {
    /// Returns `None` for an empty pool.
    pub fn new(pool: WordPool) -> Option<Self> {
        if pool.is_empty() {
            return None;
        }
        Some(Self {
            results: Vec::with_capacity(pool.len()),
            pool,
            state: QuizState::AwaitingAnswer { index: 0 },
        })
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            QuizState::AwaitingAnswer { index } | QuizState::Feedback { index, .. } => Some(index),
            QuizState::Finished => None,
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_index().and_then(|i| self.pool.get(i))
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self.state {
            QuizState::Feedback { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// 1-based position for "word i of n" displays.
    pub fn position(&self) -> usize {
        self.current_index().map_or(self.len(), |i| i + 1)
    }

    pub fn progress(&self) -> f64 {
        self.position() as f64 / self.len() as f64
    }

    pub fn is_last_word(&self) -> bool {
        self.current_index().is_some_and(|i| i + 1 >= self.len())
    }

    pub fn is_awaiting_answer(&self) -> bool {
        matches!(self.state, QuizState::AwaitingAnswer { .. })
    }

    pub fn is_finished(&self) -> bool {
        self.state == QuizState::Finished
    }

    pub fn results(&self) -> &[WordResult] {
        &self.results
    }

    pub fn submit(&mut self, answer: &str) -> Option<&WordResult> {
        self.submit_at(answer, Utc::now())
    }

    /// Grade `answer` against the current word. Ignored unless an answer is
    /// awaited, and ignored for blank input.
    pub fn submit_at(&mut self, answer: &str, timestamp: DateTime<Utc>) -> Option<&WordResult> {
        let QuizState::AwaitingAnswer { index } = self.state else {
            return None;
        };
        if answer.trim().is_empty() {
            return None;
        }
        let word = self.pool.get(index)?;
        let result = WordResult::grade(word, answer, timestamp);
        let verdict = if result.is_correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        self.results.push(result);
        self.state = QuizState::Feedback { index, verdict };
        self.results.last()
    }

    pub fn advance(&mut self) -> Advance {
        let QuizState::Feedback { index, .. } = self.state else {
            return Advance::Ignored;
        };
        if index + 1 < self.pool.len() {
            self.state = QuizState::AwaitingAnswer { index: index + 1 };
            Advance::Next { index: index + 1 }
        } else {
            self.state = QuizState::Finished;
            Advance::Finished(self.results.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(words: &[&str]) -> QuizSession {
        QuizSession::new(WordPool::from_words(words.iter().map(|w| w.to_string()))).unwrap()
    }

    #[test]
    fn empty_pool_cannot_start() {
        assert!(QuizSession::new(WordPool::default()).is_none());
    }

    #[test]
    fn starts_awaiting_first_word() {
        let quiz = session(&["apple", "banana"]);
        assert_eq!(quiz.state(), QuizState::AwaitingAnswer { index: 0 });
        assert_eq!(quiz.current_word(), Some("apple"));
        assert_eq!(quiz.position(), 1);
        assert!(!quiz.is_last_word());
    }

    #[test]
    fn correct_answer_moves_to_feedback() {
        let mut quiz = session(&["apple"]);
        let result = quiz.submit(" APPLE ").unwrap();
        assert!(result.is_correct);
        assert_eq!(
            quiz.state(),
            QuizState::Feedback {
                index: 0,
                verdict: Verdict::Correct
            }
        );
    }

    #[test]
    fn incorrect_answer_is_recorded() {
        let mut quiz = session(&["banana"]);
        let result = quiz.submit("bananna").unwrap();
        assert!(!result.is_correct);
        assert_eq!(result.user_input, "bananna");
        assert_eq!(quiz.verdict(), Some(Verdict::Incorrect));
    }

    #[test]
    fn double_submit_records_once() {
        let mut quiz = session(&["apple", "banana"]);
        assert!(quiz.submit("apple").is_some());
        assert!(quiz.submit("apple").is_none());
        assert!(quiz.submit("wrong").is_none());
        assert_eq!(quiz.results().len(), 1);
        assert_eq!(quiz.verdict(), Some(Verdict::Correct));
    }

    #[test]
    fn blank_answer_is_ignored() {
        let mut quiz = session(&["apple"]);
        assert!(quiz.submit("   ").is_none());
        assert!(quiz.results().is_empty());
        assert!(quiz.is_awaiting_answer());
    }

    #[test]
    fn advance_without_answer_is_ignored() {
        let mut quiz = session(&["apple", "banana"]);
        assert_eq!(quiz.advance(), Advance::Ignored);
        assert_eq!(quiz.current_word(), Some("apple"));
    }

    #[test]
    fn advance_walks_the_pool_then_finishes() {
        let mut quiz = session(&["apple", "banana", "cherry"]);
        quiz.submit("apple");
        assert_eq!(quiz.advance(), Advance::Next { index: 1 });
        assert_eq!(quiz.current_word(), Some("banana"));
        assert_eq!(quiz.verdict(), None);

        quiz.submit("banana");
        assert_eq!(quiz.advance(), Advance::Next { index: 2 });
        assert!(quiz.is_last_word());

        quiz.submit("cherry");
        match quiz.advance() {
            Advance::Finished(results) => {
                let words: Vec<&str> = results.iter().map(|r| r.word.as_str()).collect();
                assert_eq!(words, vec!["apple", "banana", "cherry"]);
            }
            other => panic!("expected Finished, got {other:?}"),
        }
        assert!(quiz.is_finished());
    }

    #[test]
    fn finished_is_terminal() {
        let mut quiz = session(&["apple"]);
        quiz.submit("apple");
        assert!(matches!(quiz.advance(), Advance::Finished(_)));

        assert!(quiz.submit("apple").is_none());
        assert_eq!(quiz.advance(), Advance::Ignored);
        assert_eq!(quiz.results().len(), 1);
        assert_eq!(quiz.current_word(), None);
        assert_eq!(quiz.position(), 1);
    }

    #[test]
    fn timestamps_come_from_submission() {
        let mut quiz = session(&["apple"]);
        let at = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let result = quiz.submit_at("apple", at).unwrap();
        assert_eq!(result.timestamp, at);
    }

    #[test]
    fn progress_counts_current_word() {
        let mut quiz = session(&["a1", "b2", "c3", "d4"]);
        assert_eq!(quiz.progress(), 0.25);
        quiz.submit("a1");
        quiz.advance();
        assert_eq!(quiz.progress(), 0.5);
    }
}
