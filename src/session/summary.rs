use crate::session::result::WordResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreSummary {
    pub correct: usize,
    pub total: usize,
    pub accuracy_percent: u32,
    pub breakdown: Vec<WordResult>,
}

impl ScoreSummary {
    /// Summarize a finished session. An empty log has no accuracy, so it
    /// yields `None`.
    pub fn from_results(results: Vec<WordResult>) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let total = results.len();
        let correct = results.iter().filter(|r| r.is_correct).count();
        Some(Self {
            correct,
            total,
            accuracy_percent: rounded_percent(correct, total),
            breakdown: results,
        })
    }

    pub fn incorrect(&self) -> usize {
        self.total - self.correct
    }

    pub fn missed_words(&self) -> impl Iterator<Item = &str> {
        self.breakdown
            .iter()
            .filter(|r| !r.is_correct)
            .map(|r| r.word.as_str())
    }

    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

/// `round(100 * part / whole)` with halves rounded up.
fn rounded_percent(part: usize, whole: usize) -> u32 {
    ((200 * part + whole) / (2 * whole)) as u32
}
