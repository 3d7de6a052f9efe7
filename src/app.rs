use std::path::PathBuf;

use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::config::{Config, WordSetConfig};
use crate::session::quiz::{Advance, QuizSession, Verdict};
use crate::session::summary::ScoreSummary;
use crate::speech::pronouncer::{Pronouncer, SpeechOutcome, SpeechStatus, Ticket};
use crate::ui::components::menu::Menu;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;
use crate::words::pool::WordPool;
use crate::words::source::{self, LoadedWordSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    GradeSelect,
    Loading,
    Error,
    ListSelect,
    Quiz,
    Results,
}

/// What the speaker line on the quiz screen shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechIndicator {
    Ready,
    Speaking(Ticket),
    Unavailable,
    Failed(String),
}

impl SpeechIndicator {
    fn idle(pronouncer: &Pronouncer) -> Self {
        if pronouncer.is_available() {
            SpeechIndicator::Ready
        } else {
            SpeechIndicator::Unavailable
        }
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self, SpeechIndicator::Speaking(_))
    }
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub grade_menu: Menu<'static>,
    pub word_set: Option<LoadedWordSet>,
    pub list_checked: Vec<bool>,
    pub list_cursor: usize,
    pub quiz: Option<QuizSession>,
    pub answer: LineInput,
    pub summary: Option<ScoreSummary>,
    pub results_scroll: usize,
    pub error_message: Option<String>,
    pub speech: SpeechIndicator,
    pub spinner_frame: usize,
    pub should_quit: bool,
    word_sets: Vec<WordSetConfig>,
    pending_load: Option<usize>,
    last_load: Option<usize>,
    pronouncer: Pronouncer,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, pronouncer: Pronouncer, rng: SmallRng) -> Self {
        let word_sets = config.word_sets.clone();
        let grade_menu = Menu::for_word_sets(&word_sets, theme);
        let speech = SpeechIndicator::idle(&pronouncer);

        Self {
            screen: AppScreen::GradeSelect,
            theme,
            config,
            grade_menu,
            word_set: None,
            list_checked: Vec::new(),
            list_cursor: 0,
            quiz: None,
            answer: LineInput::default(),
            summary: None,
            results_scroll: 0,
            error_message: None,
            speech,
            spinner_frame: 0,
            should_quit: false,
            word_sets,
            pending_load: None,
            last_load: None,
            pronouncer,
            rng,
        }
    }

    pub fn word_sets(&self) -> &[WordSetConfig] {
        &self.word_sets
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.data_dir()
    }

    // --- loading ---

    /// Switch to the loading screen. The load itself runs in
    /// [`App::perform_pending_load`] once the screen has been drawn.
    pub fn request_load(&mut self, index: usize) {
        if index >= self.word_sets.len() {
            return;
        }
        self.pending_load = Some(index);
        self.last_load = Some(index);
        self.error_message = None;
        self.screen = AppScreen::Loading;
    }

    pub fn has_pending_load(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn perform_pending_load(&mut self) {
        let Some(index) = self.pending_load.take() else {
            return;
        };
        let Some(set) = self.word_sets.get(index) else {
            return;
        };
        match source::load_word_set(set, &self.config.data_dir()) {
            Ok(loaded) => {
                self.list_checked = vec![false; loaded.lists.len()];
                self.list_cursor = 0;
                self.word_set = Some(loaded);
                self.screen = AppScreen::ListSelect;
            }
            Err(err) => {
                warn!(word_set = %set.name, error = %err, "word set failed to load");
                self.error_message = Some(err.to_string());
                self.screen = AppScreen::Error;
            }
        }
    }

    /// Re-attempt whatever failed last. Never happens on its own.
    pub fn retry_load(&mut self) {
        if let Some(index) = self.last_load {
            info!(index, "retrying word set load");
            self.request_load(index);
        }
    }

    pub fn go_to_grade_select(&mut self) {
        self.pronouncer.cancel_current();
        self.pending_load = None;
        self.error_message = None;
        self.quiz = None;
        self.summary = None;
        self.screen = AppScreen::GradeSelect;
    }

    // --- list selection ---

    pub fn list_names(&self) -> Vec<&str> {
        self.word_set
            .as_ref()
            .map(|set| set.lists.names().collect())
            .unwrap_or_default()
    }

    pub fn list_cursor_down(&mut self) {
        let len = self.list_checked.len();
        if len > 0 {
            self.list_cursor = (self.list_cursor + 1) % len;
        }
    }

    pub fn list_cursor_up(&mut self) {
        let len = self.list_checked.len();
        if len > 0 {
            self.list_cursor = (self.list_cursor + len - 1) % len;
        }
    }

    pub fn toggle_list(&mut self, index: usize) {
        if let Some(checked) = self.list_checked.get_mut(index) {
            *checked = !*checked;
        }
    }

    pub fn toggle_current_list(&mut self) {
        self.toggle_list(self.list_cursor);
    }

    /// Select everything, or clear everything if it was all selected.
    pub fn toggle_all_lists(&mut self) {
        let all = self.list_checked.iter().all(|c| *c);
        self.list_checked.iter_mut().for_each(|c| *c = !all);
    }

    pub fn selected_list_names(&self) -> Vec<String> {
        let Some(set) = self.word_set.as_ref() else {
            return Vec::new();
        };
        set.lists
            .names()
            .zip(&self.list_checked)
            .filter(|(_, checked)| **checked)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn can_start(&self) -> bool {
        self.list_checked.iter().any(|c| *c)
    }

    /// Build a fresh pool from the checked lists and present its first word.
    /// Does nothing while the selection is empty.
    pub fn start_practice(&mut self) {
        if !self.can_start() {
            return;
        }
        let Some(set) = self.word_set.as_ref() else {
            return;
        };
        let selected = self.selected_list_names();
        let pool = WordPool::build(&set.lists, &selected, &mut self.rng);
        let Some(quiz) = QuizSession::new(pool) else {
            debug!(?selected, "selected lists hold no words");
            return;
        };
        info!(lists = ?selected, words = quiz.len(), "practice started");
        self.quiz = Some(quiz);
        self.summary = None;
        self.results_scroll = 0;
        self.answer.clear();
        self.screen = AppScreen::Quiz;
        self.present_word();
    }

    // --- quiz ---

    pub fn current_word(&self) -> Option<&str> {
        self.quiz.as_ref().and_then(|q| q.current_word())
    }

    pub fn current_sentence(&self) -> Option<&str> {
        if !self.config.show_sentences {
            return None;
        }
        let word = self.current_word()?;
        self.word_set.as_ref()?.sentences.get(word)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.quiz.as_ref().and_then(|q| q.verdict())
    }

    fn present_word(&mut self) {
        if self.config.auto_pronounce {
            self.pronounce_current();
        }
    }

    pub fn pronounce_current(&mut self) {
        let Some(word) = self.current_word().map(str::to_string) else {
            return;
        };
        if !self.pronouncer.is_available() {
            self.speech = SpeechIndicator::Unavailable;
            return;
        }
        let ticket = self.pronouncer.speak(&word);
        self.speech = SpeechIndicator::Speaking(ticket);
    }

    /// Manual replay; ignored while a request is still in flight.
    pub fn replay_word(&mut self) {
        if self.speech.is_speaking() {
            return;
        }
        self.pronounce_current();
    }

    pub fn submit_answer(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        if let Some(result) = quiz.submit(self.answer.value()) {
            debug!(word = %result.word, correct = result.is_correct, "answer graded");
        }
    }

    pub fn next_word(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        match quiz.advance() {
            Advance::Next { .. } => {
                self.answer.clear();
                self.pronouncer.cancel_current();
                self.speech = SpeechIndicator::idle(&self.pronouncer);
                self.present_word();
            }
            Advance::Finished(results) => {
                self.pronouncer.cancel_current();
                self.summary = ScoreSummary::from_results(results);
                if let Some(summary) = &self.summary {
                    info!(
                        correct = summary.correct,
                        total = summary.total,
                        accuracy = summary.accuracy_percent,
                        "practice finished"
                    );
                }
                self.results_scroll = 0;
                self.screen = AppScreen::Results;
            }
            Advance::Ignored => {}
        }
    }

    pub fn abandon_quiz(&mut self) {
        self.pronouncer.cancel_current();
        self.quiz = None;
        self.answer.clear();
        self.screen = AppScreen::ListSelect;
    }

    /// From the results screen back to list selection; the previous checks
    /// are kept so the same lists can be practiced again.
    pub fn new_session(&mut self) {
        self.quiz = None;
        self.summary = None;
        self.answer.clear();
        self.screen = AppScreen::ListSelect;
    }

    pub fn results_scroll_down(&mut self) {
        let max = self
            .summary
            .as_ref()
            .map(|s| s.breakdown.len().saturating_sub(1))
            .unwrap_or(0);
        self.results_scroll = (self.results_scroll + 1).min(max);
    }

    pub fn results_scroll_up(&mut self) {
        self.results_scroll = self.results_scroll.saturating_sub(1);
    }

    // --- background events ---

    /// Outcomes for anything but the latest request are stale and dropped.
    pub fn on_speech(&mut self, outcome: SpeechOutcome) {
        let SpeechIndicator::Speaking(current) = self.speech else {
            return;
        };
        if outcome.ticket != current {
            debug!(ticket = outcome.ticket, current, "stale speech outcome");
            return;
        }
        self.speech = match outcome.status {
            SpeechStatus::Played | SpeechStatus::Cancelled => SpeechIndicator::Ready,
            SpeechStatus::Unavailable => SpeechIndicator::Unavailable,
            SpeechStatus::Failed(message) => SpeechIndicator::Failed(message),
        };
    }

    pub fn tick(&mut self) {
        if self.speech.is_speaking() || self.screen == AppScreen::Loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn cycle_theme(&mut self) {
        let themes = Theme::available_themes();
        let next = match themes.iter().position(|t| *t == self.config.theme) {
            Some(idx) => themes.get((idx + 1) % themes.len()),
            None => themes.first(),
        };
        let Some(next) = next.cloned() else {
            return;
        };
        if let Some(new_theme) = Theme::load(&next) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.grade_menu.theme = theme;
            self.config.theme = next;
        }
    }
}
