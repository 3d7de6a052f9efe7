use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::SpeechIndicator;
use crate::session::quiz::{QuizSession, Verdict};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::wrapped_line_count;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub struct QuizView<'a> {
    pub quiz: &'a QuizSession,
    pub answer: &'a LineInput,
    pub sentence: Option<&'a str>,
    pub speech: &'a SpeechIndicator,
    pub spinner_frame: usize,
    pub theme: &'a Theme,
}

impl<'a> QuizView<'a> {
    pub fn new(
        quiz: &'a QuizSession,
        answer: &'a LineInput,
        sentence: Option<&'a str>,
        speech: &'a SpeechIndicator,
        spinner_frame: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            quiz,
            answer,
            sentence,
            speech,
            spinner_frame,
            theme,
        }
    }

    fn speaker_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        match self.speech {
            SpeechIndicator::Speaking(_) => {
                let frame = SPINNER[self.spinner_frame % SPINNER.len()];
                Line::from(Span::styled(
                    format!("{frame} Speaking..."),
                    Style::default().fg(colors.accent()),
                ))
            }
            SpeechIndicator::Ready => Line::from(Span::styled(
                "Listen, then type the word",
                Style::default().fg(colors.fg()),
            )),
            SpeechIndicator::Unavailable => Line::from(Span::styled(
                "Speech is off. Use the sentence as your clue.",
                Style::default().fg(colors.muted()),
            )),
            SpeechIndicator::Failed(_) => Line::from(Span::styled(
                "Couldn't play the word. Press Tab to try again.",
                Style::default().fg(colors.warning()),
            )),
        }
    }

    fn input_line(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        let text_style = match self.quiz.verdict() {
            Some(Verdict::Correct) => Style::default().fg(colors.success()),
            Some(Verdict::Incorrect) => Style::default().fg(colors.error()),
            None => Style::default().fg(colors.fg()),
        }
        .add_modifier(Modifier::BOLD);

        if self.quiz.verdict().is_some() {
            return Line::from(Span::styled(self.answer.value().to_uppercase(), text_style));
        }

        let (before, cursor, after) = self.answer.render_parts();
        let cursor_style = Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg());
        let cursor_text = cursor.map(|c| c.to_string()).unwrap_or_else(|| " ".to_string());
        Line::from(vec![
            Span::styled(before, text_style),
            Span::styled(cursor_text, cursor_style),
            Span::styled(after, text_style),
        ])
    }

    fn feedback_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let next = if self.quiz.is_last_word() {
            "[Enter] See Final Results"
        } else {
            "[Enter] Next Word"
        };
        match self.quiz.verdict() {
            Some(Verdict::Correct) => vec![
                Line::from(Span::styled(
                    "Perfect!",
                    Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(next, Style::default().fg(colors.accent()))),
            ],
            Some(Verdict::Incorrect) => {
                let word = self.quiz.current_word().unwrap_or_default().to_uppercase();
                vec![
                    Line::from(Span::styled(
                        "Almost! It's spelled:",
                        Style::default()
                            .fg(colors.error())
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        word,
                        Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(next, Style::default().fg(colors.accent()))),
                ]
            }
            None => vec![Line::from(Span::styled(
                "[Enter] Check Spelling",
                Style::default().fg(colors.muted()),
            ))],
        }
    }
}

impl Widget for QuizView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let sentence_width = inner.width.saturating_sub(4) as usize;
        let sentence_height = self
            .sentence
            .map(|s| wrapped_line_count(s, sentence_width) as u16 + 1)
            .unwrap_or(0);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(sentence_height),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
            ])
            .split(inner);

        let label = format!("Word {} of {}", self.quiz.position(), self.quiz.len());
        let done = self.quiz.results().len();
        ProgressBar::new(&label, done, self.quiz.len(), self.theme).render(layout[0], buf);

        Paragraph::new(self.speaker_line())
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        if let Some(sentence) = self.sentence {
            Paragraph::new(Line::from(Span::styled(
                format!("\"{sentence}\""),
                Style::default()
                    .fg(colors.muted())
                    .add_modifier(Modifier::ITALIC),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[2], buf);
        }

        let input_border = match self.quiz.verdict() {
            Some(Verdict::Correct) => colors.success(),
            Some(Verdict::Incorrect) => colors.error(),
            None => colors.border_focused(),
        };
        let input_block = Block::bordered()
            .title(" Your answer ")
            .border_style(Style::default().fg(input_border));
        let input_area = input_block.inner(layout[3]);
        input_block.render(layout[3], buf);
        Paragraph::new(self.input_line())
            .alignment(Alignment::Center)
            .render(input_area, buf);

        Paragraph::new(self.feedback_lines())
            .alignment(Alignment::Center)
            .render(layout[5], buf);
    }
}
