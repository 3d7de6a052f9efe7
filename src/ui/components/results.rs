use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Row, Table, Widget};

use crate::session::summary::ScoreSummary;
use crate::ui::theme::Theme;

pub struct Results<'a> {
    pub summary: &'a ScoreSummary,
    pub scroll: usize,
    pub theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(summary: &'a ScoreSummary, scroll: usize, theme: &'a Theme) -> Self {
        Self {
            summary,
            scroll,
            theme,
        }
    }

    fn headline(&self) -> &'static str {
        match self.summary.accuracy_percent {
            100 => "Amazing! A perfect score!",
            80..=99 => "Great job!",
            50..=79 => "Good effort, keep practicing!",
            _ => "Keep going, you'll get there!",
        }
    }
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Practice Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(3),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.headline(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let acc_color = if self.summary.accuracy_percent >= 90 {
            colors.success()
        } else if self.summary.accuracy_percent >= 70 {
            colors.warning()
        } else {
            colors.error()
        };
        let acc_line = Line::from(vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}%", self.summary.accuracy_percent),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  ({}/{} correct)",
                    self.summary.correct, self.summary.total
                ),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(acc_line).render(layout[1], buf);

        let missed: Vec<&str> = self.summary.missed_words().collect();
        let missed_line = if missed.is_empty() {
            Line::from(Span::styled(
                "  No missed words",
                Style::default().fg(colors.success()),
            ))
        } else {
            Line::from(vec![
                Span::styled("  Practice again: ", Style::default().fg(colors.fg())),
                Span::styled(missed.join(", "), Style::default().fg(colors.error())),
            ])
        };
        Paragraph::new(missed_line).render(layout[2], buf);

        let header = Row::new(vec!["Word", "Your answer", ""]).style(
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        );
        let rows: Vec<Row> = self
            .summary
            .breakdown
            .iter()
            .skip(self.scroll)
            .map(|result| {
                let (mark, color) = if result.is_correct {
                    ("\u{2713}", colors.success())
                } else {
                    ("\u{2717}", colors.error())
                };
                Row::new(vec![
                    Span::styled(result.word.clone(), Style::default().fg(colors.fg())),
                    Span::styled(result.user_input.clone(), Style::default().fg(color)),
                    Span::styled(mark, Style::default().fg(color)),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Percentage(45),
                Constraint::Percentage(45),
                Constraint::Length(3),
            ],
        )
        .header(header)
        .block(Block::bordered().border_style(Style::default().fg(colors.border())));
        Widget::render(table, layout[3], buf);
    }
}
