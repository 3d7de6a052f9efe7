use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Full-screen message box for the loading and load-error screens.
pub struct StatusPanel<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub is_error: bool,
    pub theme: &'a Theme,
}

impl<'a> StatusPanel<'a> {
    pub fn loading(name: &'a str, theme: &'a Theme) -> Self {
        Self {
            title: name,
            message: "Loading words...",
            is_error: false,
            theme,
        }
    }

    pub fn error(message: &'a str, theme: &'a Theme) -> Self {
        Self {
            title: "Could not load words",
            message,
            is_error: true,
            theme,
        }
    }
}

impl Widget for StatusPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let accent = if self.is_error {
            colors.error()
        } else {
            colors.accent()
        };

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.message,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
        ];
        if self.is_error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Check the word-set paths in your config, or your connection.",
                Style::default().fg(colors.muted()),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_panel_shows_message() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 8);
        let mut buf = Buffer::empty(area);
        StatusPanel::error("Whoops. I don't have the words for Grade 5 yet.", &theme)
            .render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Could not load words"));
        assert!(text.contains("Grade 5"));
    }
}
