use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;
use crate::words::csv_table::SpellingLists;

/// Checkbox list of spelling lists with their word counts.
pub struct ListPicker<'a> {
    pub title: &'a str,
    pub lists: &'a SpellingLists,
    pub checked: &'a [bool],
    pub cursor: usize,
    pub theme: &'a Theme,
}

impl<'a> ListPicker<'a> {
    pub fn new(
        title: &'a str,
        lists: &'a SpellingLists,
        checked: &'a [bool],
        cursor: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            lists,
            checked,
            cursor,
            theme,
        }
    }

    fn selected_word_count(&self) -> usize {
        self.lists
            .iter()
            .zip(self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(list, _)| list.words.len())
            .sum()
    }
}

fn word_count(n: usize) -> String {
    if n == 1 {
        "1 word".to_string()
    } else {
        format!("{n} words")
    }
}

impl Widget for ListPicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "  Pick the lists to practice",
            Style::default().fg(colors.fg()),
        )))
        .render(layout[0], buf);

        // Keep the cursor row visible.
        let visible = layout[1].height as usize;
        let offset = if visible > 0 && self.cursor >= visible {
            self.cursor + 1 - visible
        } else {
            0
        };

        let lines: Vec<Line> = self
            .lists
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(i, list)| {
                let is_cursor = i == self.cursor;
                let checked = self.checked.get(i).copied().unwrap_or(false);
                let mark = if checked { "[x]" } else { "[ ]" };
                let indicator = if is_cursor { ">" } else { " " };
                let label_style = if is_cursor {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(vec![
                    Span::styled(format!(" {indicator} {mark} "), label_style),
                    Span::styled(list.name.clone(), label_style),
                    Span::styled(
                        format!("  ({})", word_count(list.words.len())),
                        Style::default().fg(colors.muted()),
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);

        let count = self.selected_word_count();
        let footer = if count == 0 {
            Span::styled(
                "  Select at least one list to start",
                Style::default().fg(colors.muted()),
            )
        } else {
            Span::styled(
                format!("  {} selected", word_count(count)),
                Style::default().fg(colors.success()),
            )
        };
        Paragraph::new(Line::from(footer)).render(layout[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::csv_table::parse_table;

    fn render_text(picker: ListPicker) -> String {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        picker.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn shows_checkboxes_and_counts() {
        let lists = parse_table("Week 1,Week 2\ncat,dog\nhat,\n");
        let theme = Theme::default();
        let checked = [true, false];
        let text = render_text(ListPicker::new("Grade 4", &lists, &checked, 1, &theme));
        assert!(text.contains("[x] Week 1"));
        assert!(text.contains("[ ] Week 2"));
        assert!(text.contains("(2 words)"));
        assert!(text.contains("(1 word)"));
        assert!(text.contains("2 words selected"));
    }

    #[test]
    fn empty_selection_hint() {
        let lists = parse_table("A\nx\n");
        let theme = Theme::default();
        let text = render_text(ListPicker::new("Set", &lists, &[false], 0, &theme));
        assert!(text.contains("Select at least one list"));
    }
}
