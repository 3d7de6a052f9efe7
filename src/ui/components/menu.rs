use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::WordSetConfig;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

/// Word-set (grade) picker shown at startup.
pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn for_word_sets(sets: &[WordSetConfig], theme: &'a Theme) -> Self {
        let items = sets
            .iter()
            .enumerate()
            .map(|(i, set)| MenuItem {
                key: if i < 9 {
                    (i + 1).to_string()
                } else {
                    " ".to_string()
                },
                label: set.name.clone(),
                description: describe_source(&set.lists),
            })
            .collect();
        Self {
            items,
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    /// Digit shortcut `1`..`9` to item index.
    pub fn index_for_key(&self, ch: char) -> Option<usize> {
        let digit = ch.to_digit(10)? as usize;
        (1..=self.items.len()).contains(&digit).then(|| digit - 1)
    }
}

fn describe_source(lists: &str) -> String {
    if let Some(name) = lists.strip_prefix("builtin:") {
        format!("Bundled lists ({name})")
    } else if lists.starts_with("http://") || lists.starts_with("https://") {
        format!("Download {lists}")
    } else {
        lists.to_string()
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "spellbee",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Choose your grade",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(" {indicator} [{key}] {label}", key = item.key, label = item.label);
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    &*label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(&*desc_text, Style::default().fg(colors.muted()))),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(n: usize) -> Vec<WordSetConfig> {
        (0..n)
            .map(|i| WordSetConfig {
                name: format!("Grade {i}"),
                lists: format!("grade{i}.csv"),
                sentences: None,
            })
            .collect()
    }

    #[test]
    fn navigation_wraps() {
        let theme = Theme::default();
        let mut menu = Menu::for_word_sets(&sets(3), &theme);
        menu.prev();
        assert_eq!(menu.selected, 2);
        menu.next();
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn digit_shortcuts() {
        let theme = Theme::default();
        let menu = Menu::for_word_sets(&sets(2), &theme);
        assert_eq!(menu.index_for_key('1'), Some(0));
        assert_eq!(menu.index_for_key('2'), Some(1));
        assert_eq!(menu.index_for_key('3'), None);
        assert_eq!(menu.index_for_key('0'), None);
        assert_eq!(menu.index_for_key('x'), None);
    }

    #[test]
    fn descriptions_name_the_source() {
        assert_eq!(describe_source("builtin:a.csv"), "Bundled lists (a.csv)");
        assert_eq!(
            describe_source("https://example.com/l.csv"),
            "Download https://example.com/l.csv"
        );
        assert_eq!(describe_source("lists.csv"), "lists.csv");
    }

    #[test]
    fn renders_labels() {
        let theme = Theme::default();
        let menu = Menu::for_word_sets(&sets(2), &theme);
        let area = Rect::new(0, 0, 50, 16);
        let mut buf = Buffer::empty(area);
        (&menu).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("spellbee"));
        assert!(text.contains("[1] Grade 0"));
        assert!(text.contains("[2] Grade 1"));
    }
}
