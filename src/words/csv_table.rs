use std::collections::HashSet;

use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpellingList {
    pub name: String,
    pub words: Vec<String>,
}

/// Word lists keyed by column header, kept in header order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpellingLists {
    lists: Vec<SpellingList>,
}

impl SpellingLists {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.lists
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.words.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.iter().map(|l| l.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellingList> {
        self.lists.iter()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// True when at least one list has a word to practice.
    pub fn has_words(&self) -> bool {
        self.lists.iter().any(|l| !l.words.is_empty())
    }

    fn list_mut(&mut self, name: &str) -> &mut SpellingList {
        let idx = match self.lists.iter().position(|l| l.name == name) {
            Some(idx) => idx,
            None => {
                self.lists.push(SpellingList {
                    name: name.to_string(),
                    words: Vec::new(),
                });
                self.lists.len() - 1
            }
        };
        &mut self.lists[idx]
    }
}

impl FromIterator<(String, Vec<String>)> for SpellingLists {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut lists = SpellingLists::default();
        for (name, words) in iter {
            lists.list_mut(&name).words.extend(words);
        }
        lists
    }
}

/// Lines of `text` with `\r\n` or `\n` endings, skipping blank ones.
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// Parse a word-list CSV: the first line names the lists, every later line
/// holds one word per column. Embedded commas are not supported.
pub fn parse_table(text: &str) -> SpellingLists {
    let lines: Vec<&str> = content_lines(text).collect();
    if lines.len() < 2 {
        return SpellingLists::default();
    }

    let headers: Vec<&str> = lines[0].split(',').map(str::trim).collect();
    let mut lists = SpellingLists::default();
    for header in headers.iter().filter(|h| !h.is_empty()) {
        lists.list_mut(header);
    }

    let mut dropped = 0usize;
    for line in &lines[1..] {
        for (col, cell) in line.split(',').map(str::trim).enumerate() {
            if cell.is_empty() {
                continue;
            }
            match headers.get(col) {
                Some(header) if !header.is_empty() => {
                    lists.list_mut(header).words.push(cell.to_string());
                }
                _ => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        debug!(dropped, "ignored cells without a list header");
    }
    lists
}

/// Every distinct non-empty cell below the header, reading the file row by
/// row, left to right. Cells outside any list column are included.
pub fn distinct_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();
    for line in content_lines(text).skip(1) {
        for cell in line.split(',').map(str::trim) {
            if !cell.is_empty() && seen.insert(cell) {
                words.push(cell.to_string());
            }
        }
    }
    words
}
