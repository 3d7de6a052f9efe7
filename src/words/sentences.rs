use std::collections::HashMap;

use crate::words::csv_table::content_lines;

pub const HEADER: &str = "word,sentence";

/// Example sentences keyed by word, with the word itself masked out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentenceMap {
    sentences: HashMap<String, String>,
}

impl SentenceMap {
    /// Parse a `word,sentence` CSV. The header line is skipped and only the
    /// first comma on each line separates the two fields.
    pub fn parse(text: &str) -> Self {
        let mut sentences = HashMap::new();
        for line in content_lines(text).skip(1) {
            let Some((word, sentence)) = line.split_once(',') else {
                continue;
            };
            sentences.insert(word.trim().to_string(), unquote(sentence.trim()));
        }
        Self { sentences }
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.sentences.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Skeleton sentence file for `words`: the header plus one `word,` row each,
/// ready to be filled in by hand.
pub fn template_csv<S: AsRef<str>>(words: &[S]) -> String {
    let mut out = format!("{HEADER}\n");
    for word in words {
        out.push_str(word.as_ref());
        out.push_str(",\n");
    }
    out
}

/// One `word,"sentence"` line with inner quotes doubled. Line breaks collapse
/// to spaces because the file is read line by line.
pub fn csv_row(word: &str, sentence: &str) -> String {
    let flat = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{word},\"{}\"", flat.replace('"', "\"\""))
}

fn unquote(field: &str) -> String {
    if !(field.starts_with('"') && field.ends_with('"')) {
        return field.to_string();
    }
    // A lone `"` opens and closes at once, leaving nothing inside.
    let inner = field.get(1..field.len() - 1).unwrap_or_default();
    inner.replace("\"\"", "\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_sentence_with_comma() {
        let map = SentenceMap::parse("word,sentence\napple,\"He ate the apple, quickly\"\n");
        assert_eq!(map.get("apple"), Some("He ate the apple, quickly"));
    }

    #[test]
    fn only_first_comma_splits() {
        let map = SentenceMap::parse("word,sentence\nfriend,My _, Sam, is kind.\n");
        assert_eq!(map.get("friend"), Some("My _, Sam, is kind."));
    }

    #[test]
    fn doubled_quotes_are_unescaped() {
        let map = SentenceMap::parse("word,sentence\nsaid,\"She _ \"\"hello\"\", then left\"\n");
        assert_eq!(map.get("said"), Some("She _ \"hello\", then left"));
    }

    #[test]
    fn unbalanced_quote_is_left_alone() {
        let map = SentenceMap::parse("word,sentence\nquote,\"Half quoted\n");
        assert_eq!(map.get("quote"), Some("\"Half quoted"));
    }

    #[test]
    fn lone_quote_becomes_empty() {
        let map = SentenceMap::parse("word,sentence\nmark,\"\nbare,\"\"\n");
        assert_eq!(map.get("mark"), Some(""));
        assert_eq!(map.get("bare"), Some(""));
    }

    #[test]
    fn header_is_skipped_and_missing_words_fall_back() {
        let map = SentenceMap::parse("word,sentence\r\nthey,_ went home.\r\nnocomma\r\n");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("word"), None);
        assert_eq!(map.get("nocomma"), None);
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn template_lists_every_word() {
        let csv = template_csv(&["they", "said"]);
        assert_eq!(csv, "word,sentence\nthey,\nsaid,\n");
        let map = SentenceMap::parse(&csv);
        assert_eq!(map.get("said"), Some(""));
    }

    #[test]
    fn written_rows_parse_back() {
        let rows = [
            ("said", "She _ \"hello\", then left."),
            ("island", "We sailed to the _,\nfar away."),
            ("they", "_ went home."),
        ];
        let mut csv = format!("{HEADER}\n");
        for (word, sentence) in rows {
            csv.push_str(&csv_row(word, sentence));
            csv.push('\n');
        }
        assert!(csv.contains("said,\"She _ \"\"hello\"\", then left.\""));

        let map = SentenceMap::parse(&csv);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("said"), Some("She _ \"hello\", then left."));
        assert_eq!(map.get("island"), Some("We sailed to the _, far away."));
        assert_eq!(map.get("they"), Some("_ went home."));
    }

    #[test]
    fn later_line_replaces_earlier() {
        let map = SentenceMap::parse("word,sentence\nsaid,first\nsaid,second\n");
        assert_eq!(map.get("said"), Some("second"));
    }
}
