use icu_normalizer::ComposingNormalizerBorrowed;

/// Canonical form used to compare a typed answer with the expected word:
/// trimmed, NFC-composed and lowercased.
pub fn fold(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc().normalize(text.trim());
    nfc.to_lowercase()
}

pub fn is_match(expected: &str, answer: &str) -> bool {
    fold(expected) == fold(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_word_matches() {
        assert!(is_match("banana", "banana"));
    }

    #[test]
    fn case_and_surrounding_space_are_ignored() {
        assert!(is_match("February", "  february "));
        assert!(is_match("said", "SAID"));
    }

    #[test]
    fn misspelling_does_not_match() {
        assert!(!is_match("banana", "bananna"));
        assert!(!is_match("their", "there"));
    }

    #[test]
    fn inner_whitespace_counts() {
        assert!(!is_match("ice cream", "icecream"));
        assert!(is_match("ice cream", "Ice Cream"));
    }

    #[test]
    fn composed_and_decomposed_accents_match() {
        assert!(is_match("caf\u{e9}", "cafe\u{301}"));
        assert!(is_match("CAF\u{c9}", "caf\u{e9}"));
    }

    #[test]
    fn non_ascii_case_folds() {
        assert!(is_match("\u{00c5}ngstr\u{00f6}m", "\u{00e5}NGSTR\u{00d6}M"));
    }
}
