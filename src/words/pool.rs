use std::collections::HashSet;

use rand::Rng;

use crate::words::csv_table::SpellingLists;

/// The distinct words of one practice session, in the order they are asked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordPool {
    words: Vec<String>,
}

impl WordPool {
    /// Union the selected lists, drop duplicates, then shuffle once with `rng`.
    pub fn build<S, R>(lists: &SpellingLists, selected: &[S], rng: &mut R) -> Self
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut pool = Self::from_words(
            selected
                .iter()
                .filter_map(|name| lists.get(name.as_ref()))
                .flatten()
                .cloned(),
        );
        shuffle(&mut pool.words, rng);
        pool
    }

    /// Keep the given order, dropping repeats after their first occurrence.
    pub fn from_words<I: IntoIterator<Item = String>>(words: I) -> Self {
        let mut seen = HashSet::new();
        let words = words
            .into_iter()
            .filter(|w| seen.insert(w.clone()))
            .collect();
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Fisher-Yates: walk down from the last slot, swapping each with a uniform
/// pick from `[0, i]`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::csv_table::parse_table;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sorted(words: &[String]) -> Vec<String> {
        let mut v = words.to_vec();
        v.sort();
        v
    }

    #[test]
    fn union_collapses_duplicates_across_lists() {
        let lists = parse_table("A,B\nsaid,they\nthey,from\nwere,\n");
        let mut rng = SmallRng::seed_from_u64(7);
        let pool = WordPool::build(&lists, &["A", "B"], &mut rng);
        assert_eq!(pool.len(), 4);
        assert_eq!(sorted(pool.words()), vec!["from", "said", "they", "were"]);
    }

    #[test]
    fn pool_size_matches_distinct_count_for_many_seeds() {
        let lists = parse_table("A,B,C\na,b,a\nc,a,d\ne,,b\n");
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let pool = WordPool::build(&lists, &["A", "B", "C"], &mut rng);
            assert_eq!(sorted(pool.words()), vec!["a", "b", "c", "d", "e"]);
        }
    }

    #[test]
    fn same_seed_same_order() {
        let lists = parse_table("A\none\ntwo\nthree\nfour\nfive\nsix\n");
        let a = WordPool::build(&lists, &["A"], &mut SmallRng::seed_from_u64(99));
        let b = WordPool::build(&lists, &["A"], &mut SmallRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn empty_selection_gives_empty_pool() {
        let lists = parse_table("A\none\n");
        let none: [&str; 0] = [];
        let pool = WordPool::build(&lists, &none, &mut SmallRng::seed_from_u64(1));
        assert!(pool.is_empty());
    }

    #[test]
    fn unknown_list_names_contribute_nothing() {
        let lists = parse_table("A\none\n");
        let pool = WordPool::build(&lists, &["A", "Nope"], &mut SmallRng::seed_from_u64(1));
        assert_eq!(pool.words(), &["one".to_string()]);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(3);
        let original: Vec<u32> = (0..100).collect();
        let mut shuffled = original.clone();
        shuffle(&mut shuffled, &mut rng);
        assert_ne!(shuffled, original);
        shuffled.sort();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn shuffle_reaches_every_position() {
        // Each of 3 items should land first at least once over many runs.
        let mut firsts = HashSet::new();
        for seed in 0..200 {
            let mut items = ['a', 'b', 'c'];
            shuffle(&mut items, &mut SmallRng::seed_from_u64(seed));
            firsts.insert(items[0]);
        }
        assert_eq!(firsts.len(), 3);
    }

    #[test]
    fn from_words_keeps_first_occurrence_order() {
        let pool = WordPool::from_words(["b", "a", "b", "c", "a"].map(String::from));
        assert_eq!(pool.words(), &["b", "a", "c"].map(String::from));
    }
}
