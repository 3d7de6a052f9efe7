use std::collections::BTreeSet;
use std::fs;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use spellbee::config::WordSetConfig;
use spellbee::session::quiz::{Advance, QuizSession, QuizState};
use spellbee::session::summary::ScoreSummary;
use spellbee::speech::pronouncer::{Notify, Pronouncer, SpeechOutcome, SpeechStatus};
use spellbee::speech::{AudioClip, AudioFormat, AudioSink, CancelToken, SpeechError, SpeechSynthesizer};
use spellbee::words::csv_table::parse_table;
use spellbee::words::pool::WordPool;
use spellbee::words::sentences::SentenceMap;
use spellbee::words::source::{LoadError, load_word_set};

const TWO_LISTS: &str = "List1,List2\napple,banana\ncherry,";

fn both_lists_session(seed: u64) -> QuizSession {
    let lists = parse_table(TWO_LISTS);
    let mut rng = SmallRng::seed_from_u64(seed);
    let pool = WordPool::build(&lists, &["List1", "List2"], &mut rng);
    QuizSession::new(pool).unwrap()
}

/// Answer every word with `answer_for(word)`, advancing after each, and
/// return the summary handed over at the end.
fn run_session(mut quiz: QuizSession, answer_for: impl Fn(&str) -> String) -> ScoreSummary {
    loop {
        let word = quiz.current_word().unwrap().to_string();
        assert!(quiz.submit(&answer_for(&word)).is_some());
        match quiz.advance() {
            Advance::Next { .. } => continue,
            Advance::Finished(results) => {
                assert_eq!(quiz.state(), QuizState::Finished);
                return ScoreSummary::from_results(results).unwrap();
            }
            Advance::Ignored => panic!("advance ignored during feedback"),
        }
    }
}

#[test]
fn csv_to_perfect_score() {
    let lists = parse_table(TWO_LISTS);
    assert_eq!(lists.get("List1").unwrap(), ["apple", "cherry"]);
    assert_eq!(lists.get("List2").unwrap(), ["banana"]);

    let mut rng = SmallRng::seed_from_u64(1);
    let pool = WordPool::build(&lists, &["List1", "List2"], &mut rng);
    let words: BTreeSet<&str> = pool.words().iter().map(String::as_str).collect();
    assert_eq!(words, BTreeSet::from(["apple", "banana", "cherry"]));
    assert_eq!(pool.len(), 3);

    let quiz = QuizSession::new(pool).unwrap();

    let summary = run_session(quiz, |w| format!("  {}  ", w.to_uppercase()));
    assert_eq!((summary.correct, summary.total), (3, 3));
    assert_eq!(summary.accuracy_percent, 100);
    assert!(summary.is_perfect());
}

#[test]
fn one_misspelling_scores_67() {
    let summary = run_session(both_lists_session(2), |w| {
        if w == "banana" {
            "bananna".to_string()
        } else {
            w.to_string()
        }
    });
    assert_eq!((summary.correct, summary.total), (2, 3));
    assert_eq!(summary.accuracy_percent, 67);

    let miss = summary
        .breakdown
        .iter()
        .find(|r| r.word == "banana")
        .unwrap();
    assert!(!miss.is_correct);
    assert_eq!(miss.user_input, "bananna");
    assert_eq!(summary.missed_words().collect::<Vec<_>>(), ["banana"]);
}

#[test]
fn pool_size_is_distinct_union_for_every_selection() {
    let lists = parse_table("A,B,C\nsaid,said,they\nwere,could,said\nthey,,were\n");
    let names = ["A", "B", "C"];
    for mask in 1u8..8 {
        let selected: Vec<&str> = names
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, n)| *n)
            .collect();
        let expected: BTreeSet<&str> = selected
            .iter()
            .flat_map(|n| lists.get(n).unwrap().iter().map(String::as_str))
            .collect();
        let mut rng = SmallRng::seed_from_u64(mask as u64);
        let pool = WordPool::build(&lists, &selected, &mut rng);
        assert_eq!(pool.len(), expected.len(), "selection {selected:?}");
        let got: BTreeSet<&str> = pool.words().iter().map(String::as_str).collect();
        assert_eq!(got, expected);
    }
}

#[test]
fn double_submit_records_one_result() {
    let mut quiz = both_lists_session(3);
    quiz.submit("wrong");
    quiz.submit("again");
    assert_eq!(quiz.results().len(), 1);
    assert_eq!(quiz.results()[0].user_input, "wrong");
}

#[test]
fn sentence_with_comma_survives_parsing() {
    let map = SentenceMap::parse("word,sentence\napple,\"He ate the apple, quickly\"\n");
    assert_eq!(map.get("apple"), Some("He ate the apple, quickly"));
}

#[test]
fn word_set_loads_from_disk_and_rejects_html() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lists.csv"), TWO_LISTS).unwrap();
    fs::write(
        dir.path().join("sentences.csv"),
        "word,sentence\ncherry,A _ on top.\n",
    )
    .unwrap();
    fs::write(dir.path().join("lists_grade5.csv"), "<!DOCTYPE html>\n<html></html>").unwrap();

    let grade4 = WordSetConfig {
        name: "Grade 4".to_string(),
        lists: "lists.csv".to_string(),
        sentences: Some("sentences.csv".to_string()),
    };
    let loaded = load_word_set(&grade4, dir.path()).unwrap();
    assert_eq!(loaded.lists.len(), 2);
    assert_eq!(loaded.sentences.get("cherry"), Some("A _ on top."));

    let grade5 = WordSetConfig {
        name: "Grade 5".to_string(),
        lists: "lists_grade5.csv".to_string(),
        sentences: Some("sentences_grade5.csv".to_string()),
    };
    let err = load_word_set(&grade5, dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::NotCsv(_)));
    assert!(err.to_string().contains("Grade 5"));
}

struct ScriptedSynth;

impl SpeechSynthesizer for ScriptedSynth {
    fn synthesize(&self, text: &str) -> Result<AudioClip, SpeechError> {
        if text == "cherry" {
            return Err(SpeechError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(AudioClip {
            bytes: text.as_bytes().to_vec(),
            format: AudioFormat::Encoded,
        })
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<String>>);

impl AudioSink for Recorder {
    fn play(&self, clip: &AudioClip, _cancel: &CancelToken) -> Result<(), SpeechError> {
        self.0
            .lock()
            .unwrap()
            .push(String::from_utf8_lossy(&clip.bytes).into_owned());
        Ok(())
    }
}

#[test]
fn speech_failures_never_touch_the_session() {
    let (tx, rx) = mpsc::channel::<SpeechOutcome>();
    let notify: Notify = Arc::new(move |o| {
        let _ = tx.send(o);
    });
    let sink = Arc::new(Recorder::default());
    let mut pronouncer = Pronouncer::new(Some(Arc::new(ScriptedSynth)), sink.clone(), notify);

    let mut quiz = both_lists_session(4);
    let mut failures = 0;
    while let Some(word) = quiz.current_word().map(str::to_string) {
        pronouncer.speak(&word);
        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.word, word);
        if matches!(outcome.status, SpeechStatus::Failed(_)) {
            failures += 1;
        }
        quiz.submit(&word);
        if let Advance::Finished(results) = quiz.advance() {
            assert_eq!(results.len(), 3);
            break;
        }
    }
    assert_eq!(failures, 1);
    let played = sink.0.lock().unwrap();
    assert_eq!(played.len(), 2);
    assert!(!played.contains(&"cherry".to_string()));
}
