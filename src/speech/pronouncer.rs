use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use crate::speech::{AudioSink, CancelToken, SpeechError, SpeechSynthesizer};

pub type Ticket = u64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechStatus {
    Played,
    /// Superseded by a newer request or stopped explicitly.
    Cancelled,
    Failed(String),
    /// No synthesizer configured.
    Unavailable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechOutcome {
    pub ticket: Ticket,
    pub word: String,
    pub status: SpeechStatus,
}

pub type Notify = Arc<dyn Fn(SpeechOutcome) + Send + Sync>;

/// Speaks one word at a time. Starting a new word cancels whatever was still
/// being fetched or played; every request reports exactly one outcome.
pub struct Pronouncer {
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    sink: Arc<dyn AudioSink>,
    notify: Notify,
    current: Option<CancelToken>,
    last_ticket: Ticket,
}

impl Pronouncer {
    pub fn new(
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
        sink: Arc<dyn AudioSink>,
        notify: Notify,
    ) -> Self {
        Self {
            synthesizer,
            sink,
            notify,
            current: None,
            last_ticket: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn speak(&mut self, word: &str) -> Ticket {
        self.cancel_current();
        self.last_ticket += 1;
        let ticket = self.last_ticket;

        let Some(synthesizer) = self.synthesizer.clone() else {
            (self.notify)(SpeechOutcome {
                ticket,
                word: word.to_string(),
                status: SpeechStatus::Unavailable,
            });
            return ticket;
        };

        let cancel = CancelToken::default();
        self.current = Some(cancel.clone());
        let sink = Arc::clone(&self.sink);
        let notify = Arc::clone(&self.notify);
        let word = word.to_string();

        thread::spawn(move || {
            let status = run_request(synthesizer.as_ref(), sink.as_ref(), &word, &cancel);
            notify(SpeechOutcome {
                ticket,
                word,
                status,
            });
        });
        ticket
    }

    pub fn cancel_current(&mut self) {
        if let Some(token) = self.current.take() {
            token.cancel();
        }
    }
}

impl Drop for Pronouncer {
    fn drop(&mut self) {
        self.cancel_current();
    }
}

fn run_request(
    synthesizer: &dyn SpeechSynthesizer,
    sink: &dyn AudioSink,
    word: &str,
    cancel: &CancelToken,
) -> SpeechStatus {
    let clip = match synthesizer.synthesize(word) {
        Ok(clip) => clip,
        Err(err) if cancel.is_cancelled() => {
            debug!(word, error = %err, "superseded request failed");
            return SpeechStatus::Cancelled;
        }
        Err(err) => {
            warn!(word, error = %err, "pronunciation failed");
            return SpeechStatus::Failed(err.to_string());
        }
    };
    if cancel.is_cancelled() {
        debug!(word, "superseded before playback");
        return SpeechStatus::Cancelled;
    }
    match sink.play(&clip, cancel) {
        Ok(()) => SpeechStatus::Played,
        Err(SpeechError::Cancelled) => SpeechStatus::Cancelled,
        Err(err) => {
            warn!(word, error = %err, "playback failed");
            SpeechStatus::Failed(err.to_string())
        }
    }
}
