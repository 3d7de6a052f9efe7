use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use spellbee::config::Config;
use spellbee::logging;
use spellbee::words::csv_table::{distinct_words, parse_table};
use spellbee::words::sentences::template_csv;
use spellbee::words::source::Location;

/// Print every distinct word of a spelling-lists CSV, first-seen order.
#[derive(Parser)]
#[command(name = "list_words", version)]
struct Cli {
    /// Lists CSV: path, http(s) URL, or builtin:<file>
    location: String,

    #[arg(long, help = "Directory relative paths resolve against (default: configured data_dir)")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Print a word,sentence CSV skeleton instead of bare words")]
    sentences_template: bool,

    #[arg(
        long,
        conflicts_with = "sentences_template",
        help = "Print a word,sentence CSV with example sentences written by Gemini (reads GEMINI_API_KEY)"
    )]
    generate_sentences: bool,
}

fn main() -> Result<()> {
    logging::init_stderr()?;
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir());

    let location = Location::parse(&cli.location, &data_dir);
    let text = location.fetch_text()?;
    let lists = parse_table(&text);
    let words = distinct_words(&text);
    if words.is_empty() {
        bail!("no words found in {location}");
    }
    eprintln!("{} words across {} lists", words.len(), lists.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.generate_sentences {
        generate::write_sentences(&words, &config, &mut out)?;
    } else if cli.sentences_template {
        out.write_all(template_csv(&words).as_bytes())?;
    } else {
        for word in &words {
            writeln!(out, "{word}")?;
        }
    }
    Ok(())
}

#[cfg(feature = "network")]
mod generate {
    use std::io::Write;
    use std::thread;
    use std::time::Duration;

    use anyhow::{Result, bail};
    use tracing::{info, warn};

    use spellbee::config::Config;
    use spellbee::speech::SpeechProvider;
    use spellbee::speech::gemini::SentenceWriter;
    use spellbee::words::sentences::{HEADER, csv_row};

    const REQUEST_PAUSE: Duration = Duration::from_secs(1);

    /// Rows are written as they arrive; a word whose request fails is logged
    /// and left out.
    pub fn write_sentences(words: &[String], config: &Config, out: &mut impl Write) -> Result<()> {
        let Some(api_key) = gemini_key(config) else {
            bail!("GEMINI_API_KEY not found in the environment or config");
        };
        let writer = SentenceWriter::new(api_key, config.speech.timeout_secs)?;

        writeln!(out, "{HEADER}")?;
        let mut written = 0usize;
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                thread::sleep(REQUEST_PAUSE);
            }
            info!(word = %word, "generating sentence");
            match writer.sentence(word) {
                Ok(sentence) => {
                    writeln!(out, "{}", csv_row(word, &sentence))?;
                    out.flush()?;
                    written += 1;
                }
                Err(err) => warn!(word = %word, error = %err, "sentence generation failed"),
            }
        }
        info!(written, total = words.len(), "sentences done");
        Ok(())
    }

    fn gemini_key(config: &Config) -> Option<String> {
        (config.speech.provider() == SpeechProvider::Gemini)
            .then(|| config.speech.resolve_api_key())
            .flatten()
            .or_else(|| {
                std::env::var(SpeechProvider::Gemini.default_key_env())
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

#[cfg(not(feature = "network"))]
mod generate {
    use std::io::Write;

    use anyhow::{Result, bail};

    use spellbee::config::Config;

    pub fn write_sentences(_words: &[String], _config: &Config, _out: &mut impl Write) -> Result<()> {
        bail!("sentence generation needs the `network` feature")
    }
}
