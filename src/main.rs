use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{error, info};

use spellbee::app::{App, AppScreen};
use spellbee::config::{Config, WordSetConfig};
use spellbee::event::{AppEvent, EventHandler};
use spellbee::logging;
use spellbee::speech::playback::AudioDevice;
use spellbee::speech::pronouncer::{Notify, Pronouncer};
use spellbee::speech::{SpeechProvider, build_synthesizer};
use spellbee::ui::components::list_picker::ListPicker;
use spellbee::ui::components::quiz_view::QuizView;
use spellbee::ui::components::results::Results;
use spellbee::ui::components::status::StatusPanel;
use spellbee::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use spellbee::ui::line_input::InputResult;
use spellbee::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "spellbee", version, about = "Spelling practice in the terminal")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Directory that relative word-list paths resolve against")]
    data_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "LOCATION",
        help = "Practice from this lists CSV (path, URL or builtin:<file>) instead of a grade"
    )]
    lists: Option<String>,

    #[arg(
        long,
        value_name = "LOCATION",
        requires = "lists",
        help = "Example sentences CSV to go with --lists"
    )]
    sentences: Option<String>,

    #[arg(long, help = "Speech provider (gemini, google-cloud, off)")]
    speech: Option<SpeechProvider>,

    #[arg(long, conflicts_with = "speech", help = "Don't pronounce words")]
    no_speech: bool,

    #[arg(long, help = "Seed for the word order")]
    seed: Option<u64>,

    #[arg(long, help = "Write the effective configuration file and exit")]
    init_config: bool,
}

const HINT_GRADES: [&str; 4] = ["[Enter/1-9] Choose", "[j/k] Move", "[t] Theme", "[q] Quit"];
const HINT_ERROR: [&str; 3] = ["[r] Retry", "[Esc] Back", "[q] Quit"];
const HINT_LISTS: [&str; 5] = [
    "[Space] Toggle",
    "[a] All",
    "[Enter] Start",
    "[Esc] Back",
    "[q] Quit",
];
const HINT_QUIZ_ANSWER: [&str; 3] = ["[Enter] Check", "[Tab/Ctrl-R] Hear again", "[Esc] Stop"];
const HINT_QUIZ_FEEDBACK: [&str; 3] = ["[Enter] Continue", "[Tab/Ctrl-R] Hear again", "[Esc] Stop"];
const HINT_RESULTS: [&str; 4] = ["[Enter/r] New practice session", "[j/k] Scroll", "[Esc] Grades", "[q] Quit"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    apply_overrides(&mut config, &cli);

    if cli.init_config {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spellbee");
    let _log_guard = match logging::init(&log_dir) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("logging disabled: {err}");
            None
        }
    };
    info!(version = env!("CARGO_PKG_VERSION"), "spellbee starting");

    let theme: &'static Theme = Box::leak(Box::new(
        Theme::load(&config.theme).unwrap_or_default(),
    ));

    let events = EventHandler::new(Duration::from_millis(100));

    let (_audio_device, sink) = AudioDevice::open(config.speech.volume);
    let synthesizer = build_synthesizer(&config.speech);
    let speech_tx = events.sender();
    let notify: Notify = Arc::new(move |outcome| {
        let _ = speech_tx.send(AppEvent::Speech(outcome));
    });
    let pronouncer = Pronouncer::new(synthesizer, sink, notify);

    let rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut app = App::new(config, theme, pronouncer, rng);
    if cli.lists.is_some() {
        app.request_load(0);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = ?err, "exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    if let Some(lists) = &cli.lists {
        config.word_sets = vec![WordSetConfig {
            name: "Custom lists".to_string(),
            lists: lists.clone(),
            sentences: cli.sentences.clone(),
        }];
    }
    if let Some(provider) = cli.speech {
        config.speech.provider = provider.as_str().to_string();
    }
    if cli.no_speech {
        config.speech.provider = SpeechProvider::Off.as_str().to_string();
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        // The loading screen is on screen now; do the blocking load.
        if app.has_pending_load() {
            app.perform_pending_load();
            continue;
        }

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(_, _) => {}
            AppEvent::Speech(outcome) => app.on_speech(outcome),
        }

        if app.should_quit {
            info!("spellbee exiting");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::GradeSelect => handle_grade_key(app, key),
        AppScreen::Loading => {}
        AppScreen::Error => handle_error_key(app, key),
        AppScreen::ListSelect => handle_list_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
    }
}

fn handle_grade_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.grade_menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.grade_menu.next(),
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Enter => app.request_load(app.grade_menu.selected),
        KeyCode::Char(ch) => {
            if let Some(index) = app.grade_menu.index_for_key(ch) {
                app.grade_menu.selected = index;
                app.request_load(index);
            }
        }
        _ => {}
    }
}

fn handle_error_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry_load(),
        KeyCode::Esc | KeyCode::Char('b') => app.go_to_grade_select(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.go_to_grade_select(),
        KeyCode::Up | KeyCode::Char('k') => app.list_cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.list_cursor_down(),
        KeyCode::Char(' ') => app.toggle_current_list(),
        KeyCode::Char('a') => app.toggle_all_lists(),
        KeyCode::Enter => app.start_practice(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    let replay = key.code == KeyCode::Tab
        || (key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL));
    if replay {
        app.replay_word();
        return;
    }

    let awaiting = app.quiz.as_ref().is_some_and(|q| q.is_awaiting_answer());
    if !awaiting {
        match key.code {
            KeyCode::Enter => app.next_word(),
            KeyCode::Esc => app.abandon_quiz(),
            _ => {}
        }
        return;
    }

    match app.answer.handle(key) {
        InputResult::Submit => app.submit_answer(),
        InputResult::Cancel => app.abandon_quiz(),
        InputResult::Continue => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('r') => app.new_session(),
        KeyCode::Up | KeyCode::Char('k') => app.results_scroll_up(),
        KeyCode::Down | KeyCode::Char('j') => app.results_scroll_down(),
        KeyCode::Esc => app.go_to_grade_select(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hints: &[&str] = match app.screen {
        AppScreen::GradeSelect => &HINT_GRADES,
        AppScreen::Loading => &[],
        AppScreen::Error => &HINT_ERROR,
        AppScreen::ListSelect => &HINT_LISTS,
        AppScreen::Quiz => {
            if app.verdict().is_some() {
                &HINT_QUIZ_FEEDBACK
            } else {
                &HINT_QUIZ_ANSWER
            }
        }
        AppScreen::Results => &HINT_RESULTS,
    };
    let hint_lines = pack_hint_lines(hints, area.width as usize);
    let layout = AppLayout::new(area, hint_lines.len() as u16);

    render_header(frame, app, layout.header);

    match app.screen {
        AppScreen::GradeSelect => {
            let menu_area = centered_rect(60, 8 + 3 * app.grade_menu.items.len() as u16, layout.main);
            frame.render_widget(&app.grade_menu, menu_area);
        }
        AppScreen::Loading => {
            let name = app
                .grade_menu
                .items
                .get(app.grade_menu.selected)
                .map(|item| item.label.as_str())
                .unwrap_or("Words");
            frame.render_widget(
                StatusPanel::loading(name, app.theme),
                centered_rect(50, 5, layout.main),
            );
        }
        AppScreen::Error => {
            let message = app.error_message.as_deref().unwrap_or("Something went wrong.");
            frame.render_widget(
                StatusPanel::error(message, app.theme),
                centered_rect(70, 8, layout.main),
            );
        }
        AppScreen::ListSelect => {
            if let Some(set) = &app.word_set {
                let picker = ListPicker::new(
                    &set.name,
                    &set.lists,
                    &app.list_checked,
                    app.list_cursor,
                    app.theme,
                );
                let height = 6 + set.lists.len() as u16;
                frame.render_widget(picker, centered_rect(60, height, layout.main));
            }
        }
        AppScreen::Quiz => {
            if let Some(quiz) = &app.quiz {
                let view = QuizView::new(
                    quiz,
                    &app.answer,
                    app.current_sentence(),
                    &app.speech,
                    app.spinner_frame,
                    app.theme,
                );
                frame.render_widget(view, centered_rect(72, 22, layout.main));
            }
        }
        AppScreen::Results => {
            if let Some(summary) = &app.summary {
                let results = Results::new(summary, app.results_scroll, app.theme);
                frame.render_widget(results, centered_rect(72, 24, layout.main));
            }
        }
    }

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let context = match (&app.screen, &app.word_set) {
        (AppScreen::GradeSelect | AppScreen::Loading | AppScreen::Error, _) | (_, None) => {
            String::new()
        }
        (_, Some(set)) => format!(" | {}", set.name),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " spellbee ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            context,
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}
