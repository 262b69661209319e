// ============================================
// src/main.rs (terminal front-end)
// ============================================

use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Confirm;

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use pimpampet::language::LANGUAGE_STORAGE_KEY;
use pimpampet::questions::FALLBACK_QUESTIONS;
use pimpampet::{
    BuiltinQuestions, FileStore, GameConfig, KeyValueStore, Language, LetterWheel,
    QuestionRotator, Rejection, SpinOutcome, SpinTiming, StoreError, spin,
};

const LOG_FILE: &str = "pimpampet.log";

type Rotator = QuestionRotator<BuiltinQuestions, FileStore>;

// --------------------------------------------------
// Command line
// --------------------------------------------------

#[derive(Parser)]
#[command(
    name = "pimpampet",
    version,
    about = "Spin the wheel, get a letter, answer the question."
)]
struct Cli {
    /// Question language (dutch or english)
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Directory for saved questions and the log file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to config.json in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play in the terminal (default)
    Play,
    /// Spin once and print the letter and a question
    Round,
    /// Manage custom questions
    Questions {
        #[command(subcommand)]
        action: QuestionAction,
    },
}

#[derive(Subcommand)]
enum QuestionAction {
    /// List default and custom questions
    List,
    /// Add a custom question
    Add { text: String },
    /// Replace custom question NUMBER (as shown by `list`)
    Edit { number: usize, text: String },
    /// Delete custom question NUMBER (as shown by `list`)
    Delete {
        number: usize,
        #[arg(long)]
        yes: bool,
    },
    /// Remove custom questions of the language, or of all languages with --all
    Reset {
        #[arg(long)]
        all: bool,
        #[arg(long)]
        yes: bool,
    },
}

// --------------------------------------------------
// Labels
// --------------------------------------------------

struct Labels {
    title: &'static str,
    question: &'static str,
    letter: &'static str,
    instruction: &'static str,
    round: &'static str,
    start: &'static str,
    spinning: &'static str,
    help: &'static str,
    not_saved: &'static str,
}

fn labels(language: Language) -> &'static Labels {
    const DUTCH: Labels = Labels {
        title: "Pim Pam Pet Woordspel",
        question: "Vraag:",
        letter: "Letter:",
        instruction: "Bedenk een woord dat begint met de letter",
        round: "Ronde",
        start: "Druk op Enter om te beginnen",
        spinning: "Aan het draaien...",
        help: "Spatie: draai   Enter: volgende vraag   L: English   Esc: stop",
        not_saved: "Vragen konden niet worden opgeslagen.",
    };
    const ENGLISH: Labels = Labels {
        title: "Pim Pam Pet Word Game",
        question: "Question:",
        letter: "Letter:",
        instruction: "Think of a word that starts with the letter",
        round: "Round",
        start: "Press Enter to start",
        spinning: "Spinning...",
        help: "Space: spin   Enter: next question   L: Nederlands   Esc: quit",
        not_saved: "Questions could not be saved.",
    };
    match language {
        Language::Dutch => &DUTCH,
        Language::English => &ENGLISH,
    }
}

// --------------------------------------------------
// Setup
// --------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(GameConfig::default_path);
    let config = GameConfig::load(&config_path).context("failed to load config")?;

    let store = match &cli.data_dir {
        Some(dir) => FileStore::open(dir),
        None => FileStore::open_default(),
    }
    .context("failed to open data directory")?;

    let command = cli.command.unwrap_or(Command::Play);
    init_logger(store.dir(), matches!(command, Command::Play));

    let language = cli
        .lang
        .or(config.language)
        .or_else(|| stored_language(&store))
        .unwrap_or_default();
    let source = BuiltinQuestions::new().with_language(language);
    let mut rotator = QuestionRotator::new(source, store, config.rotator.clone());
    let wheel = LetterWheel::from_config(&config.wheel).context("invalid wheel configuration")?;

    match command {
        Command::Play => {
            let mut terminal = setup_terminal()?;
            let result = run_app(&mut terminal, AppState::new(wheel, rotator, config.timing));
            restore_terminal()?;
            result
        }
        Command::Round => run_round(wheel, &mut rotator, &config.timing),
        Command::Questions { action } => manage_questions(&mut rotator, action),
    }
}

/// Logs go to a file while the alternate screen is up, to stderr otherwise.
fn init_logger(data_dir: &Path, tui: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if tui {
        match File::create(data_dir.join(LOG_FILE)) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }
    let _ = builder.try_init();
}

fn stored_language(store: &FileStore) -> Option<Language> {
    let raw = store.get(LANGUAGE_STORAGE_KEY).ok()??;
    serde_json::from_str(&raw).ok()
}

fn save_language(rotator: &mut Rotator, language: Language) {
    let saved = serde_json::to_string(&language)
        .map_err(StoreError::from)
        .and_then(|json| rotator.store_mut().set(LANGUAGE_STORAGE_KEY, &json));
    if let Err(e) = saved {
        log::warn!("could not save language preference: {}", e);
    }
}

// --------------------------------------------------
// One-shot round
// --------------------------------------------------

fn run_round(mut wheel: LetterWheel, rotator: &mut Rotator, timing: &SpinTiming) -> Result<()> {
    let text = labels(rotator.language());
    let question = rotator.next_question().context("no question available")?;
    println!("{} {}", style(text.question).bold(), question);
    println!("{}", style(text.spinning).dim());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start timer runtime")?;
    let settled = runtime.block_on(spin::spin_and_settle(&mut wheel, timing))?;

    let letter = settled.outcome.letter.display_upper();
    println!(
        "{} {}",
        style(text.letter).bold(),
        style(letter).green().bold()
    );
    println!("{} {}", text.instruction, style(letter).green());
    Ok(())
}

// --------------------------------------------------
// Question management
// --------------------------------------------------

fn manage_questions(rotator: &mut Rotator, action: QuestionAction) -> Result<()> {
    let language = rotator.language();

    match action {
        QuestionAction::List => {
            println!("{}", style(format!("{} ({})", language, rotator.count(None))).bold());
            for question in rotator.default_questions(None) {
                println!("     {}", style(question).dim());
            }
            for (i, question) in rotator.custom_questions(None).iter().enumerate() {
                println!("  {:>2} {}", style(i + 1).cyan(), question);
            }
        }
        QuestionAction::Add { text } => {
            rotator
                .add_custom_question(&text, None)
                .map_err(|r| rejected("add", r))?;
            println!("{} {}", style("added:").green(), text.trim());
        }
        QuestionAction::Edit { number, text } => {
            let index = to_index(number)?;
            rotator
                .edit_custom_question(index, &text, None)
                .map_err(|r| rejected("edit", r))?;
            println!("{} {}", style("updated:").green(), text.trim());
        }
        QuestionAction::Delete { number, yes } => {
            let index = to_index(number)?;
            let Some(question) = rotator.custom_questions(None).get(index).cloned() else {
                return Err(rejected("delete", Rejection::IndexOutOfRange(index)));
            };
            if !confirm(yes, &format!("Delete \"{question}\"?"))? {
                return Ok(());
            }
            rotator
                .delete_custom_question(index, None)
                .map_err(|r| rejected("delete", r))?;
            println!("{} {}", style("deleted:").green(), question);
        }
        QuestionAction::Reset { all, yes } => {
            let scope = if all { "all languages".to_string() } else { language.to_string() };
            if !confirm(yes, &format!("Remove every custom question for {scope}?"))? {
                return Ok(());
            }
            rotator.reset_custom(if all { None } else { Some(language) });
            println!("{} {}", style("cleared:").green(), scope);
        }
    }

    if let Some(e) = rotator.take_persist_error() {
        eprintln!("{} {}", style(labels(language).not_saved).yellow(), e);
    }
    Ok(())
}

fn to_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| anyhow!("question numbers start at 1"))
}

fn rejected(action: &str, rejection: Rejection) -> anyhow::Error {
    anyhow::Error::new(rejection).context(format!("could not {action} question"))
}

fn confirm(assume_yes: bool, prompt: &str) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

// --------------------------------------------------
// Terminal game
// --------------------------------------------------

/// A spin being animated on screen.
struct Animation {
    started: Instant,
    from_degrees: f64,
    outcome: SpinOutcome,
}

struct AppState {
    wheel: LetterWheel,
    rotator: Rotator,
    timing: SpinTiming,
    animation: Option<Animation>,
    /// The wheel has landed since the last reset.
    spun: bool,
    question: Option<String>,
    round: u32,
    message: Option<String>,
}

impl AppState {
    fn new(mut wheel: LetterWheel, rotator: Rotator, timing: SpinTiming) -> Self {
        wheel.reset();
        Self {
            wheel,
            rotator,
            timing,
            animation: None,
            spun: false,
            question: None,
            round: 0,
            message: None,
        }
    }

    fn labels(&self) -> &'static Labels {
        labels(self.rotator.language())
    }

    /// New question, wheel back to the start.
    fn next_round(&mut self) {
        if self.animation.is_some() {
            return;
        }
        self.question = Some(match self.rotator.next_question() {
            Ok(question) => question,
            Err(e) => {
                log::error!("{}", e);
                FALLBACK_QUESTIONS[self.round as usize % FALLBACK_QUESTIONS.len()].to_string()
            }
        });
        self.wheel.reset();
        self.spun = false;
        self.round += 1;
        self.message = None;
    }

    fn start_spin(&mut self) {
        if self.question.is_none() {
            self.message = Some(self.labels().start.to_string());
            return;
        }
        if self.wheel.is_spinning() {
            return;
        }
        let from_degrees = self.wheel.rotation_degrees();
        match self.wheel.spin() {
            Ok(outcome) => {
                self.animation = Some(Animation {
                    started: Instant::now(),
                    from_degrees,
                    outcome,
                });
            }
            Err(e) => {
                log::error!("{}", e);
                self.message = Some(e.to_string());
            }
        }
    }

    fn toggle_language(&mut self) {
        if self.animation.is_some() {
            return;
        }
        let language = self.rotator.language().toggle();
        if self.rotator.set_language(language).is_ok() {
            save_language(&mut self.rotator, language);
            self.question = None;
            self.round = 0;
            self.spun = false;
            self.wheel.reset();
        }
    }

    /// Finishes the animation once its time is up.
    fn tick(&mut self) {
        let limit = self.timing.duration().min(self.timing.safety_timeout());
        if self
            .animation
            .as_ref()
            .is_some_and(|a| a.started.elapsed() >= limit)
        {
            self.animation = None;
            self.spun = self.wheel.complete_spin().is_some();
        }
        if let Some(e) = self.rotator.take_persist_error() {
            self.message = Some(format!("{} ({})", self.labels().not_saved, e));
        }
    }

    /// Rotation to draw right now, eased out towards the target.
    fn display_degrees(&self) -> f64 {
        let Some(animation) = &self.animation else {
            return self.wheel.rotation_degrees();
        };
        let duration = self.timing.duration().as_secs_f64();
        let t = if duration > 0.0 {
            (animation.started.elapsed().as_secs_f64() / duration).min(1.0)
        } else {
            1.0
        };
        let eased = 1.0 - (1.0 - t).powi(3);
        animation.from_degrees + animation.outcome.rotation_delta * eased
    }
}

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(Hide)?;
    let backend = CrosstermBackend::new(stdout());
    Ok(Terminal::new(backend)?)
}

fn restore_terminal() -> Result<()> {
    stdout().execute(Show)?;
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<impl Backend>, mut app_state: AppState) -> Result<()> {
    loop {
        app_state.tick();
        terminal.draw(|f| ui(f, &app_state))?;

        if event::poll(Duration::from_millis(30))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => break,
                        KeyCode::Char(' ') => app_state.start_spin(),
                        KeyCode::Enter | KeyCode::Char('n') => app_state.next_round(),
                        KeyCode::Char('l') => app_state.toggle_language(),
                        _ => {}
                    }
                }
            }
        }
    }

    Ok(())
}

// --------------------------------------------------
// Drawing
// --------------------------------------------------

fn ui(f: &mut Frame, app_state: &AppState) {
    let text = app_state.labels();
    let size = f.area();
    let block = Block::default().borders(Borders::ALL).title(text.title);
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] language / round
            Constraint::Length(1), // [1] spacer
            Constraint::Length(2), // [2] question
            Constraint::Length(1), // [3] spacer
            Constraint::Length(1), // [4] wheel strip
            Constraint::Length(2), // [5] result
            Constraint::Min(1),    // [6] message
            Constraint::Length(1), // [7] key help
        ])
        .split(inner_area);

    let status = format!(
        "{} | {} {}",
        app_state.rotator.language(),
        text.round,
        app_state.round
    );
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        chunks[0],
    );

    let question = match &app_state.question {
        Some(q) => Line::from(vec![
            Span::styled(format!("{} ", text.question), Style::default().fg(Color::Yellow)),
            Span::styled(q.as_str(), Style::default().fg(Color::White).bold()),
        ]),
        None => Line::from(text.start).style(Style::default().fg(Color::Gray)),
    };
    f.render_widget(
        Paragraph::new(question).centered().wrap(Wrap { trim: true }),
        chunks[2],
    );

    f.render_widget(Paragraph::new(wheel_strip(app_state)).centered(), chunks[4]);

    let result = if app_state.animation.is_some() {
        Line::from(text.spinning).style(Style::default().fg(Color::Magenta))
    } else {
        match app_state.wheel.selected_letter() {
            Some(letter) if app_state.spun => {
                Line::from(vec![
                    Span::raw(format!("{} ", text.instruction)),
                    Span::styled(
                        letter.display_upper().to_string(),
                        Style::default().fg(Color::Green).bold(),
                    ),
                ])
            }
            _ => Line::default(),
        }
    };
    f.render_widget(Paragraph::new(result).centered(), chunks[5]);

    if let Some(message) = &app_state.message {
        f.render_widget(
            Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .centered(),
            chunks[6],
        );
    }

    f.render_widget(
        Paragraph::new(text.help)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[7],
    );
}

/// Letters around the window; the one in the window is highlighted.
fn wheel_strip(app_state: &AppState) -> Line<'static> {
    let wheel = &app_state.wheel;
    let letters = wheel.letters();
    let count = letters.len();
    let Some(center) = wheel
        .letter_at_rotation(app_state.display_degrees())
        .and_then(|l| letters.position(l))
    else {
        return Line::default();
    };

    let mut spans = Vec::new();
    for offset in -3i64..=3 {
        let index = (center as i64 + offset).rem_euclid(count as i64) as usize;
        let Some(letter) = letters.get(index) else {
            continue;
        };
        let shown = format!(" {} ", letter.display_upper());
        let span = if offset == 0 {
            Span::styled(
                format!("[{shown}]"),
                Style::default().fg(Color::Black).bg(Color::White).bold(),
            )
        } else {
            Span::styled(shown, Style::default().fg(Color::DarkGray))
        };
        spans.push(span);
    }
    Line::from(spans)
}
