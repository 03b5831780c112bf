use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;

use ai_lawyer::app::App;
use ai_lawyer::config::Config;
use ai_lawyer::gemini::{GeminiClient, GenerateRequest, Generation};
use ai_lawyer::handler::handle_event;
use ai_lawyer::i18n::Language;
use ai_lawyer::prompt::{self, DocumentType};
use ai_lawyer::state::ChatMessage;
use ai_lawyer::tui::{self, EventHandler, Tui};
use ai_lawyer::{logging, ui};

#[derive(Parser)]
#[command(name = "ai-lawyer")]
#[command(version, about = "Multilingual legal assistant: consultation, drafting and risk analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Display language code (zh-TW, en, zh-CN, ja, ko, vi, id, th, hi)
    #[arg(short, long, global = true)]
    lang: Option<String>,

    /// Gemini model identifier
    #[arg(short, long, global = true, env = "AI_LAWYER_MODEL")]
    model: Option<String>,

    /// Answer without Google Search grounding
    #[arg(long, global = true)]
    no_search: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single legal question
    Ask {
        /// Your question
        question: String,
    },
    /// Draft a legal document
    Draft {
        /// Document type: letter, contract, settlement, rental, labor, iou
        #[arg(short = 't', long = "type", default_value = "letter")]
        kind: String,
        /// Parties, amounts, dates and anything else the document needs
        details: String,
    },
    /// Analyze a contract or case description for risks
    Analyze {
        /// Text to analyze
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,
        /// Read the text from a file instead
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List supported display languages
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to a file; keep the guard until exit so buffered lines are flushed
    let _guard = match logging::init_tracing() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{}: {}", "Logging disabled".yellow(), e);
            None
        }
    };

    let mut config = Config::load().context("Failed to load config")?;
    if let Some(code) = &cli.lang {
        config.language = parse_language(code)?;
    }

    match cli.command {
        None => run_tui(config, cli.model, cli.no_search).await,
        Some(Commands::Ask { question }) => {
            let session = Session::new(&config, cli.model, cli.no_search)?;
            ask(&session, &question).await
        }
        Some(Commands::Draft { kind, details }) => {
            let session = Session::new(&config, cli.model, cli.no_search)?;
            draft(&session, &kind, &details).await
        }
        Some(Commands::Analyze { text, file }) => {
            let session = Session::new(&config, cli.model, cli.no_search)?;
            let content = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("Nothing to analyze"),
            };
            analyze(&session, &content).await
        }
        Some(Commands::Languages) => {
            list_languages(config.language);
            Ok(())
        }
    }
}

fn parse_language(code: &str) -> Result<Language> {
    Language::from_code(code).with_context(|| {
        let codes: Vec<&str> = Language::all().iter().map(|l| l.code()).collect();
        format!("Unknown language '{}'. Supported: {}", code, codes.join(", "))
    })
}

async fn run_tui(config: Config, model: Option<String>, no_search: bool) -> Result<()> {
    let config_path = Config::get_config_path()?;
    let mut app = App::new(config).with_config_path(config_path);

    // Session-only overrides, never written back
    if let Some(model) = model {
        app.model = model;
    }
    if no_search {
        app.google_search = false;
    }
    if app.key_source().is_none() {
        app.open_api_key_input();
    }

    info!(target: "ai_lawyer", language = app.language.code(), model = %app.model, "starting TUI");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_app(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        // Tick events wake the loop even when the user is idle, so finished
        // requests are picked up promptly
        let Some(event) = events.next().await else {
            return Ok(());
        };
        handle_event(app, event);
        app.poll_requests().await;

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Resolved settings for a one-shot command
struct Session {
    client: GeminiClient,
    model: String,
    language: Language,
    google_search: bool,
}

impl Session {
    fn new(config: &Config, model: Option<String>, no_search: bool) -> Result<Self> {
        let Some(api_key) = config.resolved_api_key() else {
            bail!(
                "No API key found. Set {} or run `ai-lawyer` and press K to save one.",
                "GEMINI_API_KEY".bold()
            );
        };

        let mut client = GeminiClient::new(&api_key);
        if let Some(url) = &config.base_url {
            client = client.with_base_url(url);
        }

        Ok(Self {
            client,
            model: model.unwrap_or_else(|| config.model.clone()),
            language: config.language,
            google_search: config.google_search && !no_search,
        })
    }

    async fn run(&self, request: GenerateRequest) -> Result<Generation> {
        println!("⚖️  Asking {}...\n", self.model.bold().magenta());
        let generation = self.client.generate(&request).await?;
        Ok(generation)
    }
}

async fn ask(session: &Session, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("Question is empty");
    }
    let strings = session.language.strings();

    // Seed the greeting so the model sees the same opening as the TUI
    let history = vec![ChatMessage::model(strings.chat.greeting), ChatMessage::user(question.trim())];
    let request = GenerateRequest::chat(
        &session.model,
        &history,
        prompt::system_instruction(session.language),
        session.google_search,
    );

    let generation = session.run(request).await?;
    print_generation(&generation, strings.chat.no_answer, strings.chat.source, strings.chat.source_placeholder);
    Ok(())
}

async fn draft(session: &Session, kind: &str, details: &str) -> Result<()> {
    if details.trim().is_empty() {
        bail!("Details are empty");
    }
    let Some(doc_type) = DocumentType::from_key(kind) else {
        let keys: Vec<&str> = DocumentType::all().iter().map(|t| t.key()).collect();
        bail!("Unknown document type '{}'. Supported: {}", kind, keys.join(", "));
    };
    let strings = session.language.strings();

    println!("{} {}", strings.draft.title.bold().blue(), doc_type.label(strings).yellow());
    let request = GenerateRequest::single(
        &session.model,
        prompt::draft_prompt(doc_type.label(strings), details, session.language),
        prompt::system_instruction(session.language),
        session.google_search,
    );

    let generation = session.run(request).await?;
    print_generation(&generation, strings.chat.error, strings.draft.legal_basis, strings.chat.source_placeholder);
    Ok(())
}

async fn analyze(session: &Session, content: &str) -> Result<()> {
    if content.trim().is_empty() {
        bail!("Nothing to analyze");
    }
    let strings = session.language.strings();

    println!("{}", strings.analyze.report_title.bold().blue());
    let request = GenerateRequest::single(
        &session.model,
        prompt::analyze_prompt(content, session.language),
        prompt::system_instruction(session.language),
        false,
    );

    let generation = session.run(request).await?;
    print_generation(&generation, strings.chat.error, strings.chat.source, strings.chat.source_placeholder);
    println!("\n{}", strings.analyze.disclaimer.dimmed());
    Ok(())
}

fn print_generation(generation: &Generation, empty_text: &str, sources_heading: &str, placeholder: &str) {
    println!("{}", generation.text.as_deref().unwrap_or(empty_text));

    if !generation.sources.is_empty() {
        println!("\n{}", format!("{}:", sources_heading).bold().green());
        for (i, source) in generation.sources.iter().enumerate() {
            println!(
                "{}. {}\n   {}",
                (i + 1).to_string().bold(),
                source.display_title(placeholder).yellow(),
                source.uri.dimmed()
            );
        }
    }
}

fn list_languages(current: Language) {
    println!("\n{}", "🌐 Supported Languages".bold().blue());
    println!("{}", "=".repeat(30).dimmed());

    for lang in Language::all() {
        let marker = if lang == current { "*".green().bold() } else { " ".normal() };
        println!("{} {:<6} {} {}", marker, lang.code().cyan(), lang.flag(), lang.native_name());
    }
}
