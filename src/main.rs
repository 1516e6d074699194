use clap::{Parser, Subcommand};
use faq_assistant::config::{stopwords_path_from_env, EngineConfig};
use faq_assistant::evaluation::{self, SWEEP_THRESHOLDS};
use faq_assistant::repl::{self, REPL_FALLBACK_MESSAGE};
use faq_assistant::{EnglishLinguistics, FaqEngine, FaqError, Linguistics};
use log::error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Answer customer questions from a FAQ knowledge base
#[derive(Parser)]
#[command(name = "faq-assistant")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Knowledge base file (.csv or .json); the built-in FAQ is used when omitted
    #[arg(long, global = true, env = "FAQ_KNOWLEDGE_PATH")]
    knowledge: Option<PathBuf>,

    /// Minimum similarity for an answer to be accepted, in [0, 1]
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Tokens shorter than this are ignored
    #[arg(long, global = true)]
    min_token_len: Option<usize>,

    /// Extra stop-words, one per line
    #[arg(long, global = true)]
    stopwords: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive question/answer session (default)
    Chat,

    /// Answer a single question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a text is normalized before matching
    Preprocess {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Score the engine against labelled questions and sweep thresholds
    Evaluate {
        /// Question used for the threshold sweep
        #[arg(long, default_value = "How can I send back my order?")]
        sweep_question: String,
    },

    /// Open the desktop chat window
    #[cfg(feature = "gui")]
    Gui,
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), FaqError> {
    let mut config = EngineConfig::from_env();
    if let Some(threshold) = cli.threshold {
        config = config.with_threshold(threshold);
    }
    if let Some(min_token_len) = cli.min_token_len {
        config = config.with_min_token_len(min_token_len);
    }

    let stopwords = cli.stopwords.or_else(stopwords_path_from_env);
    let linguistics: Arc<dyn Linguistics> =
        Arc::new(EnglishLinguistics::load(stopwords.as_deref())?);
    let knowledge = cli.knowledge.as_deref();

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let config = config.with_fallback_message(REPL_FALLBACK_MESSAGE);
            let engine = FaqEngine::from_source(knowledge, config, linguistics)?;
            let stdin = io::stdin();
            repl::run(&engine, stdin.lock(), &mut io::stdout())?;
        }
        Command::Ask { question, json } => {
            let engine = FaqEngine::from_source(knowledge, config, linguistics)?;
            let response = engine.ask(&question.join(" "));
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                repl::display_response(&mut io::stdout(), &response)?;
            }
        }
        Command::Preprocess { text } => {
            let engine = FaqEngine::from_source(knowledge, config, linguistics)?;
            let text = text.join(" ");
            println!("Original:    {}", text);
            println!("Processed:   {}", engine.normalize(&text).join(" "));
        }
        Command::Evaluate { sweep_question } => {
            let engine = FaqEngine::from_source(knowledge, config, linguistics)?;
            let report = evaluation::evaluate(&engine, &evaluation::default_cases());
            println!("{}", evaluation::render_report(&report));
            let points =
                evaluation::threshold_sweep(&engine, &sweep_question, &SWEEP_THRESHOLDS);
            println!("{}", evaluation::render_sweep(&sweep_question, &points));
        }
        #[cfg(feature = "gui")]
        Command::Gui => {
            let options = eframe::NativeOptions {
                viewport: eframe::egui::ViewportBuilder::default()
                    .with_inner_size([900.0, 700.0])
                    .with_min_inner_size([600.0, 480.0]),
                ..Default::default()
            };
            let knowledge = cli.knowledge.clone();
            eframe::run_native(
                "FAQ Assistant",
                options,
                Box::new(move |cc| {
                    Ok(Box::new(faq_assistant::gui::FaqChatApp::new(
                        cc,
                        linguistics,
                        config,
                        knowledge,
                    )))
                }),
            )
            .map_err(|e| FaqError::Interface(e.to_string()))?;
        }
    }

    Ok(())
}
