use crate::config::EngineConfig;
use crate::engine::FaqEngine;
use crate::error::FaqError;
use crate::knowledge_loader::{KnowledgeLoader, LoadReport, LoadedKnowledge};
use crate::linguistics::Linguistics;
use crate::response::{ConfidenceBand, Response};
use chrono::Local;
use eframe::egui;
use log::error;
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq)]
enum AppState {
    Idle,
    LoadingKnowledge,
}

// Messages sent from background threads to GUI
enum BackgroundMessage {
    KnowledgeProgress {
        processed_rows: usize,
        bytes_read: u64,
        total_bytes: u64,
    },
    KnowledgeLoaded {
        engine: FaqEngine,
        report: Option<LoadReport>,
        source: String,
    },
    KnowledgeError {
        error: String,
    },
}

struct ChatTurn {
    question: String,
    response: Response,
    asked_at: String,
}

pub struct FaqChatApp {
    linguistics: Arc<dyn Linguistics>,
    config: EngineConfig,

    // Knowledge base
    knowledge_path: String,
    knowledge_source: String,
    engine: Option<Arc<FaqEngine>>,
    last_report: Option<LoadReport>,

    // Settings
    similarity_threshold: f64,

    // State
    state: AppState,
    progress: f64,
    progress_text: String,

    // Chat (kept in memory only)
    question_input: String,
    chat_history: Vec<ChatTurn>,

    // Status messages
    status_message: String,
    error_message: String,

    // Channel for background thread communication
    bg_receiver: Receiver<BackgroundMessage>,
    bg_sender: Sender<BackgroundMessage>,
}

impl FaqChatApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        linguistics: Arc<dyn Linguistics>,
        config: EngineConfig,
        knowledge_path: Option<PathBuf>,
    ) -> Self {
        let (bg_sender, bg_receiver) = mpsc::channel();

        let mut app = Self {
            linguistics,
            similarity_threshold: config.similarity_threshold,
            config,
            knowledge_path: knowledge_path
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            knowledge_source: String::new(),
            engine: None,
            last_report: None,
            state: AppState::Idle,
            progress: 0.0,
            progress_text: String::new(),
            question_input: String::new(),
            chat_history: Vec::new(),
            status_message: String::new(),
            error_message: String::new(),
            bg_receiver,
            bg_sender,
        };
        app.load_knowledge();
        app
    }

    fn select_knowledge_file(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Knowledge base", &["csv", "json"])
            .pick_file()
        {
            self.knowledge_path = path.to_string_lossy().to_string();
            self.status_message = format!("Selected knowledge base: {}", self.knowledge_path);
            self.error_message.clear();
        }
    }

    /// Build a fresh engine on a background thread. An empty path means the built-in FAQ.
    fn load_knowledge(&mut self) {
        self.state = AppState::LoadingKnowledge;
        self.progress = 0.0;
        self.progress_text = "Loading knowledge base...".to_string();
        self.error_message.clear();
        self.status_message.clear();

        let path = (!self.knowledge_path.is_empty()).then(|| PathBuf::from(&self.knowledge_path));
        let linguistics = Arc::clone(&self.linguistics);
        let config = self.config.clone();
        let sender = self.bg_sender.clone();

        thread::spawn(move || {
            let result = build_engine(path.as_deref(), config, linguistics, &sender);
            let message = match result {
                Ok((engine, report)) => BackgroundMessage::KnowledgeLoaded {
                    engine,
                    report,
                    source: path
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "built-in FAQ".to_string()),
                },
                Err(e) => BackgroundMessage::KnowledgeError {
                    error: e.to_string(),
                },
            };
            let _ = sender.send(message);
        });
    }

    fn send_question(&mut self) {
        let question = self.question_input.trim().to_string();
        if question.is_empty() {
            return;
        }

        let Some(engine) = self.engine.as_ref() else {
            self.error_message = "Knowledge base is not loaded yet".to_string();
            return;
        };

        let response = engine.ask_with_threshold(&question, self.similarity_threshold);
        self.chat_history.push(ChatTurn {
            question,
            response,
            asked_at: Local::now().format("%H:%M:%S").to_string(),
        });
        self.question_input.clear();
    }

    fn process_background_messages(&mut self, ctx: &egui::Context) {
        // Process all pending messages from background threads
        while let Ok(msg) = self.bg_receiver.try_recv() {
            match msg {
                BackgroundMessage::KnowledgeProgress {
                    processed_rows,
                    bytes_read,
                    total_bytes,
                } => {
                    let percent = if total_bytes > 0 {
                        (bytes_read as f64 / total_bytes as f64).min(1.0)
                    } else {
                        0.0
                    };
                    self.progress = percent;
                    self.progress_text = format!(
                        "Loading knowledge base... {} rows processed ({:.0}%)",
                        processed_rows,
                        percent * 100.0
                    );
                }
                BackgroundMessage::KnowledgeLoaded {
                    engine,
                    report,
                    source,
                } => {
                    self.state = AppState::Idle;
                    self.progress = 1.0;
                    self.status_message = format!(
                        "Ready: {} questions from {} ({} terms)",
                        engine.knowledge_base().len(),
                        source,
                        engine.vocabulary().term_count()
                    );
                    self.knowledge_source = source;
                    self.engine = Some(Arc::new(engine));

                    match report.as_ref().filter(|r| !r.errors.is_empty()) {
                        Some(report) => {
                            let preview: String = report
                                .errors
                                .iter()
                                .take(5)
                                .cloned()
                                .collect::<Vec<_>>()
                                .join("\n");
                            self.error_message = format!(
                                "{} rows failed to load. Sample errors:\n{}{}",
                                report.errors.len(),
                                preview,
                                if report.errors.len() > 5 { "\n..." } else { "" }
                            );
                        }
                        None => self.error_message.clear(),
                    }
                    self.last_report = report;
                }
                BackgroundMessage::KnowledgeError { error: e } => {
                    error!("Failed to load knowledge base: {}", e);
                    self.state = AppState::Idle;
                    self.progress = 0.0;
                    self.error_message = format!("Failed to load knowledge base: {}", e);
                    self.status_message.clear();
                }
            }
            // Request repaint when we receive a message
            ctx.request_repaint();
        }
    }

    fn show_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("about_panel")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("About");
                ui.label(
                    "Answers customer questions by finding the closest FAQ entry. \
                     Answers below the similarity threshold fall back to a canned reply.",
                );
                ui.add_space(10.0);

                if !self.knowledge_source.is_empty() {
                    ui.label(format!("Knowledge base: {}", self.knowledge_source));
                }
                if let Some(engine) = &self.engine {
                    ui.label(format!("{} questions", engine.knowledge_base().len()));
                }
                if let Some(report) = &self.last_report {
                    ui.label(format!(
                        "Last import: processed {}, loaded {}, skipped {}",
                        report.processed, report.loaded, report.skipped
                    ));
                }

                ui.add_space(10.0);
                if ui
                    .add_enabled(
                        !self.chat_history.is_empty(),
                        egui::Button::new("🗑 Clear Chat History"),
                    )
                    .clicked()
                {
                    self.chat_history.clear();
                }
            });
    }

    fn show_history(&self, ui: &mut egui::Ui) {
        if self.chat_history.is_empty() {
            ui.label("Ask a question below to get started.");
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .max_height(ui.available_height() - 80.0)
            .show(ui, |ui| {
                for turn in &self.chat_history {
                    ui.label(
                        egui::RichText::new(format!("[{}] You: {}", turn.asked_at, turn.question))
                            .strong(),
                    );
                    ui.label(format!("Bot: {}", turn.response.answer));
                    ui.colored_label(
                        confidence_color(turn.response.confidence_band()),
                        format!("Confidence: {}%", turn.response.confidence_percent),
                    );
                    if let Some(matched) = &turn.response.matched_question {
                        ui.label(format!("Matched FAQ: \"{}\"", matched));
                    }
                    ui.separator();
                }
            });
    }
}

impl eframe::App for FaqChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process messages from background threads
        self.process_background_messages(ctx);

        // Only request repaint if we're in an active state
        if self.state != AppState::Idle {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        self.show_sidebar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("💬 FAQ Assistant");
            ui.label("Customer Support Assistant");
            ui.add_space(10.0);

            // Knowledge base selection
            ui.horizontal(|ui| {
                if ui.button("📄 Select Knowledge Base").clicked() {
                    self.select_knowledge_file();
                }
                if self.knowledge_path.is_empty() {
                    ui.label("(built-in FAQ)");
                } else {
                    ui.label(&self.knowledge_path);
                }
                if ui
                    .add_enabled(
                        self.state == AppState::Idle,
                        egui::Button::new("📥 Load Knowledge Base"),
                    )
                    .clicked()
                {
                    self.load_knowledge();
                }
            });

            // Similarity threshold slider
            ui.horizontal(|ui| {
                ui.label("Similarity Threshold:");
                ui.add(egui::Slider::new(&mut self.similarity_threshold, 0.0..=1.0).text(""));
                ui.label(format!("{:.0}%", self.similarity_threshold * 100.0));
            });

            // Progress bar
            if self.state != AppState::Idle {
                ui.label(&self.progress_text);
                ui.add(egui::ProgressBar::new(self.progress as f32).show_percentage());
            }

            // Status messages
            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::GREEN, &self.status_message);
            }
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.error_message);
            }

            ui.separator();
            self.show_history(ui);
            ui.separator();

            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.question_input)
                        .hint_text("Type your question here")
                        .desired_width(ui.available_width() - 80.0),
                );
                let submitted =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let can_send = self.engine.is_some() && !self.question_input.trim().is_empty();
                let clicked = ui
                    .add_enabled(can_send, egui::Button::new("Send"))
                    .clicked();
                if (submitted && can_send) || clicked {
                    self.send_question();
                    input.request_focus();
                }
            });
        });
    }
}

fn build_engine(
    path: Option<&Path>,
    config: EngineConfig,
    linguistics: Arc<dyn Linguistics>,
    sender: &Sender<BackgroundMessage>,
) -> Result<(FaqEngine, Option<LoadReport>), FaqError> {
    let is_csv = path
        .and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let loaded: Option<LoadedKnowledge> = match path {
        Some(path) if is_csv => {
            let progress_sender = sender.clone();
            let progress_callback =
                move |processed_rows: usize, bytes_read: u64, total_bytes: u64| {
                    let _ = progress_sender.send(BackgroundMessage::KnowledgeProgress {
                        processed_rows,
                        bytes_read,
                        total_bytes,
                    });
                };
            Some(KnowledgeLoader::new().load_from_csv_with_progress(path, Some(progress_callback))?)
        }
        Some(path) => Some(KnowledgeLoader::new().load_from_path(path)?),
        None => None,
    };

    match loaded {
        Some(loaded) => {
            let engine = FaqEngine::new(loaded.entries, config, linguistics)?;
            Ok((engine, Some(loaded.report)))
        }
        None => Ok((FaqEngine::from_source(None, config, linguistics)?, None)),
    }
}

fn confidence_color(band: ConfidenceBand) -> egui::Color32 {
    match band {
        ConfidenceBand::High => egui::Color32::from_rgb(76, 175, 80),
        ConfidenceBand::Medium => egui::Color32::from_rgb(255, 152, 0),
        ConfidenceBand::Low => egui::Color32::from_rgb(244, 67, 54),
    }
}
