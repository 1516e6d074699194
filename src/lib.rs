//! FAQ question answering over a fixed knowledge base using a TF-IDF vector space.
//!
//! ```text
//! question ──► Normalizer ──► VocabularyModel::vectorize ──► Matcher ──► ResponseAssembler
//!                                   ▲                          ▲
//!                 knowledge base ───┴──── CorpusIndex ─────────┘   (built once)
//! ```

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod evaluation;
#[cfg(feature = "gui")]
pub mod gui;
pub mod knowledge;
pub mod knowledge_loader;
pub mod linguistics;
pub mod matcher;
pub mod normalizer;
pub mod repl;
pub mod response;
pub mod vectorizer;

pub use config::EngineConfig;
pub use engine::FaqEngine;
pub use error::{FaqError, Result};
pub use knowledge::KnowledgeEntry;
pub use linguistics::{EnglishLinguistics, Linguistics};
pub use response::Response;
