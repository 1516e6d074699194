use crate::error::{FaqError, Result};
use crate::knowledge::KnowledgeEntry;
use csv::ReaderBuilder;
use log::{info, warn};
use std::fs;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub processed: usize,
    pub loaded: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LoadedKnowledge {
    pub entries: Vec<KnowledgeEntry>,
    pub report: LoadReport,
}

pub struct KnowledgeLoader;

impl KnowledgeLoader {
    pub fn new() -> Self {
        KnowledgeLoader
    }

    /// Load a knowledge base, picking the format from the file extension (`.csv` or `.json`).
    pub fn load_from_path(&self, path: &Path) -> Result<LoadedKnowledge> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let loaded = match extension.as_deref() {
            Some("csv") => self.load_from_csv(path)?,
            Some("json") => self.load_from_json(path)?,
            _ => {
                return Err(FaqError::InvalidKnowledgeBase(format!(
                    "unsupported knowledge base format: {} (expected .csv or .json)",
                    path.display()
                )))
            }
        };

        info!(
            "Loaded {} knowledge entries from {} (processed {}, skipped {})",
            loaded.report.loaded,
            path.display(),
            loaded.report.processed,
            loaded.report.skipped
        );
        Ok(loaded)
    }

    /// Load entries from a CSV file with `question` and `answer` columns and an optional
    /// `category` column. Bad rows are skipped and reported by line number.
    pub fn load_from_csv_with_progress<F>(
        &self,
        csv_path: &Path,
        mut progress_callback: Option<F>,
    ) -> Result<LoadedKnowledge>
    where
        F: FnMut(usize, u64, u64),
    {
        let total_bytes = fs::metadata(csv_path)?.len().max(1);
        let file = File::open(csv_path)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let question_index = column("question").ok_or_else(|| {
            FaqError::InvalidKnowledgeBase("CSV file must contain a 'question' column".to_string())
        })?;
        let answer_index = column("answer").ok_or_else(|| {
            FaqError::InvalidKnowledgeBase("CSV file must contain an 'answer' column".to_string())
        })?;
        let category_index = column("category");

        let mut entries = Vec::new();
        let mut report = LoadReport::default();

        let mut record = csv::StringRecord::new();
        let mut line_index = 0usize;

        loop {
            match reader.read_record(&mut record) {
                Ok(true) => {
                    report.processed += 1;
                    let display_line = line_index + 2;

                    let question = record.get(question_index).map(str::trim).unwrap_or("");
                    let answer = record.get(answer_index).map(str::trim).unwrap_or("");

                    if question.is_empty() || answer.is_empty() {
                        report.skipped += 1;
                        report
                            .errors
                            .push(format!("Line {}: Empty question or answer", display_line));
                    } else {
                        let category = category_index
                            .and_then(|index| record.get(index))
                            .map(str::trim)
                            .filter(|value| !value.is_empty())
                            .map(str::to_string);
                        entries.push(KnowledgeEntry {
                            question: question.to_string(),
                            answer: answer.to_string(),
                            category,
                        });
                        report.loaded += 1;
                    }

                    line_index += 1;
                }
                Ok(false) => break,
                Err(e) => {
                    report.processed += 1;
                    report.skipped += 1;
                    report
                        .errors
                        .push(format!("Line {}: {}", line_index + 2, e));
                    line_index += 1;
                }
            }

            if let Some(cb) = progress_callback.as_mut() {
                cb(report.processed, reader.position().byte(), total_bytes);
            }
        }

        if report.processed == 0 {
            return Err(FaqError::InvalidKnowledgeBase(
                "CSV file did not contain any records".to_string(),
            ));
        }

        for error in &report.errors {
            warn!("Skipped knowledge row in {}: {}", csv_path.display(), error);
        }

        Ok(LoadedKnowledge { entries, report })
    }

    pub fn load_from_csv(&self, csv_path: &Path) -> Result<LoadedKnowledge> {
        self.load_from_csv_with_progress(csv_path, Option::<fn(usize, u64, u64)>::None)
    }

    /// Load entries from a JSON array of `{question, answer, category?}` objects.
    pub fn load_from_json(&self, json_path: &Path) -> Result<LoadedKnowledge> {
        let contents = fs::read_to_string(json_path)?;
        let raw: Vec<KnowledgeEntry> = serde_json::from_str(&contents)?;

        let mut report = LoadReport {
            processed: raw.len(),
            ..LoadReport::default()
        };
        let mut entries = Vec::with_capacity(raw.len());

        for (position, mut entry) in raw.into_iter().enumerate() {
            entry.question = entry.question.trim().to_string();
            entry.answer = entry.answer.trim().to_string();
            entry.category = entry
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty());

            if entry.question.is_empty() || entry.answer.is_empty() {
                report.skipped += 1;
                report.errors.push(format!(
                    "Entry {}: Empty question or answer",
                    position + 1
                ));
                continue;
            }

            entries.push(entry);
            report.loaded += 1;
        }

        for error in &report.errors {
            warn!("Skipped knowledge entry in {}: {}", json_path.display(), error);
        }

        Ok(LoadedKnowledge { entries, report })
    }
}

impl Default for KnowledgeLoader {
    fn default() -> Self {
        Self::new()
    }
}
