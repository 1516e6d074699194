use crate::matcher::MatchResult;
use serde::Serialize;
use std::fmt;

/// What callers of the engine see for one question.
///
/// `answer` always holds displayable text: the matched answer, or the fallback message
/// when nothing reached the threshold. `matched_question` and `matched_category` are only
/// present for accepted matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub answer: String,
    pub is_fallback: bool,
    /// Similarity as a percentage rounded to two decimals.
    pub confidence_percent: f64,
    pub matched_question: Option<String>,
    pub matched_category: Option<String>,
}

impl Response {
    /// The matched answer, or `None` for a fallback.
    pub fn matched_answer(&self) -> Option<&str> {
        if self.is_fallback {
            None
        } else {
            Some(&self.answer)
        }
    }

    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_percent(self.confidence_percent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 70.0 {
            ConfidenceBand::High
        } else if percent >= 40.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "✓✓✓",
            ConfidenceBand::Medium => "✓✓",
            ConfidenceBand::Low => "✓",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceBand::High => "HIGH",
            ConfidenceBand::Medium => "MEDIUM",
            ConfidenceBand::Low => "LOW",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct ResponseAssembler {
    fallback_message: String,
}

impl ResponseAssembler {
    pub fn new(fallback_message: impl Into<String>) -> Self {
        Self {
            fallback_message: fallback_message.into(),
        }
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    pub fn assemble(&self, result: MatchResult) -> Response {
        let confidence_percent = to_percent(result.confidence);
        match result.answer {
            Some(answer) => Response {
                answer,
                is_fallback: false,
                confidence_percent,
                matched_question: result.matched_question,
                matched_category: result.matched_category,
            },
            None => Response {
                answer: self.fallback_message.clone(),
                is_fallback: true,
                confidence_percent,
                matched_question: None,
                matched_category: None,
            },
        }
    }
}

fn to_percent(similarity: f64) -> f64 {
    (similarity * 100.0 * 100.0).round() / 100.0
}
