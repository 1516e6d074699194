//! Labelled accuracy check and threshold sweep for an engine.

use crate::engine::FaqEngine;
use crate::response::Response;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CaseKind {
    ExactMatch,
    Paraphrase,
    DifferentPhrasing,
    SingleWord,
    OutOfScope,
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CaseKind::ExactMatch => "exact_match",
            CaseKind::Paraphrase => "paraphrase",
            CaseKind::DifferentPhrasing => "different_phrasing",
            CaseKind::SingleWord => "single_word",
            CaseKind::OutOfScope => "out_of_scope",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationCase {
    pub question: String,
    /// `None` means the engine is expected to fall back.
    pub expected_category: Option<String>,
    pub kind: CaseKind,
}

impl EvaluationCase {
    pub fn new(question: &str, expected_category: Option<&str>, kind: CaseKind) -> Self {
        Self {
            question: question.to_string(),
            expected_category: expected_category.map(str::to_string),
            kind,
        }
    }

    pub fn is_satisfied_by(&self, response: &Response) -> bool {
        match &self.expected_category {
            Some(expected) => response.matched_category.as_deref() == Some(expected.as_str()),
            None => response.is_fallback,
        }
    }
}

pub fn default_cases() -> Vec<EvaluationCase> {
    use CaseKind::*;
    vec![
        EvaluationCase::new("What is your return policy?", Some("returns"), ExactMatch),
        EvaluationCase::new("How long does shipping take?", Some("shipping"), ExactMatch),
        EvaluationCase::new("How do I return a product?", Some("returns"), Paraphrase),
        EvaluationCase::new("What are the return rules?", Some("returns"), Paraphrase),
        EvaluationCase::new("How much time for delivery?", Some("shipping"), Paraphrase),
        EvaluationCase::new("When will my order arrive?", Some("shipping"), Paraphrase),
        EvaluationCase::new("Can I send items back?", Some("returns"), DifferentPhrasing),
        EvaluationCase::new("Do you allow returns?", Some("returns"), DifferentPhrasing),
        EvaluationCase::new("Where is my package?", Some("tracking"), DifferentPhrasing),
        EvaluationCase::new("How to track shipment?", Some("tracking"), DifferentPhrasing),
        EvaluationCase::new("payment", Some("payment"), SingleWord),
        EvaluationCase::new("warranty", Some("warranty"), SingleWord),
        EvaluationCase::new("discount", Some("discounts"), SingleWord),
        EvaluationCase::new("What's the weather like?", None, OutOfScope),
        EvaluationCase::new("Tell me a joke", None, OutOfScope),
        EvaluationCase::new("What is machine learning?", None, OutOfScope),
    ]
}

#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub case: EvaluationCase,
    pub response: Response,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
    pub correct: usize,
    pub total: usize,
}

impl KindStats {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Verdict {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 80.0 {
            Verdict::Excellent
        } else if accuracy >= 60.0 {
            Verdict::Good
        } else if accuracy >= 40.0 {
            Verdict::Fair
        } else {
            Verdict::Poor
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Excellent => "EXCELLENT: the engine performs very well",
            Verdict::Good => "GOOD: the engine performs reasonably well",
            Verdict::Fair => "FAIR: consider adjusting the threshold or the preprocessing",
            Verdict::Poor => "POOR: significant improvements needed",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub threshold: f64,
    pub outcomes: Vec<CaseOutcome>,
    pub by_kind: BTreeMap<CaseKind, KindStats>,
}

impl EvaluationReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn correct(&self) -> usize {
        self.outcomes.iter().filter(|o| o.correct).count()
    }

    pub fn accuracy(&self) -> f64 {
        KindStats {
            correct: self.correct(),
            total: self.total(),
        }
        .accuracy()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_accuracy(self.accuracy())
    }

    pub fn recommendations(&self) -> Vec<&'static str> {
        let stats = |kind| self.by_kind.get(&kind).copied().unwrap_or_default();
        let mut recommendations = Vec::new();

        let out_of_scope = stats(CaseKind::OutOfScope);
        if out_of_scope.correct < out_of_scope.total {
            recommendations.push("Threshold may be too low - consider increasing to 0.4 or 0.5");
        }

        let paraphrase = stats(CaseKind::Paraphrase);
        if paraphrase.total > 0 && (paraphrase.correct as f64) < paraphrase.total as f64 * 0.7 {
            recommendations
                .push("Paraphrases are often missed - consider richer matching than shared terms");
        }

        let exact = stats(CaseKind::ExactMatch);
        if exact.correct < exact.total {
            recommendations.push("Check the preprocessing pipeline - exact matches should work");
        }

        recommendations
    }
}

pub fn evaluate(engine: &FaqEngine, cases: &[EvaluationCase]) -> EvaluationReport {
    let mut by_kind: BTreeMap<CaseKind, KindStats> = BTreeMap::new();
    let outcomes = cases
        .iter()
        .map(|case| {
            let response = engine.ask(&case.question);
            let correct = case.is_satisfied_by(&response);
            let stats = by_kind.entry(case.kind).or_default();
            stats.total += 1;
            if correct {
                stats.correct += 1;
            }
            CaseOutcome {
                case: case.clone(),
                response,
                correct,
            }
        })
        .collect();

    EvaluationReport {
        threshold: engine.similarity_threshold(),
        outcomes,
        by_kind,
    }
}

pub const SWEEP_THRESHOLDS: [f64; 6] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];

#[derive(Debug, Clone)]
pub struct SweepPoint {
    pub threshold: f64,
    pub response: Response,
}

/// Answer one question at each threshold. The vector model does not depend on the
/// threshold, so a single engine serves every point.
pub fn threshold_sweep(engine: &FaqEngine, question: &str, thresholds: &[f64]) -> Vec<SweepPoint> {
    thresholds
        .iter()
        .map(|&threshold| SweepPoint {
            threshold,
            response: engine.ask_with_threshold(question, threshold),
        })
        .collect()
}

pub fn render_report(report: &EvaluationReport) -> String {
    let rule = "=".repeat(80);
    let mut out = String::new();

    out.push_str(&format!(
        "{rule}\nRUNNING TEST CASES (threshold {:.2})\n{}\n\n",
        report.threshold,
        "-".repeat(80)
    ));
    for (i, outcome) in report.outcomes.iter().enumerate() {
        let status = if outcome.correct { "✓ PASS" } else { "✗ FAIL" };
        out.push_str(&format!(
            "Test {}/{} [{}] {}\n",
            i + 1,
            report.total(),
            outcome.case.kind,
            status
        ));
        out.push_str(&format!("  Question: {}\n", outcome.case.question));
        out.push_str(&format!(
            "  Expected: {}\n",
            outcome.case.expected_category.as_deref().unwrap_or("(fallback)")
        ));
        out.push_str(&format!(
            "  Got: {}\n",
            outcome.response.matched_category.as_deref().unwrap_or("(none)")
        ));
        out.push_str(&format!(
            "  Confidence: {}%\n",
            outcome.response.confidence_percent
        ));
        if let Some(matched) = &outcome.response.matched_question {
            out.push_str(&format!("  Matched: {}\n", matched));
        }
        out.push('\n');
    }

    out.push_str(&format!("{rule}\nTEST SUMMARY\n{rule}\n\n"));
    out.push_str(&format!(
        "Overall Accuracy: {:.1}% ({}/{})\n\n",
        report.accuracy(),
        report.correct(),
        report.total()
    ));
    out.push_str("Performance by Test Type:\n");
    for (kind, stats) in &report.by_kind {
        out.push_str(&format!(
            "  {:20}: {:5.1}% ({}/{})\n",
            kind.to_string(),
            stats.accuracy(),
            stats.correct,
            stats.total
        ));
    }
    out.push_str(&format!("\n{}\n", report.verdict()));

    let recommendations = report.recommendations();
    if !recommendations.is_empty() {
        out.push_str("\nRECOMMENDATIONS:\n");
        for recommendation in recommendations {
            out.push_str(&format!("• {}\n", recommendation));
        }
    }
    out
}

pub fn render_sweep(question: &str, points: &[SweepPoint]) -> String {
    let mut out = format!("Threshold sweep for {:?}\n\n", question);
    for point in points {
        out.push_str(&format!("Threshold: {:.1}\n", point.threshold));
        out.push_str(&format!(
            "  Answer: {}\n",
            if point.response.is_fallback { "Not found" } else { "Found" }
        ));
        out.push_str(&format!(
            "  Confidence: {}%\n",
            point.response.confidence_percent
        ));
        if let Some(matched) = &point.response.matched_question {
            out.push_str(&format!("  Matched: {}\n", matched));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::knowledge_loader::KnowledgeLoader;
    use crate::linguistics::EnglishLinguistics;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn fixture_engine() -> FaqEngine {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("faq.csv");
        let loaded = KnowledgeLoader::new()
            .load_from_path(&path)
            .expect("fixture should load");
        FaqEngine::new(
            loaded.entries,
            EngineConfig::default(),
            Arc::new(EnglishLinguistics::new()),
        )
        .expect("engine builds")
    }

    #[test]
    fn exact_and_out_of_scope_cases_pass() {
        let report = evaluate(&fixture_engine(), &default_cases());
        assert_eq!(report.total(), 16);
        assert_eq!(
            report.by_kind[&CaseKind::ExactMatch],
            KindStats {
                correct: 2,
                total: 2
            }
        );
        assert_eq!(
            report.by_kind[&CaseKind::OutOfScope],
            KindStats {
                correct: 3,
                total: 3
            }
        );
        let per_kind_total: usize = report.by_kind.values().map(|s| s.total).sum();
        assert_eq!(per_kind_total, report.total());
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_accuracy(80.0), Verdict::Excellent);
        assert_eq!(Verdict::from_accuracy(79.9), Verdict::Good);
        assert_eq!(Verdict::from_accuracy(40.0), Verdict::Fair);
        assert_eq!(Verdict::from_accuracy(10.0), Verdict::Poor);
    }

    #[test]
    fn recommends_higher_threshold_when_out_of_scope_leaks() {
        let engine = fixture_engine();
        let cases = vec![EvaluationCase::new(
            "What is your return policy?",
            None,
            CaseKind::OutOfScope,
        )];
        let report = evaluate(&engine, &cases);
        assert_eq!(report.correct(), 0);
        assert!(report
            .recommendations()
            .iter()
            .any(|r| r.starts_with("Threshold may be too low")));
    }

    #[test]
    fn sweep_reports_every_threshold_with_a_single_score() {
        let engine = fixture_engine();
        let points = threshold_sweep(&engine, "How can I send back my order?", &SWEEP_THRESHOLDS);
        assert_eq!(points.len(), SWEEP_THRESHOLDS.len());
        let score = points[0].response.confidence_percent;
        assert!(points.iter().all(|p| p.response.confidence_percent == score));

        let mut seen_fallback = false;
        for point in &points {
            if seen_fallback {
                assert!(point.response.is_fallback);
            }
            seen_fallback |= point.response.is_fallback;
        }
    }

    #[test]
    fn rendered_report_contains_summary() {
        let report = evaluate(&fixture_engine(), &default_cases());
        let text = render_report(&report);
        assert!(text.contains("Overall Accuracy:"));
        assert!(text.contains("exact_match"));
        assert!(text.contains("Test 16/16"));
        assert!(text.contains("RUNNING TEST CASES (threshold 0.30)"));
    }
}
