//! Lead intent scoring: rule heuristics plus a text-derived role signal.

pub mod classifier;
pub mod domain;
pub mod entities;
pub mod gemini;
mod parser;
pub mod pipeline;
pub mod rules;
pub mod sample;
pub mod signals;

pub use classifier::{ClassifierError, LeadClassifier};
pub use domain::{split_list, Intent, Lead, Offer, ScoredLead, TextSignal, REQUIRED_COLUMNS};
pub use entities::{EntityExtractor, ExtractionError, KeywordEntityExtractor};
pub use gemini::GeminiClassifier;
pub use pipeline::{
    write_results, write_results_to_path, BatchSummary, LeadScoringPipeline, OUTPUT_COLUMNS,
};
pub use rules::{rule_score, RuleFactor, RuleScore, RuleScorer, ScoreComponent};
pub use sample::{sample_leads, sample_offer, write_sample_csv};
pub use signals::{classify_entities, text_blob, TextSignalScorer};

#[derive(Debug, thiserror::Error)]
pub enum LeadScoringError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("failed to read or write lead data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid lead CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write scored leads: {0}")]
    Write(#[source] csv::Error),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl LeadScoringError {
    /// True when the caller supplied a batch that cannot be scored as given.
    /// Failures writing results are never the caller's fault.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LeadScoringError::MissingColumns(_) | LeadScoringError::Csv(_)
        )
    }
}
