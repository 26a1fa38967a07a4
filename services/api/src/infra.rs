use clap::ValueEnum;
use lead_intent::config::{AppConfig, GeminiConfig};
use lead_intent::error::AppError;
use lead_intent::workflows::leads::{
    write_results_to_path, GeminiClassifier, LeadClassifier, LeadScoringPipeline, Offer,
    ScoredLead, TextSignalScorer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Settings the scoring routes need at request time.
#[derive(Debug)]
pub(crate) struct ScoringState {
    pub(crate) output_path: Option<PathBuf>,
    pub(crate) gemini: GeminiConfig,
    persist_lock: Mutex<()>,
}

impl ScoringState {
    pub(crate) fn new(output_path: Option<PathBuf>, gemini: GeminiConfig) -> Self {
        Self {
            output_path,
            gemini,
            persist_lock: Mutex::new(()),
        }
    }

    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Some(config.scoring.output_path.clone()),
            config.gemini.clone(),
        )
    }

    /// Rewrites the shared output file; concurrent batches take turns.
    fn persist(&self, results: &[ScoredLead]) -> PersistOutcome {
        let Some(path) = &self.output_path else {
            return PersistOutcome::default();
        };

        let _guard = self
            .persist_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match write_results_to_path(results, path) {
            Ok(()) => PersistOutcome {
                saved_to: Some(path.display().to_string()),
                persist_error: None,
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to persist scored leads");
                PersistOutcome {
                    saved_to: None,
                    persist_error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Where a scored batch was saved, or why saving failed.
#[derive(Debug, Default)]
pub(crate) struct PersistOutcome {
    pub(crate) saved_to: Option<String>,
    pub(crate) persist_error: Option<String>,
}

/// Which strategy supplies the text-signal half of each score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ClassifierChoice {
    /// Entity extraction over the lead's text fields
    #[default]
    Signal,
    /// Gemini generative classification (requires GEMINI_API_KEY)
    Gemini,
}

pub(crate) fn build_classifier(
    choice: ClassifierChoice,
    gemini: &GeminiConfig,
) -> Result<Box<dyn LeadClassifier>, AppError> {
    let classifier: Box<dyn LeadClassifier> = match choice {
        ClassifierChoice::Signal => Box::new(TextSignalScorer::default()),
        ClassifierChoice::Gemini => Box::new(GeminiClassifier::from_config(gemini)?),
    };
    Ok(classifier)
}

/// Offer fields as typed into a form: lists are comma separated strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct OfferInput {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) value_props: String,
    #[serde(default)]
    pub(crate) ideal_use_cases: String,
}

impl OfferInput {
    pub(crate) fn to_offer(&self) -> Offer {
        Offer::from_raw(&self.name, &self.value_props, &self.ideal_use_cases)
    }
}

/// Scores a CSV payload on the blocking pool; the generative client and the
/// result file both block. Persists only when `persist` is set.
pub(crate) async fn score_csv_blocking(
    scoring: Arc<ScoringState>,
    offer: Offer,
    leads_csv: String,
    classifier: ClassifierChoice,
    persist: bool,
) -> Result<(Vec<ScoredLead>, PersistOutcome), AppError> {
    tokio::task::spawn_blocking(move || -> Result<(Vec<ScoredLead>, PersistOutcome), AppError> {
        let classifier = build_classifier(classifier, &scoring.gemini)?;
        let reader = Cursor::new(leads_csv.into_bytes());
        let results = LeadScoringPipeline::new(classifier).score_reader(&offer, reader)?;
        let outcome = if persist {
            scoring.persist(&results)
        } else {
            PersistOutcome::default()
        };
        Ok((results, outcome))
    })
    .await
    .map_err(|err| AppError::Io(std::io::Error::other(err)))?
}
