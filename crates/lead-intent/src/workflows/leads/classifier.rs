use super::domain::{Lead, Offer, TextSignal};
use super::entities::{EntityExtractor, ExtractionError};
use super::signals::TextSignalScorer;

/// Strategy that assigns a lead its intent signal.
///
/// The batch pipeline only talks to this trait, so the entity-based scorer
/// and the generative classifier are interchangeable at call sites.
pub trait LeadClassifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, offer: &Offer, lead: &Lead) -> Result<TextSignal, ClassifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("generative classifier is not configured: {0}")]
    NotConfigured(&'static str),
    #[error("generative classifier request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generative classifier returned status {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("generative classifier returned no text")]
    EmptyResponse,
    #[error("could not find High, Medium, or Low in classifier response: {0}")]
    UnrecognizedLabel(String),
}

impl ClassifierError {
    /// True when the failure came from a remote service rather than local input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ClassifierError::Http(_)
                | ClassifierError::Upstream { .. }
                | ClassifierError::EmptyResponse
                | ClassifierError::UnrecognizedLabel(_)
        )
    }
}

impl<E: EntityExtractor> LeadClassifier for TextSignalScorer<E> {
    fn name(&self) -> &'static str {
        "text-signal"
    }

    fn classify(&self, _offer: &Offer, lead: &Lead) -> Result<TextSignal, ClassifierError> {
        Ok(self.score(lead)?)
    }
}

impl<C: LeadClassifier + ?Sized> LeadClassifier for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn classify(&self, offer: &Offer, lead: &Lead) -> Result<TextSignal, ClassifierError> {
        (**self).classify(offer, lead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::leads::domain::Intent;

    #[test]
    fn text_signal_scorer_classifies_through_the_trait() {
        let classifier: Box<dyn LeadClassifier> = Box::new(TextSignalScorer::default());
        let lead = Lead {
            role: "CTO".to_string(),
            ..Lead::default()
        };

        let signal = classifier
            .classify(&Offer::default(), &lead)
            .expect("classification succeeds");

        assert_eq!(classifier.name(), "text-signal");
        assert_eq!(signal.intent, Intent::High);
    }

    #[test]
    fn upstream_errors_are_distinguished_from_local_ones() {
        assert!(ClassifierError::EmptyResponse.is_upstream());
        assert!(!ClassifierError::NotConfigured("GEMINI_API_KEY").is_upstream());
        assert!(!ClassifierError::from(ExtractionError::Unavailable("x".to_string())).is_upstream());
    }
}
