use super::domain::{Intent, Lead, TextSignal};
use super::entities::{EntityExtractor, ExtractionError, KeywordEntityExtractor};

const SENIOR_ENTITIES: &[&str] = &["ceo", "cto", "head", "director"];
const MID_LEVEL_ENTITIES: &[&str] = &["manager", "lead"];

/// Joins the fields that carry role signals, in a fixed order.
pub fn text_blob(lead: &Lead) -> String {
    [
        lead.name.as_str(),
        lead.role.as_str(),
        lead.company.as_str(),
        lead.industry.as_str(),
        lead.linkedin_bio.as_str(),
    ]
    .join(" ")
}

/// Maps extracted entities to points and intent. Senior terms win over
/// mid-level terms regardless of position.
pub fn classify_entities(entities: &[String]) -> TextSignal {
    let rendered = format!("{entities:?}");

    if contains_any(entities, SENIOR_ENTITIES) {
        TextSignal {
            points: Intent::High.signal_points(),
            intent: Intent::High,
            reasoning: format!("Identified senior role entities: {rendered}"),
        }
    } else if contains_any(entities, MID_LEVEL_ENTITIES) {
        TextSignal {
            points: Intent::Medium.signal_points(),
            intent: Intent::Medium,
            reasoning: format!("Identified mid-level role entities: {rendered}"),
        }
    } else {
        TextSignal {
            points: Intent::Low.signal_points(),
            intent: Intent::Low,
            reasoning: format!("No strong senior role entities found. Entities: {rendered}"),
        }
    }
}

fn contains_any(entities: &[String], terms: &[&str]) -> bool {
    entities
        .iter()
        .any(|entity| terms.iter().any(|term| entity.eq_ignore_ascii_case(term)))
}

/// Scores a lead from the entities its text blob surfaces.
#[derive(Debug, Clone)]
pub struct TextSignalScorer<E = KeywordEntityExtractor> {
    extractor: E,
}

impl Default for TextSignalScorer<KeywordEntityExtractor> {
    fn default() -> Self {
        Self::new(KeywordEntityExtractor::default())
    }
}

impl<E: EntityExtractor> TextSignalScorer<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    pub fn score(&self, lead: &Lead) -> Result<TextSignal, ExtractionError> {
        let entities = self.extractor.extract_entities(&text_blob(lead))?;
        Ok(classify_entities(&entities))
    }
}
