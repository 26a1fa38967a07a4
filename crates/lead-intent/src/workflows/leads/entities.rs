//! Phrase extraction over a lead's synthesized text blob.
//!
//! The extractor is a pluggable capability: classification only needs an
//! ordered list of candidate phrases, so any backend that surfaces them from
//! the blob can stand in for the default keyword matcher.

use std::collections::HashSet;

/// Job-title keywords surfaced as standalone entities.
pub(crate) const TITLE_LEXICON: &[&str] = &[
    "ceo",
    "cto",
    "cfo",
    "coo",
    "cmo",
    "cro",
    "ciso",
    "founder",
    "co-founder",
    "owner",
    "president",
    "vp",
    "head",
    "director",
    "manager",
    "lead",
];

/// Lowercase words allowed inside a capitalised phrase without breaking it.
const PHRASE_CONNECTORS: &[&str] = &["of", "&", "and", "de", "van", "von"];

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("entity extractor unavailable: {0}")]
    Unavailable(String),
}

/// Capability that surfaces candidate phrases from free text, in order.
pub trait EntityExtractor: Send + Sync {
    fn extract_entities(&self, text: &str) -> Result<Vec<String>, ExtractionError>;
}

impl<E: EntityExtractor + ?Sized> EntityExtractor for std::sync::Arc<E> {
    fn extract_entities(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
        (**self).extract_entities(text)
    }
}

/// Rule-based extractor: title keywords plus runs of capitalised tokens.
///
/// Title keywords are emitted on their own in original casing and close any
/// phrase in progress. Connector words such as "of" only stay inside a phrase
/// when another capitalised token follows them.
#[derive(Debug, Clone)]
pub struct KeywordEntityExtractor {
    titles: HashSet<String>,
}

impl Default for KeywordEntityExtractor {
    fn default() -> Self {
        Self::with_titles(TITLE_LEXICON.iter().copied())
    }
}

impl KeywordEntityExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_titles<'a, I>(titles: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            titles: titles
                .into_iter()
                .map(|title| title.to_lowercase())
                .collect(),
        }
    }

    fn is_title(&self, token: &str) -> bool {
        self.titles.contains(&token.to_lowercase())
    }
}

impl EntityExtractor for KeywordEntityExtractor {
    fn extract_entities(&self, text: &str) -> Result<Vec<String>, ExtractionError> {
        let mut entities = Vec::new();
        let mut phrase = PhraseBuilder::default();

        for raw in text.split_whitespace() {
            let token = trim_token(raw);
            if token.is_empty() {
                phrase.flush(&mut entities);
                continue;
            }

            if self.is_title(token) {
                phrase.flush(&mut entities);
                entities.push(token.to_string());
            } else if is_capitalised(token) {
                phrase.push(token);
            } else if PHRASE_CONNECTORS.contains(&token.to_lowercase().as_str()) {
                phrase.hold(token);
            } else {
                phrase.flush(&mut entities);
            }

            if ends_clause(raw) {
                phrase.flush(&mut entities);
            }
        }

        phrase.flush(&mut entities);
        Ok(entities)
    }
}

#[derive(Default)]
struct PhraseBuilder {
    words: Vec<String>,
    pending: Vec<String>,
}

impl PhraseBuilder {
    fn push(&mut self, token: &str) {
        if !self.words.is_empty() {
            self.words.append(&mut self.pending);
        }
        self.pending.clear();
        self.words.push(token.to_string());
    }

    fn hold(&mut self, token: &str) {
        if !self.words.is_empty() {
            self.pending.push(token.to_string());
        }
    }

    fn flush(&mut self, entities: &mut Vec<String>) {
        if !self.words.is_empty() {
            entities.push(self.words.join(" "));
        }
        self.words.clear();
        self.pending.clear();
    }
}

fn trim_token(raw: &str) -> &str {
    raw.trim_matches(|c: char| !(c.is_alphanumeric() || c == '&' || c == '-'))
        .trim_matches('-')
}

fn is_capitalised(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_uppercase)
}

fn ends_clause(raw: &str) -> bool {
    raw.ends_with([',', '.', ';', ':', '!', '?', '|'])
}
