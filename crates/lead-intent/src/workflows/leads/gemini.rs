//! Generative intent classification over the Gemini REST API.
//!
//! Sends one `generateContent` request per lead and reads the intent label
//! out of the free-text answer. The client is blocking; async callers should
//! run it on `tokio::task::spawn_blocking`.

use super::classifier::{ClassifierError, LeadClassifier};
use super::domain::{Intent, Lead, Offer, TextSignal};
use crate::config::GeminiConfig;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const PROMPT_PREFIX: &str = "Classify the following lead as High, Medium, or Low intent: ";

/// Blocking Gemini client implementing [`LeadClassifier`].
pub struct GeminiClassifier {
    client: Client,
    api_key: String,
    endpoint: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl GeminiClassifier {
    /// Builds a client from configuration. Fails when no API key is set.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, ClassifierError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(ClassifierError::NotConfigured("GEMINI_API_KEY is not set"))?;
        Self::new(&api_key, &config.model, &config.base_url, config.timeout_secs)
    }

    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let model = model.trim_start_matches('/');
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        let endpoint = format!(
            "{}/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoint,
        })
    }

    /// Sends a raw prompt and returns the trimmed response text.
    pub fn generate(&self, prompt: &str) -> Result<String, ClassifierError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), response.text()));
        }

        let payload: GenerateResponse = response.json()?;
        payload.text().ok_or(ClassifierError::EmptyResponse)
    }
}

impl LeadClassifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn classify(&self, offer: &Offer, lead: &Lead) -> Result<TextSignal, ClassifierError> {
        let prompt = build_prompt(offer, lead);
        let answer = self.generate(&prompt)?;
        debug!(lead = %lead.name, %answer, "generative classification received");
        interpret_response(answer)
    }
}

/// Non-success reply; an unreadable body is logged and reported as empty.
fn upstream_error(status: u16, body: Result<String, reqwest::Error>) -> ClassifierError {
    let body = match body {
        Ok(body) => body,
        Err(err) => {
            warn!(status, error = %err, "failed to read gemini error body");
            String::new()
        }
    };
    ClassifierError::Upstream { status, body }
}

pub fn build_prompt(offer: &Offer, lead: &Lead) -> String {
    let mut prompt = format!("{PROMPT_PREFIX}{}", lead.describe());

    if !offer.name.is_empty() {
        prompt.push_str(&format!("\nOffer: {}", offer.name));
    }
    if !offer.value_props.is_empty() {
        prompt.push_str(&format!("\nValue propositions: {}", offer.value_props.join(", ")));
    }
    if !offer.ideal_use_cases.is_empty() {
        prompt.push_str(&format!(
            "\nIdeal use cases: {}",
            offer.ideal_use_cases.join(", ")
        ));
    }

    prompt
}

/// Reads the first intent label mentioned in a free-text answer.
pub fn interpret_response(answer: String) -> Result<TextSignal, ClassifierError> {
    let intent = answer
        .split(|c: char| !c.is_alphabetic())
        .find_map(Intent::from_label)
        .ok_or_else(|| ClassifierError::UnrecognizedLabel(answer.clone()))?;

    Ok(TextSignal {
        points: intent.signal_points(),
        intent,
        reasoning: answer,
    })
}
