use serde::{Deserialize, Serialize};
use std::fmt;

/// Columns every lead batch must expose, in canonical output order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "name",
    "role",
    "company",
    "industry",
    "location",
    "linkedin_bio",
];

/// What is being sold, used as scoring context for every lead in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub name: String,
    pub value_props: Vec<String>,
    pub ideal_use_cases: Vec<String>,
}

impl Offer {
    /// Builds an offer from free-text form input. Lists are comma separated.
    pub fn from_raw(name: &str, value_props: &str, ideal_use_cases: &str) -> Self {
        Self {
            name: name.to_string(),
            value_props: split_list(value_props),
            ideal_use_cases: split_list(ideal_use_cases),
        }
    }
}

/// Splits a comma separated list, trimming entries and dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// A prospective customer as read from the input batch.
///
/// Absent values deserialize to empty strings so a sparse row never fails
/// the batch; only missing columns do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub linkedin_bio: String,
}

impl Lead {
    /// Field values in `REQUIRED_COLUMNS` order.
    pub fn fields(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.role.as_str(),
            self.company.as_str(),
            self.industry.as_str(),
            self.location.as_str(),
            self.linkedin_bio.as_str(),
        ]
    }

    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(|value| !value.trim().is_empty())
    }

    /// Human readable one-line description, used in generative prompts.
    pub fn describe(&self) -> String {
        format!(
            "Name: {}; Role: {}; Company: {}; Industry: {}; Location: {}; Bio: {}",
            self.name, self.role, self.company, self.industry, self.location, self.linkedin_bio
        )
    }
}

/// Estimated purchase likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    High,
    Medium,
    Low,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::High => "High",
            Intent::Medium => "Medium",
            Intent::Low => "Low",
        }
    }

    /// Points awarded on the text-signal scale.
    pub fn signal_points(&self) -> u32 {
        match self {
            Intent::High => 50,
            Intent::Medium => 30,
            Intent::Low => 10,
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Intent::High),
            "medium" => Some(Intent::Medium),
            "low" => Some(Intent::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Points, label, and rationale produced by a lead classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSignal {
    pub points: u32,
    pub intent: Intent,
    pub reasoning: String,
}

/// Output record: the original lead plus both scores.
///
/// Kept flat so each record writes as a single CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub location: String,
    pub linkedin_bio: String,
    pub rule_score: u32,
    pub spacy_points: u32,
    pub intent: Intent,
    pub reasoning: String,
}

impl ScoredLead {
    pub fn new(lead: &Lead, rule_score: u32, signal: TextSignal) -> Self {
        Self {
            name: lead.name.clone(),
            role: lead.role.clone(),
            company: lead.company.clone(),
            industry: lead.industry.clone(),
            location: lead.location.clone(),
            linkedin_bio: lead.linkedin_bio.clone(),
            rule_score,
            spacy_points: signal.points,
            intent: signal.intent,
            reasoning: signal.reasoning,
        }
    }
}
