use super::domain::{Lead, Offer};
use serde::{Deserialize, Serialize};
use std::fmt;

const SENIOR_TITLE_POINTS: u32 = 20;
const MANAGER_TITLE_POINTS: u32 = 10;
const INDUSTRY_FIT_POINTS: u32 = 20;
const COMPLETENESS_POINTS: u32 = 10;

/// Heuristic that contributed to a rule score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFactor {
    Seniority,
    IndustryFit,
    Completeness,
}

/// Discrete contribution to a rule score, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: RuleFactor,
    pub points: u32,
    pub notes: String,
}

/// Composite rule score with the trail of heuristics that fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleScore {
    pub total: u32,
    pub components: Vec<ScoreComponent>,
}

impl RuleFactor {
    pub fn label(&self) -> &'static str {
        match self {
            RuleFactor::Seniority => "seniority",
            RuleFactor::IndustryFit => "industry_fit",
            RuleFactor::Completeness => "completeness",
        }
    }
}

/// Renders the trail as `factor +points (notes)` entries, or `none`.
impl fmt::Display for RuleScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("none");
        }
        for (index, component) in self.components.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(
                f,
                "{} +{} ({})",
                component.factor.label(),
                component.points,
                component.notes
            )?;
        }
        Ok(())
    }
}

/// Stateless scorer applying the seniority, industry, and completeness rubric.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleScorer;

impl RuleScorer {
    pub fn score(&self, offer: &Offer, lead: &Lead) -> RuleScore {
        let mut components = Vec::new();

        if let Some(component) = seniority(&lead.role) {
            components.push(component);
        }
        if let Some(component) = industry_fit(&offer.ideal_use_cases, &lead.industry) {
            components.push(component);
        }
        if lead.is_complete() {
            components.push(ScoreComponent {
                factor: RuleFactor::Completeness,
                points: COMPLETENESS_POINTS,
                notes: "all lead fields populated".to_string(),
            });
        }

        let total = components.iter().map(|component| component.points).sum();
        RuleScore { total, components }
    }
}

/// Convenience wrapper returning only the total.
pub fn rule_score(offer: &Offer, lead: &Lead) -> u32 {
    RuleScorer.score(offer, lead).total
}

fn seniority(role: &str) -> Option<ScoreComponent> {
    let role = role.to_lowercase();

    if role.contains("head") || role.contains("director") {
        Some(ScoreComponent {
            factor: RuleFactor::Seniority,
            points: SENIOR_TITLE_POINTS,
            notes: format!("senior title '{role}'"),
        })
    } else if role.contains("manager") {
        Some(ScoreComponent {
            factor: RuleFactor::Seniority,
            points: MANAGER_TITLE_POINTS,
            notes: format!("manager title '{role}'"),
        })
    } else {
        None
    }
}

fn industry_fit(use_cases: &[String], industry: &str) -> Option<ScoreComponent> {
    let industry = industry.to_lowercase();

    use_cases
        .iter()
        .find(|use_case| industry.contains(&use_case.to_lowercase()))
        .map(|use_case| ScoreComponent {
            factor: RuleFactor::IndustryFit,
            points: INDUSTRY_FIT_POINTS,
            notes: format!("industry matches ideal use case '{use_case}'"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(use_cases: &[&str]) -> Offer {
        Offer {
            name: "GrowthKit".to_string(),
            value_props: vec!["Fast onboarding".to_string()],
            ideal_use_cases: use_cases.iter().map(|value| value.to_string()).collect(),
        }
    }

    fn lead(role: &str, industry: &str) -> Lead {
        Lead {
            name: "Ava Patel".to_string(),
            role: role.to_string(),
            company: "FlowMetrics".to_string(),
            industry: industry.to_string(),
            location: "NY".to_string(),
            linkedin_bio: "Scaling GTM".to_string(),
        }
    }

    fn points_for(score: &RuleScore, factor: RuleFactor) -> u32 {
        score
            .components
            .iter()
            .filter(|component| component.factor == factor)
            .map(|component| component.points)
            .sum()
    }

    #[test]
    fn seniority_follows_first_matching_title() {
        let offer = offer(&[]);
        let head = RuleScorer.score(&offer, &lead("Head of Growth", ""));
        let manager = RuleScorer.score(&offer, &lead("Marketing Manager", ""));
        let analyst = RuleScorer.score(&offer, &lead("Analyst", ""));

        assert_eq!(points_for(&head, RuleFactor::Seniority), 20);
        assert_eq!(points_for(&manager, RuleFactor::Seniority), 10);
        assert_eq!(points_for(&analyst, RuleFactor::Seniority), 0);
    }

    #[test]
    fn director_and_manager_together_score_once() {
        let score = RuleScorer.score(&offer(&[]), &lead("Director, Product Manager", ""));
        assert_eq!(points_for(&score, RuleFactor::Seniority), 20);
    }

    #[test]
    fn seniority_match_ignores_case() {
        let score = RuleScorer.score(&offer(&[]), &lead("DIRECTOR OF SALES", ""));
        assert_eq!(points_for(&score, RuleFactor::Seniority), 20);
    }

    #[test]
    fn industry_fit_awards_at_most_once() {
        let offer = offer(&["SaaS", "B2B", "B2B SaaS"]);
        let score = RuleScorer.score(&offer, &lead("Analyst", "b2b saas"));
        assert_eq!(points_for(&score, RuleFactor::IndustryFit), 20);
        assert!(score.components[0].notes.contains("'SaaS'"));
    }

    #[test]
    fn industry_fit_requires_use_case_substring() {
        let offer = offer(&["B2B SaaS"]);
        let fit = RuleScorer.score(&offer, &lead("Analyst", "B2B SaaS"));
        let miss = RuleScorer.score(&offer, &lead("Analyst", "FinTech"));
        assert_eq!(points_for(&fit, RuleFactor::IndustryFit), 20);
        assert_eq!(points_for(&miss, RuleFactor::IndustryFit), 0);
    }

    #[test]
    fn completeness_requires_every_field() {
        let offer = offer(&[]);
        let complete = RuleScorer.score(&offer, &lead("Analyst", "FinTech"));
        assert_eq!(points_for(&complete, RuleFactor::Completeness), 10);

        let mut sparse = lead("Analyst", "FinTech");
        sparse.linkedin_bio = " ".to_string();
        let incomplete = RuleScorer.score(&offer, &sparse);
        assert_eq!(points_for(&incomplete, RuleFactor::Completeness), 0);
    }

    #[test]
    fn full_match_reaches_upper_bound() {
        let offer = offer(&["B2B SaaS"]);
        let score = RuleScorer.score(&offer, &lead("Head of Growth", "B2B SaaS"));
        assert_eq!(score.total, 50);
        assert_eq!(score.components.len(), 3);
        assert_eq!(rule_score(&offer, &lead("Head of Growth", "B2B SaaS")), 50);
    }

    #[test]
    fn empty_lead_scores_zero() {
        let score = RuleScorer.score(&offer(&["B2B SaaS"]), &Lead::default());
        assert_eq!(score.total, 0);
        assert!(score.components.is_empty());
        assert_eq!(score.to_string(), "none");
    }

    #[test]
    fn trail_renders_every_fired_heuristic() {
        let mut sparse = lead("Marketing Manager", "B2B SaaS");
        sparse.location.clear();
        let score = RuleScorer.score(&offer(&["SaaS"]), &sparse);
        assert_eq!(
            score.to_string(),
            "seniority +10 (manager title 'marketing manager'); \
industry_fit +20 (industry matches ideal use case 'SaaS')"
        );
    }
}
