use crate::infra::{build_classifier, ClassifierChoice};
use clap::Args;
use lead_intent::config::AppConfig;
use lead_intent::error::AppError;
use lead_intent::telemetry;
use lead_intent::workflows::leads::{
    write_results, write_results_to_path, write_sample_csv, BatchSummary, GeminiClassifier, Lead,
    LeadClassifier, LeadScoringPipeline, Offer, ScoredLead,
};
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV file with name, role, company, industry, location, linkedin_bio columns
    #[arg(long)]
    pub(crate) leads: PathBuf,
    /// Name of the offer being sold
    #[arg(long, default_value = "")]
    pub(crate) offer_name: String,
    /// Comma separated value propositions
    #[arg(long, default_value = "")]
    pub(crate) value_props: String,
    /// Comma separated ideal use cases, matched against each lead's industry
    #[arg(long, default_value = "")]
    pub(crate) use_cases: String,
    /// Where to write the scored CSV (defaults to LEADS_OUTPUT_PATH)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Classifier used for the text signal
    #[arg(long, value_enum, default_value_t = ClassifierChoice::Signal)]
    pub(crate) classifier: ClassifierChoice,
    /// Print results as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SampleArgs {
    /// Destination file (prints to stdout when omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) role: String,
    #[arg(long, default_value = "")]
    pub(crate) company: String,
    #[arg(long, default_value = "")]
    pub(crate) industry: String,
    #[arg(long, default_value = "")]
    pub(crate) location: String,
    #[arg(long, default_value = "")]
    pub(crate) linkedin_bio: String,
}

/// Loads configuration and installs logging for a one-shot command.
fn load_command_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    if let Err(err) = telemetry::init(&config.telemetry) {
        eprintln!("telemetry disabled: {err}");
    }
    Ok(config)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = load_command_config()?;

    let ScoreArgs {
        leads,
        offer_name,
        value_props,
        use_cases,
        output,
        classifier,
        json,
    } = args;

    let offer = Offer::from_raw(&offer_name, &value_props, &use_cases);
    let classifier = build_classifier(classifier, &config.gemini)?;

    let results = LeadScoringPipeline::new(classifier).score_path(&offer, &leads)?;

    if json {
        let body = serde_json::json!({
            "summary": BatchSummary::from_results(&results),
            "results": &results,
        });
        println!("{body:#}");
    } else {
        render_results(&offer, &results);
    }

    let output = output.unwrap_or(config.scoring.output_path);
    if let Err(err) = write_results_to_path(&results, &output) {
        warn!(path = %output.display(), error = %err, "failed to persist scored leads");
        return Err(err.into());
    }
    if !json {
        println!("\nSaved {} scored leads to {}", results.len(), output.display());
    }

    Ok(())
}

pub(crate) fn run_sample(args: SampleArgs) -> Result<(), AppError> {
    match args.output {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            write_sample_csv(file)?;
            println!("Sample leads written to {}", path.display());
        }
        None => write_sample_csv(std::io::stdout().lock())?,
    }
    Ok(())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = load_command_config()?;
    let classifier = GeminiClassifier::from_config(&config.gemini)?;

    let lead = Lead {
        name: args.name,
        role: args.role,
        company: args.company,
        industry: args.industry,
        location: args.location,
        linkedin_bio: args.linkedin_bio,
    };

    let signal = classifier.classify(&Offer::default(), &lead)?;
    println!("{}", signal.reasoning);
    Ok(())
}

fn render_results(offer: &Offer, results: &[ScoredLead]) {
    println!("Lead intent scoring");
    if offer.name.is_empty() {
        println!("Offer: (unnamed)");
    } else {
        println!("Offer: {}", offer.name);
    }
    if !offer.ideal_use_cases.is_empty() {
        println!("Ideal use cases: {}", offer.ideal_use_cases.join(", "));
    }

    let summary = BatchSummary::from_results(results);
    println!(
        "\nIntent mix: {} high, {} medium, {} low ({} leads, average rule score {:.1})",
        summary.high, summary.medium, summary.low, summary.total, summary.average_rule_score
    );

    if results.is_empty() {
        println!("\nNo leads in batch");
        return;
    }

    println!("\nLeads");
    for lead in results {
        println!(
            "- {} | {} at {} | rule {} | signal {} | intent {}",
            lead.name, lead.role, lead.company, lead.rule_score, lead.spacy_points, lead.intent
        );
        println!("    {}", lead.reasoning);
    }
}

/// Renders results as CSV into memory for download-style responses.
pub(crate) fn results_csv(results: &[ScoredLead]) -> Result<String, AppError> {
    let mut buffer = Vec::new();
    write_results(results, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_intent::workflows::leads::{sample_leads, sample_offer};

    #[test]
    fn results_csv_starts_with_output_header() {
        let results = LeadScoringPipeline::default()
            .score_batch(&sample_offer(), &sample_leads())
            .expect("sample scores");
        let csv = results_csv(&results).expect("csv renders");
        assert!(csv.starts_with("name,role,company,industry,location,linkedin_bio,rule_score,spacy_points,intent,reasoning"));
        assert_eq!(csv.lines().count(), 6);
    }

    #[test]
    fn command_config_tolerates_repeated_logging_setup() {
        if std::env::var("APP_PORT").is_ok() || std::env::var("APP_LOG_LEVEL").is_ok() {
            return;
        }
        let first = load_command_config().expect("config loads");
        let second = load_command_config().expect("second install is not fatal");
        assert_eq!(first.scoring.output_path, second.scoring.output_path);
    }
}
