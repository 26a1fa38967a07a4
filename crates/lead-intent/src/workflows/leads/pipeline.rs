use super::classifier::LeadClassifier;
use super::domain::{Intent, Lead, Offer, ScoredLead};
use super::parser::parse_leads;
use super::rules::RuleScorer;
use super::signals::TextSignalScorer;
use super::LeadScoringError;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Applies the rule scorer and a classifier to every lead of a batch.
///
/// Rows are scored independently and in input order. Any classifier
/// failure aborts the whole batch without partial output.
pub struct LeadScoringPipeline<C = TextSignalScorer> {
    rules: RuleScorer,
    classifier: C,
}

impl Default for LeadScoringPipeline<TextSignalScorer> {
    fn default() -> Self {
        Self::new(TextSignalScorer::default())
    }
}

impl<C: LeadClassifier> LeadScoringPipeline<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            rules: RuleScorer,
            classifier,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn score_lead(&self, offer: &Offer, lead: &Lead) -> Result<ScoredLead, LeadScoringError> {
        let rule = self.rules.score(offer, lead);
        let signal = self.classifier.classify(offer, lead)?;

        debug!(
            lead = %lead.name,
            rule_score = rule.total,
            rule_trail = %rule,
            signal_points = signal.points,
            intent = %signal.intent,
            "lead scored"
        );

        Ok(ScoredLead::new(lead, rule.total, signal))
    }

    pub fn score_batch(
        &self,
        offer: &Offer,
        leads: &[Lead],
    ) -> Result<Vec<ScoredLead>, LeadScoringError> {
        let results = leads
            .iter()
            .map(|lead| self.score_lead(offer, lead))
            .collect::<Result<Vec<_>, _>>()?;

        let summary = BatchSummary::from_results(&results);
        info!(
            classifier = self.classifier.name(),
            offer = %offer.name,
            total = summary.total,
            high = summary.high,
            medium = summary.medium,
            low = summary.low,
            "lead batch scored"
        );

        Ok(results)
    }

    /// Validates the CSV schema, then scores every row.
    pub fn score_reader<R: Read>(
        &self,
        offer: &Offer,
        reader: R,
    ) -> Result<Vec<ScoredLead>, LeadScoringError> {
        let leads = parse_leads(reader)?;
        self.score_batch(offer, &leads)
    }

    pub fn score_path<P: AsRef<Path>>(
        &self,
        offer: &Offer,
        path: P,
    ) -> Result<Vec<ScoredLead>, LeadScoringError> {
        let file = std::fs::File::open(path)?;
        self.score_reader(offer, file)
    }
}

/// Writes scored leads as CSV with the output header row.
pub fn write_results<W: Write>(results: &[ScoredLead], writer: W) -> Result<(), LeadScoringError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if results.is_empty() {
        csv_writer
            .write_record(OUTPUT_COLUMNS)
            .map_err(LeadScoringError::Write)?;
    }
    for record in results {
        csv_writer.serialize(record).map_err(LeadScoringError::Write)?;
    }
    csv_writer
        .flush()
        .map_err(|err| LeadScoringError::Write(err.into()))?;
    Ok(())
}

pub fn write_results_to_path<P: AsRef<Path>>(
    results: &[ScoredLead],
    path: P,
) -> Result<(), LeadScoringError> {
    let file = std::fs::File::create(path.as_ref())?;
    write_results(results, file)?;
    info!(path = %path.as_ref().display(), rows = results.len(), "scored leads written");
    Ok(())
}

/// Header of the persisted result set.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "name",
    "role",
    "company",
    "industry",
    "location",
    "linkedin_bio",
    "rule_score",
    "spacy_points",
    "intent",
    "reasoning",
];

/// Intent distribution of a scored batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub average_rule_score: f32,
}

impl BatchSummary {
    pub fn from_results(results: &[ScoredLead]) -> Self {
        let count = |intent: Intent| results.iter().filter(|lead| lead.intent == intent).count();
        let rule_total: u32 = results.iter().map(|lead| lead.rule_score).sum();
        let average_rule_score = if results.is_empty() {
            0.0
        } else {
            rule_total as f32 / results.len() as f32
        };

        Self {
            total: results.len(),
            high: count(Intent::High),
            medium: count(Intent::Medium),
            low: count(Intent::Low),
            average_rule_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::leads::classifier::ClassifierError;
    use crate::workflows::leads::domain::TextSignal;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClassifier {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl LeadClassifier for CountingClassifier {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn classify(&self, _offer: &Offer, lead: &Lead) -> Result<TextSignal, ClassifierError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(call) == self.fail_on {
                return Err(ClassifierError::EmptyResponse);
            }
            Ok(TextSignal {
                points: 10,
                intent: Intent::Low,
                reasoning: lead.name.clone(),
            })
        }
    }

    fn named(name: &str) -> Lead {
        Lead {
            name: name.to_string(),
            ..Lead::default()
        }
    }

    #[test]
    fn batch_preserves_order_and_cardinality() {
        let pipeline = LeadScoringPipeline::default();
        let offer = Offer::default();

        for size in [0usize, 1, 7] {
            let leads: Vec<Lead> = (0..size).map(|i| named(&format!("lead-{i}"))).collect();
            let results = pipeline.score_batch(&offer, &leads).expect("batch scores");
            assert_eq!(results.len(), size);
            for (lead, scored) in leads.iter().zip(&results) {
                assert_eq!(lead.name, scored.name);
            }
        }
    }

    #[test]
    fn classifier_failure_aborts_without_partial_results() {
        let pipeline = LeadScoringPipeline::new(CountingClassifier {
            calls: AtomicUsize::new(0),
            fail_on: Some(1),
        });
        let leads = vec![named("a"), named("b"), named("c")];

        let error = pipeline
            .score_batch(&Offer::default(), &leads)
            .expect_err("second lead fails");

        assert!(matches!(error, LeadScoringError::Classifier(_)));
        assert_eq!(pipeline.classifier().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_column_stops_before_any_row_is_classified() {
        let pipeline = LeadScoringPipeline::new(CountingClassifier {
            calls: AtomicUsize::new(0),
            fail_on: None,
        });
        let csv = "name,role,company,location,linkedin_bio\nAva,CTO,Flow,NY,bio\n";

        let error = pipeline
            .score_reader(&Offer::default(), Cursor::new(csv))
            .expect_err("industry column missing");

        match error {
            LeadScoringError::MissingColumns(columns) => assert_eq!(columns, vec!["industry"]),
            other => panic!("expected missing columns, got {other:?}"),
        }
        assert_eq!(pipeline.classifier().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn written_results_use_output_header() {
        let pipeline = LeadScoringPipeline::default();
        let offer = Offer::from_raw("GrowthKit", "Fast onboarding", "B2B SaaS");
        let lead = Lead {
            name: "Ava Patel".to_string(),
            role: "Head of Growth".to_string(),
            company: "FlowMetrics".to_string(),
            industry: "B2B SaaS".to_string(),
            location: "NY".to_string(),
            linkedin_bio: "Scaling GTM".to_string(),
        };
        let results = pipeline.score_batch(&offer, &[lead]).expect("scores");

        let mut buffer = Vec::new();
        write_results(&results, &mut buffer).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some(OUTPUT_COLUMNS.join(",").as_str()));
        let row = lines.next().expect("data row");
        assert!(row.starts_with("Ava Patel,Head of Growth,FlowMetrics,B2B SaaS,NY,Scaling GTM,50,50,High,"));
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn write_failures_are_not_input_errors() {
        let results = LeadScoringPipeline::default()
            .score_batch(&Offer::default(), &[named("Ava Patel")])
            .expect("scores");

        let error = write_results(&results, BrokenSink).expect_err("sink rejects writes");

        assert!(matches!(error, LeadScoringError::Write(_)));
        assert!(!error.is_input_error());
    }

    #[test]
    fn malformed_input_is_an_input_error() {
        let csv: &[u8] = b"name,role,company,industry,location,linkedin_bio\nAva,\xff\n";
        let error = LeadScoringPipeline::default()
            .score_reader(&Offer::default(), Cursor::new(csv))
            .expect_err("invalid utf8");

        assert!(matches!(error, LeadScoringError::Csv(_)));
        assert!(error.is_input_error());
    }

    #[test]
    fn empty_results_still_write_a_header() {
        let mut buffer = Vec::new();
        write_results(&[], &mut buffer).expect("write");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8").trim_end(),
            OUTPUT_COLUMNS.join(",")
        );
    }

    #[test]
    fn summary_counts_intents() {
        let make = |intent: Intent, rule_score: u32| ScoredLead {
            name: String::new(),
            role: String::new(),
            company: String::new(),
            industry: String::new(),
            location: String::new(),
            linkedin_bio: String::new(),
            rule_score,
            spacy_points: intent.signal_points(),
            intent,
            reasoning: String::new(),
        };
        let summary = BatchSummary::from_results(&[
            make(Intent::High, 50),
            make(Intent::Low, 10),
            make(Intent::Low, 0),
        ]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.low, 2);
        assert_eq!(summary.average_rule_score, 20.0);

        assert_eq!(BatchSummary::from_results(&[]).average_rule_score, 0.0);
    }
}
