use super::domain::{Lead, REQUIRED_COLUMNS};
use super::LeadScoringError;
use std::io::Read;

/// Reads a lead batch, rejecting it wholesale when a required column is absent.
pub(crate) fn parse_leads<R: Read>(reader: R) -> Result<Vec<Lead>, LeadScoringError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let missing = missing_columns(csv_reader.headers()?);
    if !missing.is_empty() {
        return Err(LeadScoringError::MissingColumns(missing));
    }

    let mut leads = Vec::new();
    for record in csv_reader.deserialize::<Lead>() {
        leads.push(record?);
    }

    Ok(leads)
}

fn missing_columns(headers: &csv::StringRecord) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reports_every_missing_column_in_required_order() {
        let csv = "name,company,role\nAva,Flow,Head\n";
        let error = parse_leads(Cursor::new(csv)).expect_err("columns missing");
        match error {
            LeadScoringError::MissingColumns(columns) => {
                assert_eq!(columns, vec!["industry", "location", "linkedin_bio"]);
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn sparse_rows_become_empty_strings() {
        let csv = "name,role,company,industry,location,linkedin_bio\n\
Ava Patel,Head of Growth,,B2B SaaS\n\
Noah Kim,,Brightside,Retail,Austin,\n";
        let leads = parse_leads(Cursor::new(csv)).expect("parse");

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].company, "");
        assert_eq!(leads[0].location, "");
        assert_eq!(leads[0].linkedin_bio, "");
        assert_eq!(leads[1].role, "");
        assert_eq!(leads[1].location, "Austin");
    }

    #[test]
    fn extra_columns_and_column_order_are_ignored() {
        let csv = "email,linkedin_bio,location,industry,company,role,name\n\
ava@example.com,Scaling GTM,NY,B2B SaaS,FlowMetrics,Head of Growth,Ava Patel\n";
        let leads = parse_leads(Cursor::new(csv)).expect("parse");
        assert_eq!(leads[0].name, "Ava Patel");
        assert_eq!(leads[0].linkedin_bio, "Scaling GTM");
    }

    #[test]
    fn header_only_input_is_an_empty_batch() {
        let csv = "name,role,company,industry,location,linkedin_bio\n";
        assert!(parse_leads(Cursor::new(csv)).expect("parse").is_empty());
    }

    #[test]
    fn header_names_are_trimmed() {
        let csv = " name , role ,company,industry,location,linkedin_bio\nAva,CTO,,,,\n";
        let leads = parse_leads(Cursor::new(csv)).expect("parse");
        assert_eq!(leads[0].role, "CTO");
    }

    #[test]
    fn field_values_keep_their_whitespace() {
        let csv = "name,role,company,industry,location,linkedin_bio\n\
Ava Patel,Head of Growth,FlowMetrics,B2B SaaS,NY,\"  Scaling GTM  \"\n";
        let leads = parse_leads(Cursor::new(csv)).expect("parse");
        assert_eq!(leads[0].linkedin_bio, "  Scaling GTM  ");
    }
}
