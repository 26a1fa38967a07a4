use super::domain::{Lead, Offer, REQUIRED_COLUMNS};
use super::LeadScoringError;
use std::io::Write;

const SAMPLE_ROWS: [[&str; 6]; 5] = [
    [
        "Ava Patel",
        "Head of Growth",
        "FlowMetrics",
        "B2B SaaS",
        "New York",
        "Scaling GTM teams at a Series B analytics platform",
    ],
    [
        "Liam Chen",
        "Marketing Manager",
        "Brightside Retail",
        "E-commerce",
        "Austin",
        "Running paid acquisition and lifecycle campaigns",
    ],
    [
        "Sofia Garcia",
        "CTO",
        "LedgerLoop",
        "FinTech",
        "London",
        "Building payments infrastructure for mid-market lenders",
    ],
    [
        "Noah Kim",
        "Sales Development Representative",
        "CloudNest",
        "B2B SaaS",
        "Seattle",
        "Prospecting into enterprise IT buyers",
    ],
    [
        "Emma Rossi",
        "Director of Operations",
        "MediCore",
        "Healthcare",
        "Boston",
        "Streamlining clinical operations across regional hospitals",
    ],
];

/// Fixed illustrative batch for users preparing their own upload.
pub fn sample_leads() -> Vec<Lead> {
    SAMPLE_ROWS
        .iter()
        .map(|[name, role, company, industry, location, bio]| Lead {
            name: name.to_string(),
            role: role.to_string(),
            company: company.to_string(),
            industry: industry.to_string(),
            location: location.to_string(),
            linkedin_bio: bio.to_string(),
        })
        .collect()
}

pub fn sample_offer() -> Offer {
    Offer::from_raw(
        "GrowthKit",
        "Fast onboarding, Pipeline analytics, CRM sync",
        "B2B SaaS, FinTech",
    )
}

/// Writes the sample batch as CSV with the required header.
pub fn write_sample_csv<W: Write>(writer: W) -> Result<(), LeadScoringError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REQUIRED_COLUMNS)?;
    for row in SAMPLE_ROWS {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
