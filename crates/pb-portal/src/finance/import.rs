use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::domain::{ApplicationId, ApplicationStatus, ApplicationSummary};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read application export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid application CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown application status `{value}`")]
    UnknownStatus { row: usize, value: String },
    #[error("row {row}: amount `{value}` is not a non-negative number")]
    InvalidAmount { row: usize, value: String },
}

/// Loads application summaries from a portal CSV export.
///
/// Expected headers: `id`, `ref`, `projectTitle`, `area`, `priority`,
/// `amountRequested`, `status`. Amounts may carry a currency symbol and
/// thousands separators.
pub struct ApplicationImporter;

impl ApplicationImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ApplicationSummary>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ApplicationSummary>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut applications = Vec::new();

        for (index, record) in csv_reader.deserialize::<ApplicationRow>().enumerate() {
            // Header is line 1.
            let row = index + 2;
            applications.push(record?.into_summary(row)?);
        }

        tracing::debug!(count = applications.len(), "imported applications");
        Ok(applications)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationRow {
    id: String,
    #[serde(rename = "ref", default)]
    reference: String,
    #[serde(default)]
    project_title: String,
    area: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    priority: Option<String>,
    amount_requested: String,
    status: String,
}

impl ApplicationRow {
    fn into_summary(self, row: usize) -> Result<ApplicationSummary, ImportError> {
        let status =
            ApplicationStatus::parse(&self.status).ok_or_else(|| ImportError::UnknownStatus {
                row,
                value: self.status.clone(),
            })?;
        let amount_requested =
            parse_amount(&self.amount_requested).ok_or_else(|| ImportError::InvalidAmount {
                row,
                value: self.amount_requested.clone(),
            })?;

        Ok(ApplicationSummary {
            id: ApplicationId(self.id),
            reference: self.reference,
            project_title: self.project_title,
            area: self.area,
            priority: self.priority,
            amount_requested,
            status,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '£' | '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Some(0.0);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}
