//! Job posting records and the import row layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Number of ordered string fields in one import row.
pub const IMPORT_FIELD_COUNT: usize = 10;

/// Zero-based column holding the free-text location.
pub const LOCATION_COLUMN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    Hourly,
    Salary,
    /// Anything else, kept verbatim so imported values survive a round trip.
    Other(String),
}

impl SalaryType {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hourly" => SalaryType::Hourly,
            "salary" | "yearly" => SalaryType::Salary,
            _ => SalaryType::Other(raw.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SalaryType::Hourly => "hourly",
            SalaryType::Salary => "salary",
            SalaryType::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for SalaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One job posting as persisted in the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub company_name: String,
    pub posting_date: String,
    pub job_id: String,
    pub country: String,
    pub location: String,
    pub publication_date: String,
    pub salary_max: String,
    pub salary_min: String,
    pub salary_type: SalaryType,
    pub job_title: String,
}

/// The user-editable part of a [`JobRecord`].
///
/// The identifier and the two date stamps are owned by the store. A
/// `salary_type` of `None` is stored as empty text on create and keeps the
/// current value on update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobFields {
    pub company_name: String,
    pub country: String,
    pub location: String,
    pub salary_max: String,
    pub salary_min: String,
    pub salary_type: Option<SalaryType>,
    pub job_title: String,
}

impl JobRecord {
    /// Build a record from one import row.
    ///
    /// Column order: company, posting date, job id, country, location,
    /// publication date, salary max, salary min, salary type, title.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FieldCount`] if the row does not have exactly
    /// [`IMPORT_FIELD_COUNT`] fields.
    pub fn from_import_row(row: &[String]) -> Result<Self, CoreError> {
        let [
            company_name,
            posting_date,
            job_id,
            country,
            location,
            publication_date,
            salary_max,
            salary_min,
            salary_type,
            job_title,
        ] = row
        else {
            return Err(CoreError::FieldCount {
                expected: IMPORT_FIELD_COUNT,
                found: row.len(),
            });
        };

        Ok(Self {
            company_name: company_name.clone(),
            posting_date: posting_date.clone(),
            job_id: job_id.clone(),
            country: country.clone(),
            location: location.clone(),
            publication_date: publication_date.clone(),
            salary_max: salary_max.clone(),
            salary_min: salary_min.clone(),
            salary_type: SalaryType::parse(salary_type),
            job_title: job_title.clone(),
        })
    }

    /// Build a record for a user save, stamping the posting date
    /// (`YYYY-MM-DD`) and the publication time (Unix seconds) from `now`.
    #[must_use]
    pub fn stamped(job_id: String, fields: JobFields, now: DateTime<Utc>) -> Self {
        Self {
            company_name: fields.company_name,
            posting_date: now.format("%Y-%m-%d").to_string(),
            job_id,
            country: fields.country,
            location: fields.location,
            publication_date: now.timestamp().to_string(),
            salary_max: fields.salary_max,
            salary_min: fields.salary_min,
            // Re-parse so a hand-built `Other("hourly")` is stored the same
            // way it will be read back.
            salary_type: fields.salary_type.map_or_else(
                || SalaryType::Other(String::new()),
                |t| SalaryType::parse(t.as_str()),
            ),
            job_title: fields.job_title,
        }
    }

    /// The editable fields of this record, as a form would be prefilled.
    #[must_use]
    pub fn fields(&self) -> JobFields {
        JobFields {
            company_name: self.company_name.clone(),
            country: self.country.clone(),
            location: self.location.clone(),
            salary_max: self.salary_max.clone(),
            salary_min: self.salary_min.clone(),
            salary_type: Some(self.salary_type.clone()),
            job_title: self.job_title.clone(),
        }
    }
}
