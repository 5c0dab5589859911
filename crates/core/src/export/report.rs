//! The paginated coding report.
//!
//! A tabular summary a coding supervisor prints or renders to PDF: a header
//! block taken from a precomputed [`StatsReport`], then one row per record
//! with its department, workflow status, and coding completeness, split into
//! fixed-size numbered pages.

use crate::record::{PatientRecord, RecordStatus, CODE_SLOTS};
use crate::stats::{self, StatsReport};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Report title, as shown in the rendered document header.
pub const REPORT_TITLE: &str = "Patient Coding Report";

/// Rows per rendered page.
pub const ROWS_PER_PAGE: usize = 25;

/// One record's line in the report table.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub patient_name: String,
    pub admission_number: String,
    /// The admission date.
    pub service_date: NaiveDate,
    pub department: String,
    pub status: RecordStatus,
    pub code_count: usize,
    /// Filled code slots as a percentage of the record's total slots.
    pub coding_completeness_pct: u32,
}

/// One numbered page of rows.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ReportPage {
    pub number: usize,
    pub rows: Vec<ReportRow>,
}

/// Header figures, carried over from the supplied statistics.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_records: u64,
    pub pending: u64,
    pub in_review: u64,
    pub completed: u64,
    pub avg_codes_per_record: f64,
}

/// The full report document.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodingReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub page_count: usize,
    pub pages: Vec<ReportPage>,
}

fn row_for(record: &PatientRecord) -> ReportRow {
    let code_count = record.code_count();
    ReportRow {
        patient_name: record.name.clone(),
        admission_number: record.an.clone(),
        service_date: record.dateadm,
        department: stats::department_for(record.pdx.as_deref()).to_string(),
        status: record.status(),
        code_count,
        coding_completeness_pct: (code_count as f64 / CODE_SLOTS as f64 * 100.0).round() as u32,
    }
}

impl CodingReport {
    /// Builds the report over `records`, using `stats` for the header block.
    ///
    /// Rows keep the order of the input slice and are split into pages of
    /// [`ROWS_PER_PAGE`]; an empty record set produces zero pages.
    pub fn build(records: &[PatientRecord], stats: &StatsReport, generated_at: DateTime<Utc>) -> Self {
        let rows: Vec<ReportRow> = records.iter().map(row_for).collect();

        let pages: Vec<ReportPage> = rows
            .chunks(ROWS_PER_PAGE)
            .enumerate()
            .map(|(i, chunk)| ReportPage {
                number: i + 1,
                rows: chunk.to_vec(),
            })
            .collect();

        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            summary: ReportSummary {
                total_records: stats.summary.total_patients,
                pending: stats.summary.pending_count,
                in_review: stats.summary.in_review_count,
                completed: stats.summary.completed_count,
                avg_codes_per_record: stats.codes.avg_codes_per_patient,
            },
            page_count: pages.len(),
            pages,
        }
    }

    /// Serializes the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
