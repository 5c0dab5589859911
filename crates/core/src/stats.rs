//! The statistics aggregator.
//!
//! Produces a single summary over a set of admission records: workflow
//! counts, trailing-window admissions, present-only averages, code totals,
//! a top-10 DRG breakdown, and a department classification derived from the
//! principal diagnosis code.
//!
//! [`compute`] is a pure function of the record slice and an explicit
//! evaluation instant. Nothing here reads the clock, so the trailing-window
//! count is testable with a fixed `now` and the whole result is
//! deterministic for a given input.

use crate::record::PatientRecord;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Width of the "recent admissions" trailing window, in days.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// How many DRG groups the breakdown keeps.
pub const TOP_DRG_LIMIT: usize = 10;

/// Department classification rules, evaluated top to bottom against the
/// first character of the principal diagnosis code; first match wins.
/// Case-sensitive, ASCII only. Records with no principal diagnosis (or a
/// code starting with anything else) fall through to
/// [`DEFAULT_DEPARTMENT`].
pub const DEPARTMENT_RULES: &[(&[u8], &str)] = &[
    (b"JR", "Respiratory"),
    (b"I", "Cardiology"),
    (b"G", "Neurology"),
    (b"MS", "Orthopedics"),
];

/// Bucket for everything the rules above do not claim.
pub const DEFAULT_DEPARTMENT: &str = "General";

/// Classifies a principal diagnosis code into a department bucket.
pub fn department_for(pdx: Option<&str>) -> &'static str {
    if let Some(first) = pdx.and_then(|code| code.as_bytes().first()) {
        for (prefixes, label) in DEPARTMENT_RULES {
            if prefixes.contains(first) {
                return label;
            }
        }
    }
    DEFAULT_DEPARTMENT
}

/// The full aggregate served by the stats endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct StatsReport {
    pub summary: StatsSummary,
    pub codes: CodeStats,
    #[serde(rename = "topDRGs")]
    pub top_drgs: Vec<DrgStat>,
    pub departments: Vec<DepartmentStat>,
}

/// Collection-wide counts and averages.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub total_patients: u64,
    /// Records with a discharge date.
    pub completed_count: u64,
    /// Records with neither a discharge date nor a principal diagnosis.
    pub pending_count: u64,
    /// Records with a principal diagnosis but no discharge date.
    pub in_review_count: u64,
    /// Records admitted within the trailing window (inclusive lower bound).
    pub recent_admissions: u64,
    pub avg_length_of_stay: f64,
    pub avg_age: f64,
    #[serde(rename = "avgRW")]
    pub avg_rw: f64,
}

/// Totals over the diagnosis/procedure code slots.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeStats {
    pub total_codes: u64,
    pub avg_codes_per_patient: f64,
}

/// One DRG group in the top-N breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct DrgStat {
    pub drg: String,
    pub count: u64,
    #[serde(rename = "avgRW")]
    pub avg_rw: f64,
    #[serde(rename = "avgLOS")]
    pub avg_los: f64,
}

/// One department bucket.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct DepartmentStat {
    pub department: String,
    pub count: u64,
    /// Percentage of the bucket carrying any coding at all (principal
    /// diagnosis, first secondary diagnosis, or first procedure). A
    /// documentation-completeness measure, not a correctness one.
    #[serde(rename = "codedPct")]
    pub coded_pct: f64,
}

/// Mean over the present values; 0 when none are present.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0u64;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Computes the full aggregate over `records`, evaluated at `now`.
///
/// Absent numeric fields are excluded from both numerator and denominator of
/// every average. An empty slice yields all-zero numerics and empty
/// groupings — never NaN.
pub fn compute(records: &[PatientRecord], now: DateTime<Utc>) -> StatsReport {
    let total = records.len() as u64;

    let completed = records.iter().filter(|r| r.datedsc.is_some()).count() as u64;
    let in_review = records
        .iter()
        .filter(|r| r.datedsc.is_none() && r.has_principal_diagnosis())
        .count() as u64;
    let pending = records
        .iter()
        .filter(|r| r.datedsc.is_none() && !r.has_principal_diagnosis())
        .count() as u64;

    let recent_cutoff = (now - Duration::days(RECENT_WINDOW_DAYS)).date_naive();
    let recent = records.iter().filter(|r| r.dateadm >= recent_cutoff).count() as u64;

    let summary = StatsSummary {
        total_patients: total,
        completed_count: completed,
        pending_count: pending,
        in_review_count: in_review,
        recent_admissions: recent,
        avg_length_of_stay: mean(
            records
                .iter()
                .filter_map(|r| r.lengthofstay.map(|v| v as f64)),
        ),
        avg_age: mean(records.iter().filter_map(|r| r.age.map(f64::from))),
        avg_rw: mean(records.iter().filter_map(|r| r.rw)),
    };

    let total_codes: u64 = records.iter().map(|r| r.code_count() as u64).sum();
    let codes = CodeStats {
        total_codes,
        avg_codes_per_patient: if total == 0 {
            0.0
        } else {
            total_codes as f64 / total as f64
        },
    };

    StatsReport {
        summary,
        codes,
        top_drgs: top_drgs(records),
        departments: departments(records),
    }
}

/// Groups records by non-empty DRG code, keeping the most frequent
/// [`TOP_DRG_LIMIT`] groups. Ties are broken by DRG code so repeated runs
/// produce identical output.
fn top_drgs(records: &[PatientRecord]) -> Vec<DrgStat> {
    let mut groups: BTreeMap<&str, Vec<&PatientRecord>> = BTreeMap::new();
    for record in records {
        if let Some(drg) = record.drg.as_deref().filter(|d| !d.is_empty()) {
            groups.entry(drg).or_default().push(record);
        }
    }

    let mut stats: Vec<DrgStat> = groups
        .into_iter()
        .map(|(drg, members)| DrgStat {
            drg: drg.to_owned(),
            count: members.len() as u64,
            avg_rw: mean(members.iter().filter_map(|r| r.rw)),
            avg_los: mean(members.iter().filter_map(|r| r.lengthofstay.map(|v| v as f64))),
        })
        .collect();

    // BTreeMap iteration is code-ascending, so the stable sort keeps that
    // order within equal counts.
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(TOP_DRG_LIMIT);
    stats
}

/// Classifies every record into exactly one department bucket.
fn departments(records: &[PatientRecord]) -> Vec<DepartmentStat> {
    let mut buckets: BTreeMap<&'static str, (u64, u64)> = BTreeMap::new();
    for record in records {
        let department = department_for(record.pdx.as_deref());
        let has_codes = record.has_principal_diagnosis()
            || record.sdx1.as_deref().map_or(false, |c| !c.trim().is_empty())
            || record.proc1.as_deref().map_or(false, |c| !c.trim().is_empty());

        let entry = buckets.entry(department).or_insert((0, 0));
        entry.0 += 1;
        if has_codes {
            entry.1 += 1;
        }
    }

    let mut stats: Vec<DepartmentStat> = buckets
        .into_iter()
        .map(|(department, (count, with_codes))| DepartmentStat {
            department: department.to_owned(),
            count,
            coded_pct: with_codes as f64 / count as f64 * 100.0,
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}
