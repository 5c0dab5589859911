//! Spreadsheet export of the full record table.
//!
//! One row per admission, every flat document field in a fixed column
//! order — the same table a coder would pull into a worksheet. Missing
//! values render as empty cells.

use super::escape_csv;
use crate::record::PatientRecord;
use serde::Serialize;
use utoipa::ToSchema;

/// Worksheet name used by consumers that render a workbook.
pub const SHEET_NAME: &str = "Patient Records";

/// The fixed column ordering. This is the external contract: demographics,
/// admission dates, narrative, vitals, the principal diagnosis, all 12
/// secondary diagnosis slots, all 20 procedure slots, then the DRG block.
pub const SPREADSHEET_COLUMNS: [&str; 61] = [
    "AN",
    "name",
    "dob",
    "sex",
    "dateadm",
    "timeadm",
    "datedsc",
    "timedsc",
    "age",
    "ageday",
    "cc",
    "pi",
    "ph",
    "fh",
    "patient_examine",
    "bt",
    "pr",
    "rr",
    "bp",
    "o2",
    "pre_diagnosis",
    "reason_for_admit",
    "treatment_plan",
    "pdx",
    "sdx1",
    "sdx2",
    "sdx3",
    "sdx4",
    "sdx5",
    "sdx6",
    "sdx7",
    "sdx8",
    "sdx9",
    "sdx10",
    "sdx11",
    "sdx12",
    "proc1",
    "proc2",
    "proc3",
    "proc4",
    "proc5",
    "proc6",
    "proc7",
    "proc8",
    "proc9",
    "proc10",
    "proc11",
    "proc12",
    "proc13",
    "proc14",
    "proc15",
    "proc16",
    "proc17",
    "proc18",
    "proc19",
    "proc20",
    "drg",
    "rw",
    "wtlos",
    "adjrw",
    "lengthofstay",
];

/// A rendered worksheet: the column header plus one row of cells per record.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct SpreadsheetExport {
    pub sheet_name: String,
    pub rows: Vec<Vec<String>>,
}

fn cell_opt(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn cell_num<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row_for(record: &PatientRecord) -> Vec<String> {
    let mut row = Vec::with_capacity(SPREADSHEET_COLUMNS.len());
    row.push(record.an.clone());
    row.push(record.name.clone());
    row.push(record.dob.to_string());
    row.push(record.sex.as_str().to_string());
    row.push(record.dateadm.to_string());
    row.push(cell_opt(record.timeadm.as_deref()));
    row.push(cell_num(record.datedsc));
    row.push(cell_opt(record.timedsc.as_deref()));
    row.push(cell_num(record.age));
    row.push(cell_num(record.ageday));
    row.push(cell_opt(record.cc.as_deref()));
    row.push(cell_opt(record.pi.as_deref()));
    row.push(cell_opt(record.ph.as_deref()));
    row.push(cell_opt(record.fh.as_deref()));
    row.push(cell_opt(record.patient_examine.as_deref()));
    row.push(cell_opt(record.bt.as_deref()));
    row.push(cell_opt(record.pr.as_deref()));
    row.push(cell_opt(record.rr.as_deref()));
    row.push(cell_opt(record.bp.as_deref()));
    row.push(cell_opt(record.o2.as_deref()));
    row.push(cell_opt(record.pre_diagnosis.as_deref()));
    row.push(cell_opt(record.reason_for_admit.as_deref()));
    row.push(cell_opt(record.treatment_plan.as_deref()));
    row.push(cell_opt(record.pdx.as_deref()));
    for sdx in record.secondary_diagnoses() {
        row.push(cell_opt(sdx));
    }
    for proc in record.procedures() {
        row.push(cell_opt(proc));
    }
    row.push(cell_opt(record.drg.as_deref()));
    row.push(cell_num(record.rw));
    row.push(cell_num(record.wtlos));
    row.push(cell_num(record.adjrw));
    row.push(cell_num(record.lengthofstay));
    row
}

impl SpreadsheetExport {
    /// Builds the worksheet rows for the given records, in their given order.
    pub fn from_records(records: &[PatientRecord]) -> Self {
        Self {
            sheet_name: SHEET_NAME.to_string(),
            rows: records.iter().map(row_for).collect(),
        }
    }

    /// Renders the worksheet as CSV: the column header followed by one line
    /// per record.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str(&SPREADSHEET_COLUMNS.join(","));
        csv.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(|cell| escape_csv(cell)).collect();
            csv.push_str(&line.join(","));
            csv.push('\n');
        }
        csv
    }
}
