//! The admission record model.
//!
//! A [`PatientRecord`] is one hospital admission episode: demographics,
//! admission/discharge dates, clinical narrative, and the coding fields a
//! medical coder fills in progressively (principal/secondary diagnoses,
//! procedures, DRG and weight figures).
//!
//! Records enter the system as a [`PatientInput`] — a partial document in
//! which every field is optional. Creation validates the required fields and
//! stamps identity and timestamps; updates merge the provided fields into an
//! existing record and re-validate. Both paths normalise text fields (trim;
//! empty becomes absent) so "missing" means the same thing everywhere
//! downstream: in status derivation, code counting, and department
//! classification.

use chrono::{DateTime, NaiveDate, Utc};
use hpr_uuid::RecordId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{HprError, HprResult};

/// Number of secondary diagnosis slots on a record.
pub const SECONDARY_DIAGNOSIS_SLOTS: usize = 12;
/// Number of procedure slots on a record.
pub const PROCEDURE_SLOTS: usize = 20;
/// Total code slots per record: one principal diagnosis plus the secondary
/// diagnosis and procedure slots.
pub const CODE_SLOTS: usize = 1 + SECONDARY_DIAGNOSIS_SLOTS + PROCEDURE_SLOTS;

/// Patient sex as recorded on admission.
///
/// The wire values mirror the admission form: both the single-letter and the
/// spelled-out variants are accepted and preserved as entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Sex {
    M,
    F,
    #[serde(rename = "male")]
    Male,
    #[serde(rename = "female")]
    Female,
    #[serde(rename = "other")]
    Other,
}

impl Sex {
    /// Parses a wire value, returning `None` for anything outside the
    /// admission-form vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "M" => Some(Sex::M),
            "F" => Some(Sex::F),
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            "other" => Some(Sex::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }
}

/// Where an admission sits in the coding workflow.
///
/// The three states partition every record:
/// - [`Completed`](RecordStatus::Completed) — discharge date present;
/// - [`InReview`](RecordStatus::InReview) — principal diagnosis present but
///   no discharge date yet;
/// - [`Pending`](RecordStatus::Pending) — neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Completed,
    InReview,
    Pending,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordStatus::Completed => "completed",
            RecordStatus::InReview => "in_review",
            RecordStatus::Pending => "pending",
        };
        write!(f, "{s}")
    }
}

/// One hospital admission episode, as stored and served.
///
/// Field names are the wire/document names. `id`, `createdAt` and
/// `updatedAt` are server-assigned; everything else comes from intake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRecord {
    /// Server-assigned canonical identifier.
    #[schema(value_type = String)]
    pub id: RecordId,

    /// Admission number, unique across the collection.
    #[serde(rename = "AN")]
    pub an: String,
    pub name: String,
    pub dob: NaiveDate,
    pub sex: Sex,

    pub dateadm: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeadm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datedsc: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timedsc: Option<String>,

    /// Age in whole years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Age in days, used for infants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ageday: Option<u32>,

    // Clinical narrative. Free text throughout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_examine: Option<String>,

    // Vital signs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_admit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_plan: Option<String>,

    /// Principal diagnosis code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx7: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx8: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx9: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx10: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx11: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdx12: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc6: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc7: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc8: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc9: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc10: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc11: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc12: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc13: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc14: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc15: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc16: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc17: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc18: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc19: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proc20: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drg: Option<String>,
    /// DRG relative weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rw: Option<f64>,
    /// Weight-adjusted length of stay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wtlos: Option<f64>,
    /// Adjusted relative weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjrw: Option<f64>,
    /// Length of stay in whole days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lengthofstay: Option<i64>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A partial admission document, as posted by clients.
///
/// Used for both creation and merge-updates. Every field is optional; on
/// update, absent fields are left unchanged. Optional text fields set to an
/// empty (or all-whitespace) string are cleared.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct PatientInput {
    #[serde(rename = "AN")]
    pub an: Option<String>,
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub sex: Option<String>,
    pub dateadm: Option<NaiveDate>,
    pub timeadm: Option<String>,
    pub datedsc: Option<NaiveDate>,
    pub timedsc: Option<String>,
    pub age: Option<u32>,
    pub ageday: Option<u32>,
    pub cc: Option<String>,
    pub pi: Option<String>,
    pub ph: Option<String>,
    pub fh: Option<String>,
    pub patient_examine: Option<String>,
    pub bt: Option<String>,
    pub pr: Option<String>,
    pub rr: Option<String>,
    pub bp: Option<String>,
    pub o2: Option<String>,
    pub pre_diagnosis: Option<String>,
    pub reason_for_admit: Option<String>,
    pub treatment_plan: Option<String>,
    pub pdx: Option<String>,
    pub sdx1: Option<String>,
    pub sdx2: Option<String>,
    pub sdx3: Option<String>,
    pub sdx4: Option<String>,
    pub sdx5: Option<String>,
    pub sdx6: Option<String>,
    pub sdx7: Option<String>,
    pub sdx8: Option<String>,
    pub sdx9: Option<String>,
    pub sdx10: Option<String>,
    pub sdx11: Option<String>,
    pub sdx12: Option<String>,
    pub proc1: Option<String>,
    pub proc2: Option<String>,
    pub proc3: Option<String>,
    pub proc4: Option<String>,
    pub proc5: Option<String>,
    pub proc6: Option<String>,
    pub proc7: Option<String>,
    pub proc8: Option<String>,
    pub proc9: Option<String>,
    pub proc10: Option<String>,
    pub proc11: Option<String>,
    pub proc12: Option<String>,
    pub proc13: Option<String>,
    pub proc14: Option<String>,
    pub proc15: Option<String>,
    pub proc16: Option<String>,
    pub proc17: Option<String>,
    pub proc18: Option<String>,
    pub proc19: Option<String>,
    pub proc20: Option<String>,
    pub drg: Option<String>,
    pub rw: Option<f64>,
    pub wtlos: Option<f64>,
    pub adjrw: Option<f64>,
    pub lengthofstay: Option<i64>,
}

/// Trims a provided text value; empty becomes absent.
fn normalize_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Validates a required text field, pushing `message` if missing or blank.
fn required_text(value: Option<String>, message: &str, errors: &mut Vec<String>) -> Option<String> {
    match value.and_then(normalize_text) {
        Some(v) => Some(v),
        None => {
            errors.push(message.to_owned());
            None
        }
    }
}

// Merge helpers for the repetitive optional-text fields. Empty input clears
// the field; absent input leaves it untouched.
macro_rules! merge_text_fields {
    ($record:ident, $input:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $input.$field {
                $record.$field = normalize_text(v);
            }
        )+
    };
}

macro_rules! merge_value_fields {
    ($record:ident, $input:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $input.$field {
                $record.$field = Some(v);
            }
        )+
    };
}

impl PatientRecord {
    /// Builds a new record from an intake document.
    ///
    /// Validates the required fields (`name`, `AN`, `dob`, `sex`, `dateadm`)
    /// and the sex vocabulary, collecting every failure into one
    /// [`HprError::Validation`]. Text fields are normalised; the length of
    /// stay is derived when both admission and discharge dates are present
    /// and no explicit value was supplied.
    pub fn from_input(id: RecordId, input: PatientInput, now: DateTime<Utc>) -> HprResult<Self> {
        let mut errors = Vec::new();

        let name = required_text(input.name, "Please provide patient name", &mut errors);
        let an = required_text(input.an, "Please provide AN (Admission Number)", &mut errors);

        let dob = input.dob;
        if dob.is_none() {
            errors.push("Please provide date of birth".to_owned());
        }

        let sex = match input.sex.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push("Please provide sex".to_owned());
                None
            }
            Some(raw) => match Sex::parse(raw) {
                Some(sex) => Some(sex),
                None => {
                    errors.push(format!("`{raw}` is not a valid enum value for sex"));
                    None
                }
            },
        };

        let dateadm = input.dateadm;
        if dateadm.is_none() {
            errors.push("Please provide admission date".to_owned());
        }

        if !errors.is_empty() {
            return Err(HprError::Validation(errors));
        }

        let mut record = Self {
            id,
            an: an.expect("validated above"),
            name: name.expect("validated above"),
            dob: dob.expect("validated above"),
            sex: sex.expect("validated above"),
            dateadm: dateadm.expect("validated above"),
            timeadm: input.timeadm.and_then(normalize_text),
            datedsc: input.datedsc,
            timedsc: input.timedsc.and_then(normalize_text),
            age: input.age,
            ageday: input.ageday,
            cc: input.cc.and_then(normalize_text),
            pi: input.pi.and_then(normalize_text),
            ph: input.ph.and_then(normalize_text),
            fh: input.fh.and_then(normalize_text),
            patient_examine: input.patient_examine.and_then(normalize_text),
            bt: input.bt.and_then(normalize_text),
            pr: input.pr.and_then(normalize_text),
            rr: input.rr.and_then(normalize_text),
            bp: input.bp.and_then(normalize_text),
            o2: input.o2.and_then(normalize_text),
            pre_diagnosis: input.pre_diagnosis.and_then(normalize_text),
            reason_for_admit: input.reason_for_admit.and_then(normalize_text),
            treatment_plan: input.treatment_plan.and_then(normalize_text),
            pdx: input.pdx.and_then(normalize_text),
            sdx1: input.sdx1.and_then(normalize_text),
            sdx2: input.sdx2.and_then(normalize_text),
            sdx3: input.sdx3.and_then(normalize_text),
            sdx4: input.sdx4.and_then(normalize_text),
            sdx5: input.sdx5.and_then(normalize_text),
            sdx6: input.sdx6.and_then(normalize_text),
            sdx7: input.sdx7.and_then(normalize_text),
            sdx8: input.sdx8.and_then(normalize_text),
            sdx9: input.sdx9.and_then(normalize_text),
            sdx10: input.sdx10.and_then(normalize_text),
            sdx11: input.sdx11.and_then(normalize_text),
            sdx12: input.sdx12.and_then(normalize_text),
            proc1: input.proc1.and_then(normalize_text),
            proc2: input.proc2.and_then(normalize_text),
            proc3: input.proc3.and_then(normalize_text),
            proc4: input.proc4.and_then(normalize_text),
            proc5: input.proc5.and_then(normalize_text),
            proc6: input.proc6.and_then(normalize_text),
            proc7: input.proc7.and_then(normalize_text),
            proc8: input.proc8.and_then(normalize_text),
            proc9: input.proc9.and_then(normalize_text),
            proc10: input.proc10.and_then(normalize_text),
            proc11: input.proc11.and_then(normalize_text),
            proc12: input.proc12.and_then(normalize_text),
            proc13: input.proc13.and_then(normalize_text),
            proc14: input.proc14.and_then(normalize_text),
            proc15: input.proc15.and_then(normalize_text),
            proc16: input.proc16.and_then(normalize_text),
            proc17: input.proc17.and_then(normalize_text),
            proc18: input.proc18.and_then(normalize_text),
            proc19: input.proc19.and_then(normalize_text),
            proc20: input.proc20.and_then(normalize_text),
            drg: input.drg.and_then(normalize_text),
            rw: input.rw,
            wtlos: input.wtlos,
            adjrw: input.adjrw,
            lengthofstay: input.lengthofstay,
            created_at: now,
            updated_at: now,
        };

        record.derive_length_of_stay();
        Ok(record)
    }

    /// Merges a partial document into this record.
    ///
    /// Only the provided fields change. Required fields may be replaced but
    /// not blanked: a provided-but-empty `name` or `AN`, or an invalid sex
    /// value, fails validation. The length of stay is re-derived afterwards
    /// if still unset, and `updatedAt` is bumped.
    pub fn apply(&mut self, input: PatientInput, now: DateTime<Utc>) -> HprResult<()> {
        let mut errors = Vec::new();

        let name = match input.name {
            Some(v) => match normalize_text(v) {
                Some(v) => Some(v),
                None => {
                    errors.push("Please provide patient name".to_owned());
                    None
                }
            },
            None => None,
        };
        let an = match input.an {
            Some(v) => match normalize_text(v) {
                Some(v) => Some(v),
                None => {
                    errors.push("Please provide AN (Admission Number)".to_owned());
                    None
                }
            },
            None => None,
        };
        let sex = match input.sex.as_deref().map(str::trim) {
            None => None,
            Some("") => {
                errors.push("Please provide sex".to_owned());
                None
            }
            Some(raw) => match Sex::parse(raw) {
                Some(sex) => Some(sex),
                None => {
                    errors.push(format!("`{raw}` is not a valid enum value for sex"));
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(HprError::Validation(errors));
        }

        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = an {
            self.an = v;
        }
        if let Some(v) = sex {
            self.sex = v;
        }
        if let Some(v) = input.dob {
            self.dob = v;
        }
        if let Some(v) = input.dateadm {
            self.dateadm = v;
        }

        merge_value_fields!(
            self, input, datedsc, age, ageday, rw, wtlos, adjrw, lengthofstay
        );
        merge_text_fields!(
            self, input, timeadm, timedsc, cc, pi, ph, fh, patient_examine, bt, pr, rr, bp, o2,
            pre_diagnosis, reason_for_admit, treatment_plan, pdx, sdx1, sdx2, sdx3, sdx4, sdx5,
            sdx6, sdx7, sdx8, sdx9, sdx10, sdx11, sdx12, proc1, proc2, proc3, proc4, proc5, proc6,
            proc7, proc8, proc9, proc10, proc11, proc12, proc13, proc14, proc15, proc16, proc17,
            proc18, proc19, proc20, drg
        );

        self.derive_length_of_stay();
        self.updated_at = now;
        Ok(())
    }

    /// Fills `lengthofstay` from the admission and discharge dates when it
    /// was not supplied explicitly.
    pub fn derive_length_of_stay(&mut self) {
        if self.lengthofstay.is_none() {
            if let Some(datedsc) = self.datedsc {
                self.lengthofstay = Some((datedsc - self.dateadm).num_days().abs());
            }
        }
    }

    /// True when the principal diagnosis carries a non-empty code.
    pub fn has_principal_diagnosis(&self) -> bool {
        self.pdx
            .as_deref()
            .map_or(false, |p| !p.trim().is_empty())
    }

    /// Workflow status derived from the discharge/coding state.
    pub fn status(&self) -> RecordStatus {
        if self.datedsc.is_some() {
            RecordStatus::Completed
        } else if self.has_principal_diagnosis() {
            RecordStatus::InReview
        } else {
            RecordStatus::Pending
        }
    }

    /// The secondary diagnosis slots in order.
    pub fn secondary_diagnoses(&self) -> [Option<&str>; SECONDARY_DIAGNOSIS_SLOTS] {
        [
            self.sdx1.as_deref(),
            self.sdx2.as_deref(),
            self.sdx3.as_deref(),
            self.sdx4.as_deref(),
            self.sdx5.as_deref(),
            self.sdx6.as_deref(),
            self.sdx7.as_deref(),
            self.sdx8.as_deref(),
            self.sdx9.as_deref(),
            self.sdx10.as_deref(),
            self.sdx11.as_deref(),
            self.sdx12.as_deref(),
        ]
    }

    /// The procedure slots in order.
    pub fn procedures(&self) -> [Option<&str>; PROCEDURE_SLOTS] {
        [
            self.proc1.as_deref(),
            self.proc2.as_deref(),
            self.proc3.as_deref(),
            self.proc4.as_deref(),
            self.proc5.as_deref(),
            self.proc6.as_deref(),
            self.proc7.as_deref(),
            self.proc8.as_deref(),
            self.proc9.as_deref(),
            self.proc10.as_deref(),
            self.proc11.as_deref(),
            self.proc12.as_deref(),
            self.proc13.as_deref(),
            self.proc14.as_deref(),
            self.proc15.as_deref(),
            self.proc16.as_deref(),
            self.proc17.as_deref(),
            self.proc18.as_deref(),
            self.proc19.as_deref(),
            self.proc20.as_deref(),
        ]
    }

    /// Every non-empty code on the record: principal diagnosis, then
    /// secondary diagnoses, then procedures.
    pub fn code_slots(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.pdx.as_deref())
            .chain(self.secondary_diagnoses())
            .chain(self.procedures())
            .flatten()
            .filter(|code| !code.trim().is_empty())
    }

    /// Number of filled code slots.
    pub fn code_count(&self) -> usize {
        self.code_slots().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 20, 12, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn minimal_input(an: &str) -> PatientInput {
        PatientInput {
            an: Some(an.to_owned()),
            name: Some("Test Patient".to_owned()),
            dob: Some(date(1980, 5, 1)),
            sex: Some("M".to_owned()),
            dateadm: Some(date(2024, 2, 10)),
            ..Default::default()
        }
    }

    #[test]
    fn from_input_collects_every_missing_required_field() {
        let err = PatientRecord::from_input(RecordId::new(), PatientInput::default(), now())
            .expect_err("empty input should fail validation");

        match err {
            HprError::Validation(messages) => {
                assert_eq!(
                    messages,
                    vec![
                        "Please provide patient name",
                        "Please provide AN (Admission Number)",
                        "Please provide date of birth",
                        "Please provide sex",
                        "Please provide admission date",
                    ]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn from_input_rejects_unknown_sex_value() {
        let mut input = minimal_input("AN0001");
        input.sex = Some("unknown".to_owned());

        let err = PatientRecord::from_input(RecordId::new(), input, now())
            .expect_err("invalid sex should fail validation");
        match err {
            HprError::Validation(messages) => {
                assert_eq!(messages, vec!["`unknown` is not a valid enum value for sex"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn from_input_normalizes_text_fields() {
        let mut input = minimal_input("  AN0001  ");
        input.cc = Some("  chest pain ".to_owned());
        input.pdx = Some("   ".to_owned());

        let record = PatientRecord::from_input(RecordId::new(), input, now()).unwrap();
        assert_eq!(record.an, "AN0001");
        assert_eq!(record.cc.as_deref(), Some("chest pain"));
        assert_eq!(record.pdx, None, "blank pdx should be absent");
    }

    #[test]
    fn length_of_stay_is_derived_from_dates_when_absent() {
        let mut input = minimal_input("AN0001");
        input.datedsc = Some(date(2024, 2, 14));

        let record = PatientRecord::from_input(RecordId::new(), input, now()).unwrap();
        assert_eq!(record.lengthofstay, Some(4));
    }

    #[test]
    fn explicit_length_of_stay_is_preserved() {
        let mut input = minimal_input("AN0001");
        input.datedsc = Some(date(2024, 2, 14));
        input.lengthofstay = Some(9);

        let record = PatientRecord::from_input(RecordId::new(), input, now()).unwrap();
        assert_eq!(record.lengthofstay, Some(9));
    }

    #[test]
    fn status_partition_is_exclusive_and_exhaustive() {
        let base = PatientRecord::from_input(RecordId::new(), minimal_input("AN0001"), now()).unwrap();

        let mut pending = base.clone();
        pending.datedsc = None;
        pending.pdx = None;
        assert_eq!(pending.status(), RecordStatus::Pending);

        let mut in_review = base.clone();
        in_review.datedsc = None;
        in_review.pdx = Some("I21.9".to_owned());
        assert_eq!(in_review.status(), RecordStatus::InReview);

        let mut completed = base.clone();
        completed.datedsc = Some(date(2024, 2, 14));
        completed.pdx = None;
        assert_eq!(completed.status(), RecordStatus::Completed);

        // Discharge wins even when coding is present.
        let mut both = base;
        both.datedsc = Some(date(2024, 2, 14));
        both.pdx = Some("I21.9".to_owned());
        assert_eq!(both.status(), RecordStatus::Completed);
    }

    #[test]
    fn code_count_ignores_empty_slots() {
        let mut input = minimal_input("AN0001");
        input.pdx = Some("I21.9".to_owned());
        input.sdx1 = Some("E11.9".to_owned());
        input.sdx2 = Some("I10".to_owned());
        input.proc1 = Some("02703DZ".to_owned());
        input.proc2 = Some("".to_owned());

        let record = PatientRecord::from_input(RecordId::new(), input, now()).unwrap();
        assert_eq!(record.code_count(), 4);

        let empty = PatientRecord::from_input(RecordId::new(), minimal_input("AN0002"), now()).unwrap();
        assert_eq!(empty.code_count(), 0);
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let mut record =
            PatientRecord::from_input(RecordId::new(), minimal_input("AN0001"), now()).unwrap();
        let created = record.created_at;

        let patch = PatientInput {
            pdx: Some("J18.9".to_owned()),
            drg: Some("195".to_owned()),
            rw: Some(0.8234),
            ..Default::default()
        };
        let later = now() + chrono::Duration::hours(2);
        record.apply(patch, later).unwrap();

        assert_eq!(record.name, "Test Patient");
        assert_eq!(record.pdx.as_deref(), Some("J18.9"));
        assert_eq!(record.drg.as_deref(), Some("195"));
        assert_eq!(record.rw, Some(0.8234));
        assert_eq!(record.created_at, created);
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn apply_rejects_blanked_required_fields() {
        let mut record =
            PatientRecord::from_input(RecordId::new(), minimal_input("AN0001"), now()).unwrap();

        let patch = PatientInput {
            name: Some("   ".to_owned()),
            ..Default::default()
        };
        let err = record.apply(patch, now()).expect_err("blank name should fail");
        assert!(matches!(err, HprError::Validation(_)));
        assert_eq!(record.name, "Test Patient", "record should be unchanged");
    }

    #[test]
    fn apply_clears_optional_text_on_empty_input() {
        let mut input = minimal_input("AN0001");
        input.cc = Some("chest pain".to_owned());
        let mut record = PatientRecord::from_input(RecordId::new(), input, now()).unwrap();

        let patch = PatientInput {
            cc: Some("".to_owned()),
            ..Default::default()
        };
        record.apply(patch, now()).unwrap();
        assert_eq!(record.cc, None);
    }

    #[test]
    fn apply_derives_length_of_stay_once_discharged() {
        let mut record =
            PatientRecord::from_input(RecordId::new(), minimal_input("AN0001"), now()).unwrap();
        assert_eq!(record.lengthofstay, None);

        let patch = PatientInput {
            datedsc: Some(date(2024, 2, 13)),
            ..Default::default()
        };
        record.apply(patch, now()).unwrap();
        assert_eq!(record.lengthofstay, Some(3));
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record =
            PatientRecord::from_input(RecordId::new(), minimal_input("AN0001"), now()).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("AN").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("an").is_none());
        // Absent optionals are omitted entirely.
        assert!(value.get("pdx").is_none());
    }
}
