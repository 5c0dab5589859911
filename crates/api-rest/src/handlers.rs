//! Request handlers for the patient endpoints.

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

use hpr_core::export::{CodingReport, SpreadsheetExport};
use hpr_core::{stats, PatientInput, RecordFilter, RecordId};

use crate::envelope::{
    ApiError, DeleteRes, HealthRes, ListRes, RecordRes, ReportRes, StatsRes,
};
use crate::AppState;

/// Optional filters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Exact admission number.
    #[serde(rename = "AN")]
    pub an: Option<String>,
    /// Case-insensitive substring of the patient name.
    pub name: Option<String>,
    /// Exact principal diagnosis code.
    pub pdx: Option<String>,
    /// Exact DRG code.
    pub drg: Option<String>,
    /// Admitted on or after this date (`YYYY-MM-DD` or RFC 3339).
    pub dateadm: Option<String>,
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 instant.
fn parse_admission_date(raw: &str) -> Result<NaiveDate, ApiError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| ApiError::BadRequest(format!("Invalid dateadm filter: '{raw}'")))
}

fn parse_record_id(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::parse(raw).map_err(|_| ApiError::BadRequest("Invalid record id".to_owned()))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "HPR REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/patients",
    params(ListQuery),
    responses(
        (status = 200, description = "List of patient records", body = ListRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
/// List patient records, optionally filtered
///
/// All provided filters must match. The response carries no-cache headers so
/// intermediaries never serve a stale 304 for a collection that just changed.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = RecordFilter {
        an: query.an,
        name: query.name,
        pdx: query.pdx,
        drg: query.drg,
        admitted_on_or_after: query
            .dateadm
            .as_deref()
            .map(parse_admission_date)
            .transpose()?,
    };

    let records = state.store.list(&filter)?;

    Ok((
        [
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(ListRes {
            success: true,
            count: records.len(),
            data: records,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Patient record", body = RecordRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Fetch a single record by identifier
#[axum::debug_handler]
pub async fn get_patient_by_id(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<RecordRes>, ApiError> {
    let id = parse_record_id(&id)?;
    let record = state.store.fetch(&id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(RecordRes {
        success: true,
        data: record,
    }))
}

#[utoipa::path(
    get,
    path = "/api/patients/an/{an}",
    params(("an" = String, Path, description = "Admission number")),
    responses(
        (status = 200, description = "Patient record", body = RecordRes),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Fetch a single record by admission number
#[axum::debug_handler]
pub async fn get_patient_by_an(
    State(state): State<AppState>,
    AxumPath(an): AxumPath<String>,
) -> Result<Json<RecordRes>, ApiError> {
    let record = state.store.fetch_by_an(&an)?.ok_or(ApiError::NotFound)?;
    Ok(Json(RecordRes {
        success: true,
        data: record,
    }))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = PatientInput,
    responses(
        (status = 201, description = "Patient record created", body = RecordRes),
        (status = 400, description = "Validation failure or duplicate admission number"),
        (status = 500, description = "Internal server error")
    )
)]
/// Create a new admission record
///
/// Rejects a duplicate admission number and missing/invalid required fields
/// with per-field messages.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(input): Json<PatientInput>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.store.insert(input)?;
    Ok((
        StatusCode::CREATED,
        Json(RecordRes {
            success: true,
            data: record,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    request_body = PatientInput,
    responses(
        (status = 200, description = "Patient record updated", body = RecordRes),
        (status = 400, description = "Validation failure or duplicate admission number"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Merge-update an existing record
///
/// Only the provided fields change; the coding fields are typically filled
/// in over several updates as the coder works through the chart.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(input): Json<PatientInput>,
) -> Result<Json<RecordRes>, ApiError> {
    let id = parse_record_id(&id)?;
    let record = state.store.update(&id, input)?.ok_or(ApiError::NotFound)?;
    Ok(Json(RecordRes {
        success: true,
        data: record,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Patient record deleted", body = DeleteRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Delete a record
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DeleteRes>, ApiError> {
    let id = parse_record_id(&id)?;
    if !state.store.delete(&id)? {
        return Err(ApiError::NotFound);
    }
    Ok(Json(DeleteRes {
        success: true,
        message: "Patient deleted successfully".to_owned(),
        data: serde_json::json!({}),
    }))
}

#[utoipa::path(
    get,
    path = "/api/patients/stats/summary",
    responses(
        (status = 200, description = "Aggregate statistics", body = StatsRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Aggregate statistics over the whole collection
///
/// Either the complete summary is returned or the request fails; there are
/// no partial results.
#[axum::debug_handler]
pub async fn get_patient_stats(
    State(state): State<AppState>,
) -> Result<Json<StatsRes>, ApiError> {
    let records = state.store.list(&RecordFilter::default())?;
    let report = stats::compute(&records, Utc::now());
    Ok(Json(StatsRes {
        success: true,
        data: report,
    }))
}

#[utoipa::path(
    get,
    path = "/api/patients/export/spreadsheet",
    responses(
        (status = 200, description = "CSV worksheet of every record", body = String, content_type = "text/csv"),
        (status = 500, description = "Internal server error")
    )
)]
/// Export the full record table as CSV
#[axum::debug_handler]
pub async fn export_spreadsheet(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state.store.list(&RecordFilter::default())?;
    let csv = SpreadsheetExport::from_records(&records).to_csv();

    let disposition = format!(
        "attachment; filename=\"patient_records_{}.csv\"",
        Utc::now().date_naive()
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

#[utoipa::path(
    get,
    path = "/api/patients/export/report",
    responses(
        (status = 200, description = "Paginated coding report", body = ReportRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Export the paginated coding report
#[axum::debug_handler]
pub async fn export_report(
    State(state): State<AppState>,
) -> Result<Json<ReportRes>, ApiError> {
    let records = state.store.list(&RecordFilter::default())?;
    let now = Utc::now();
    let report = stats::compute(&records, now);
    Ok(Json(ReportRes {
        success: true,
        data: CodingReport::build(&records, &report, now),
    }))
}
