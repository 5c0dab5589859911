//! Response envelopes and error mapping.
//!
//! Every endpoint answers with the same envelope family: successes carry
//! `success: true` plus the payload (and a `count` on list responses);
//! failures carry `success: false` with a `message`, per-field `errors` for
//! validation failures, and the raw `error` description for server faults.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use hpr_core::export::CodingReport;
use hpr_core::{HprError, PatientRecord, StatsReport};
use serde::Serialize;
use utoipa::ToSchema;

/// Liveness envelope for `/health`.
#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Envelope for the list endpoint.
#[derive(Serialize, ToSchema)]
pub struct ListRes {
    pub success: bool,
    pub count: usize,
    pub data: Vec<PatientRecord>,
}

/// Envelope for single-record responses (fetch, create, update).
#[derive(Serialize, ToSchema)]
pub struct RecordRes {
    pub success: bool,
    pub data: PatientRecord,
}

/// Envelope for the delete endpoint; `data` is an empty object.
#[derive(Serialize, ToSchema)]
pub struct DeleteRes {
    pub success: bool,
    pub message: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Envelope for the statistics endpoint.
#[derive(Serialize, ToSchema)]
pub struct StatsRes {
    pub success: bool,
    pub data: StatsReport,
}

/// Envelope for the coding-report export.
#[derive(Serialize, ToSchema)]
pub struct ReportRes {
    pub success: bool,
    pub data: CodingReport,
}

/// Failure envelope shared by every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorRes {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a handler can fail with, mapped onto the envelope taxonomy.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with per-field messages.
    Validation(Vec<String>),
    /// 400, admission number already taken.
    DuplicateAn,
    /// 404.
    NotFound,
    /// 400 with a specific message (malformed id or filter).
    BadRequest(String),
    /// 500 with the underlying description.
    Internal(String),
}

impl From<HprError> for ApiError {
    fn from(err: HprError) -> Self {
        match err {
            HprError::Validation(messages) => ApiError::Validation(messages),
            HprError::DuplicateAn => ApiError::DuplicateAn,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    success: false,
                    message: "Validation Error".to_owned(),
                    errors: Some(errors),
                    error: None,
                },
            ),
            ApiError::DuplicateAn => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    success: false,
                    message: "AN (Admission Number) already exists".to_owned(),
                    errors: None,
                    error: None,
                },
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorRes {
                    success: false,
                    message: "Patient not found".to_owned(),
                    errors: None,
                    error: None,
                },
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    success: false,
                    message,
                    errors: None,
                    error: None,
                },
            ),
            ApiError::Internal(description) => {
                tracing::error!("request failed: {description}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorRes {
                        success: false,
                        message: "Server Error".to_owned(),
                        errors: None,
                        error: Some(description),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
