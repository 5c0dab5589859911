//! # API REST
//!
//! REST API implementation for HPR.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Response envelopes and error mapping
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, request tracing)
//!
//! The router is built by [`app`] so integration tests can drive it without
//! binding a socket; the server binary lives in `src/main.rs`.

#![warn(rust_2018_idioms)]

pub mod envelope;
pub mod handlers;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hpr_core::PatientStore;

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request
/// handlers: the store handle opened once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PatientStore>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_patients,
        handlers::get_patient_by_id,
        handlers::get_patient_by_an,
        handlers::create_patient,
        handlers::update_patient,
        handlers::delete_patient,
        handlers::get_patient_stats,
        handlers::export_spreadsheet,
        handlers::export_report,
    ),
    components(schemas(
        envelope::HealthRes,
        envelope::ListRes,
        envelope::RecordRes,
        envelope::DeleteRes,
        envelope::StatsRes,
        envelope::ReportRes,
        envelope::ErrorRes,
        hpr_core::PatientRecord,
        hpr_core::PatientInput,
        hpr_core::Sex,
        hpr_core::RecordStatus,
        hpr_core::stats::StatsReport,
        hpr_core::stats::StatsSummary,
        hpr_core::stats::CodeStats,
        hpr_core::stats::DrgStat,
        hpr_core::stats::DepartmentStat,
        hpr_core::export::CodingReport,
        hpr_core::export::report::ReportSummary,
        hpr_core::export::ReportPage,
        hpr_core::export::ReportRow,
    ))
)]
struct ApiDoc;

/// Builds the application router over an opened store handle.
pub fn app(store: Arc<PatientStore>) -> Router {
    let state = AppState { store };

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/api/patients/stats/summary", get(handlers::get_patient_stats))
        .route(
            "/api/patients/export/spreadsheet",
            get(handlers::export_spreadsheet),
        )
        .route("/api/patients/export/report", get(handlers::export_report))
        .route("/api/patients/an/:an", get(handlers::get_patient_by_an))
        .route(
            "/api/patients/:id",
            get(handlers::get_patient_by_id)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
