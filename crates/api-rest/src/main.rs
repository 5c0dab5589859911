//! HPR REST API server binary.
//!
//! Opens the patient store once at startup and serves the REST API (with
//! OpenAPI/Swagger UI) on the configured address.

use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hpr_core::{CoreConfig, PatientStore, DEFAULT_PATIENT_DATA_DIR};

/// Main entry point for the HPR REST API server
///
/// # Environment Variables
/// - `HPR_REST_ADDR`: Server address (default: "0.0.0.0:5000")
/// - `PATIENT_DATA_DIR`: Directory for patient data storage (default: "./patient_data")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the patient store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("HPR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let patient_data_dir =
        std::env::var("PATIENT_DATA_DIR").unwrap_or_else(|_| DEFAULT_PATIENT_DATA_DIR.into());

    tracing::info!("-- Starting HPR REST API on {}", addr);
    tracing::info!("-- Patient data directory: {}", patient_data_dir);

    let cfg = CoreConfig::new(PathBuf::from(patient_data_dir));
    let store = Arc::new(PatientStore::open(&cfg)?);

    let app = api_rest::app(store);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
