//! `campus-structure` -- print the academic structure visible to a user.
//!
//! Loads departments, courses, academic years and sections from the LMS
//! backend, scopes them to the configured role and prints the hierarchy as
//! an outline, followed by any consistency warnings.
//!
//! # Environment variables
//!
//! See [`ClientConfig::from_env`].

use campus_client::api::ApiService;
use campus_client::config::ClientConfig;
use campus_client::session::{ReloadStatus, StructureSession};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        api_url = %config.api_url,
        role = %config.user.role,
        college_id = config.user.college_id,
        department_id = config.user.department_id,
        "Starting campus-structure",
    );

    let api = ApiService::from_config(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    let mut session = StructureSession::new(api, config.user.clone());

    let cancel = session.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match session.reload().await {
        Ok(ReloadStatus::Applied) => {}
        Ok(ReloadStatus::Cancelled) => {
            tracing::warn!("Load interrupted");
            std::process::exit(130);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load academic structure");
            std::process::exit(1);
        }
    }

    if config.expand_all {
        session.expand_all();
    }
    print!("{}", session.render());

    for warning in session.integrity_warnings() {
        tracing::warn!(?warning, "Integrity warning");
    }
}
