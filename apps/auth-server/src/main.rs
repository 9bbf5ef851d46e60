//! # Sentra Auth Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&telemetry::TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Sentra auth server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;

    // The purge job lives on its own schedule, decoupled from request
    // handling. Keep the scheduler handle alive for the server's lifetime.
    #[cfg(feature = "scheduler")]
    let _scheduler = {
        let scheduler_config = background::SchedulerConfig::from_env();
        match background::start_purge_job(state.accounts.clone(), scheduler_config).await {
            Ok(scheduler) => Some(scheduler),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start purge scheduler");
                None
            }
        }
    };

    let tokens = state.tokens.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
