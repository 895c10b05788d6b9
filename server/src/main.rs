use std::sync::Arc;

mod auth;
mod config;
mod credentials;
mod database;
mod docs;
mod errors;
mod ledger;
mod log_requests;
mod logging;
mod registry;
mod routes;
mod scores;

use config::Config;
use credentials::PasswordHasher;
use database::Database;
use errors::StartupError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub hasher: PasswordHasher,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    tracing::info!("Scoreboard server starting...");

    let config = Config::from_env()?;
    let addr = config.bind_addr()?;

    let db = Database::new(&config.database_url).await?;
    db.initialize().await?;
    tracing::info!(database_url = %config.database_url, "database initialized");

    let hasher = PasswordHasher::new(config.hash_time_cost, config.hash_memory_kib)?;

    let state = AppState {
        db: Arc::new(db),
        hasher,
        config: Arc::new(config),
    };
    let tls = state.config.tls.clone();
    let app = routes::router(state);

    match tls {
        Some(tls) => {
            let rustls = axum_server::tls_rustls::RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            tracing::info!(%addr, "HTTPS server running");
            axum_server::bind_rustls(addr, rustls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "HTTP server running");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
