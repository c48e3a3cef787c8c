//! Real-time report and metrics fan-out server.
//!
//! Dashboards connect to `/ws/reports` with a bearer token and receive report
//! events and metrics for the rooms their role grants.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=... cargo run --bin reportcast-server
//! cargo run --bin reportcast-server -- --host 0.0.0.0 --port 3000 --database-url postgres://...
//! ```

use std::sync::Arc;

use clap::Parser;
use reportcast_server::{
    config::ServerConfig,
    domain::{ReportStore, UserStore},
    infrastructure::{
        credential::JwtCredentialVerifier,
        repository::{
            InMemoryReportStore, InMemoryUserStore, PostgresReportStore, PostgresUserStore,
        },
    },
    ui::{
        Server,
        state::{AppState, Dependencies},
    },
};
use reportcast_shared::{logger::setup_logger, time::SystemClock};
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    tracing::debug!("Loaded {:?}", config);

    // Initialize dependencies in order:
    // 1. Stores
    // 2. Credential verifier
    // 3. AppState (registry + use cases)
    // 4. Server

    // 1. Stores
    let (reports, users): (Arc<dyn ReportStore>, Arc<dyn UserStore>) = match &config.database_url
    {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
            tracing::info!("Connected to PostgreSQL");
            (
                Arc::new(PostgresReportStore::new(pool.clone())),
                Arc::new(PostgresUserStore::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using empty in-memory stores");
            (
                Arc::new(InMemoryReportStore::new()),
                Arc::new(InMemoryUserStore::new()),
            )
        }
    };

    // 2. Credential verifier
    let verifier = Arc::new(JwtCredentialVerifier::new(&config.jwt_secret));

    // 3. AppState
    let state = AppState::new(Dependencies {
        verifier,
        users,
        reports,
        clock: Arc::new(SystemClock),
        utc_offset: config.utc_offset()?,
        page_limit: config.request_page_limit,
    });

    // 4. Create and run the server
    Server::new(state).run(&config.host, config.port).await
}
