use crate::auth::SupabaseAuth;
use crate::config::AppConfig;
use crate::contracts::{ContractStore, MemoryContractStore, RestContractStore};
use crate::db::{init_db, Database};
use crate::payments::HttpPayments;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::state::AppState;
use astra::Server;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod contracts;
mod db;
mod domain;
mod errors;
mod payments;
mod responses;
mod router;
mod spreadsheets;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn build_state(config: AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let db = Database::new(config.database_path.clone());
    init_db(&db)?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let contracts: Box<dyn ContractStore> = if config.demo_contracts {
        tracing::info!("demo mode: serving sample contracts from memory");
        Box::new(MemoryContractStore::new(domain::fixtures::sample_contracts()))
    } else {
        Box::new(RestContractStore::new(&config.supabase, client.clone()))
    };

    Ok(AppState {
        db,
        auth: Box::new(SupabaseAuth::new(&config.supabase, client.clone())),
        payments: Box::new(HttpPayments::new(&config.stripe, &config.supabase, client)),
        contracts,
        config,
    })
}

fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("commission_desk=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let addr = config.bind_addr;
    let workers = config.max_workers;

    let app = match build_state(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            std::process::exit(1);
        }
    };

    if app.config.stripe.api_base == app.config.site_origin {
        tracing::warn!(
            api_base = %app.config.stripe.api_base,
            "PAYMENTS_API_BASE not set, payout calls go to this app's own origin"
        );
    }

    tracing::info!(%addr, workers, origin = %app.config.site_origin, "commission desk listening");

    let server = Server::bind(&addr).max_workers(workers);

    let result = server.serve(move |req: astra::Request, _info: astra::ConnectionInfo| {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let resp = match handle(req, &app) {
            Ok(resp) => resp,
            Err(err) => error_to_response(err),
        };

        tracing::info!(
            %method,
            %path,
            status = resp.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request"
        );
        resp
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}
