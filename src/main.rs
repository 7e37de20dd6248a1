#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::router;
use crate::notes::RestorePolicy;
use crate::storage::setup;
use crate::storage::Storage;
use crate::tokens::JwtKeys;
use crate::utils::env_var_or_else;
use crate::utils::env_var_parse_or;

mod api;
mod graceful_shutdown;
mod notes;
mod password;
mod storage;
#[cfg(all(test, not(feature = "postgres")))]
mod tests;
mod tokens;
mod users;
mod utils;

const DEFAULT_RUST_LOG: &str = "jotted=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";

/// Days a soft-deleted note stays restorable when `RESTORE_WINDOW_DAYS` is not set
const DEFAULT_RESTORE_WINDOW_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app().await;

    let address = setup_address()?;
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Listening on {}", address);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
pub async fn setup_app() -> Router {
    let storage = setup().await;

    create_router(storage, setup_jwt_keys(), setup_restore_policy())
}

/// Create the router for Jotted
fn create_router<S: Storage>(
    storage: S,
    jwt_keys: JwtKeys,
    restore_policy: RestorePolicy,
) -> Router {
    Router::new()
        .nest("/api", router::<S>())
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(jwt_keys))
        .layer(Extension(restore_policy))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;
    use tracing_subscriber::EnvFilter;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_jwt_keys() -> JwtKeys {
    use crate::password::generate;

    let access_secret = env_var_or_else("ACCESS_SECRET", || {
        let access_secret = generate();
        tracing::info!("`ACCESS_SECRET` is not set, generating temporary one: {access_secret}");
        access_secret
    });

    let refresh_secret = env_var_or_else("REFRESH_SECRET", || {
        let refresh_secret = generate();
        tracing::info!("`REFRESH_SECRET` is not set, generating temporary one: {refresh_secret}");
        refresh_secret
    });

    JwtKeys::new(access_secret.as_bytes(), refresh_secret.as_bytes())
}

fn setup_restore_policy() -> RestorePolicy {
    let window_days = env_var_parse_or("RESTORE_WINDOW_DAYS", DEFAULT_RESTORE_WINDOW_DAYS);

    RestorePolicy::new(window_days)
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            let port = port.parse::<u16>()?;

            address.set_port(port);
        }
    }

    Ok(address)
}
