use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};

use crate::{
    Res, SpotiviewError, api,
    api::{CallbackState, ExchangeSettings},
};

pub const EXCHANGE_ROUTE: &str = "/api/exchange";

/// Router of the local redirect receiver, mounted at `callback_path`.
pub fn callback_router(callback_path: &str, state: Arc<CallbackState>) -> Router {
    let base = callback_path.trim_end_matches('/');
    let fragment_path = format!("{}/fragment", base);
    let callback_path = if base.is_empty() { "/" } else { base };

    Router::new()
        .route("/health", get(api::health))
        .route(callback_path, get(api::callback))
        .route(&fragment_path, get(api::fragment))
        .layer(Extension(state))
}

/// Router of the token exchange backend.
pub fn exchange_router(settings: Arc<ExchangeSettings>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(EXCHANGE_ROUTE, get(api::exchange))
        .layer(Extension(settings))
}

pub async fn start_callback_server(addr: &str, callback_path: &str, state: Arc<CallbackState>) -> Res<()> {
    serve(addr, callback_router(callback_path, state)).await
}

pub async fn start_exchange_server(addr: &str, settings: Arc<ExchangeSettings>) -> Res<()> {
    serve(addr, exchange_router(settings)).await
}

async fn serve(addr: &str, app: Router) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| SpotiviewError::Config(format!("Failed to parse server address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
