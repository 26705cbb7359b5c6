use std::sync::Arc;

use crate::{api::ExchangeSettings, config, error, info, server};

/// Runs the token exchange backend until the process is stopped.
pub async fn serve_exchange() {
    let settings = match ExchangeSettings::from_env() {
        Ok(s) => Arc::new(s),
        Err(e) => error!("Cannot start exchange backend. Err: {}", e),
    };

    let addr = config::exchange_server_addr();
    info!(
        "Token exchange backend listening on http://{}{}",
        addr,
        server::EXCHANGE_ROUTE
    );

    if let Err(e) = server::start_exchange_server(&addr, settings).await {
        error!("Exchange backend stopped. Err: {}", e);
    }
}
