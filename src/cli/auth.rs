use std::{sync::Arc, time::Duration};

use crate::{
    Res,
    api::CallbackState,
    config, error, info,
    management::{FileTokenStore, TokenStore},
    server,
    spotify::auth::{self, AuthConfig, CallbackOutcome, Redirect, RedirectStrategy},
    success, warning,
};

const MAX_WAIT: Duration = Duration::from_secs(120);

/// Logs the user in with the flow configured for this deployment.
///
/// With `redirect` set, the given redirect URL (copied from the browser's
/// address bar) is processed directly. Otherwise the login page is opened in
/// the browser and a local receiver waits for the provider's redirect.
///
/// A token that is already stored is kept; nothing is processed.
pub async fn auth(redirect: Option<String>) {
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new());
    if store.read_token().await.is_some() {
        info!("Already logged in. Run spotiview logout to switch accounts.");
        return;
    }

    let auth_config = match AuthConfig::from_env() {
        Ok(c) => c,
        Err(e) => error!("Cannot start login. Err: {}", e),
    };
    let strategy: Arc<dyn RedirectStrategy> = match auth::strategy_for(&auth_config) {
        Ok(s) => Arc::from(s),
        Err(e) => error!("Cannot start login. Err: {}", e),
    };

    if let Some(redirect_url) = redirect {
        let redirect = match Redirect::parse(&redirect_url) {
            Ok(r) => r,
            Err(e) => error!("{}", e),
        };
        report(auth::handle_redirect(store.as_ref(), strategy.as_ref(), Some(&redirect)).await);
        return;
    }

    let callback_path = match url::Url::parse(&auth_config.redirect_uri) {
        Ok(u) => u.path().to_string(),
        Err(e) => error!("Invalid redirect URI {}: {}", auth_config.redirect_uri, e),
    };

    let state = Arc::new(CallbackState::new(Arc::clone(&store), Arc::clone(&strategy)));
    let server_state = Arc::clone(&state);
    let addr = config::server_addr();
    tokio::spawn(async move {
        if let Err(e) = server::start_callback_server(&addr, &callback_path, server_state).await {
            warning!("Redirect receiver stopped. Err: {}", e);
        }
    });

    let auth_url = auth::build_auth_url(&auth_config, auth_config.flow);
    info!("Opening the Spotify login page ({} flow)...", auth_config.flow);
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_outcome(&state).await {
        Some(outcome) => report(outcome),
        None => error!("Authentication failed or timed out."),
    }
}

/// Forgets the stored access token.
pub async fn logout() {
    match FileTokenStore::new().clear_token().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to remove token. Err: {}", e),
    }
}

async fn wait_for_outcome(state: &CallbackState) -> Option<Res<CallbackOutcome>> {
    let start = tokio::time::Instant::now();

    while start.elapsed() < MAX_WAIT {
        if let Some(outcome) = state.take_outcome().await {
            return Some(outcome);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

fn report(outcome: Res<CallbackOutcome>) {
    match outcome {
        Ok(CallbackOutcome::Authenticated(_)) => success!("Authentication successful!"),
        Ok(CallbackOutcome::ExistingSession(_)) => info!("Already logged in."),
        Ok(CallbackOutcome::NoRedirect) => {
            error!("Authorization denied: the redirect carried no credentials.")
        }
        Err(e) => error!("{}", e),
    }
}
