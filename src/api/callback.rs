use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{
    Res,
    management::TokenStore,
    spotify::auth::{self, AuthFlow, CallbackOutcome, Redirect, RedirectStrategy},
    warning,
};

/// Shared state of the local redirect receiver.
///
/// Only the first redirect is processed; its outcome waits in `outcome`
/// until the auth command picks it up.
pub struct CallbackState {
    pub store: Arc<dyn TokenStore>,
    pub strategy: Arc<dyn RedirectStrategy>,
    pub outcome: Mutex<Option<Res<CallbackOutcome>>>,
}

impl CallbackState {
    pub fn new(store: Arc<dyn TokenStore>, strategy: Arc<dyn RedirectStrategy>) -> Self {
        Self {
            store,
            strategy,
            outcome: Mutex::new(None),
        }
    }

    /// Takes the outcome of the processed redirect, if there is one yet.
    pub async fn take_outcome(&self) -> Option<Res<CallbackOutcome>> {
        self.outcome.lock().await.take()
    }
}

// Browsers never send the fragment to the server, so the implicit flow lands
// here without parameters and the page forwards the fragment as a query string.
const FRAGMENT_RELAY: &str = r#"<!doctype html>
<html><body>
<p>Completing login...</p>
<script>
  var base = window.location.pathname.replace(/\/$/, "");
  window.location.replace(base + "/fragment?" + window.location.hash.substring(1));
</script>
</body></html>"#;

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<CallbackState>>,
) -> Html<String> {
    if params.is_empty() && state.strategy.flow() == AuthFlow::Implicit {
        return Html(FRAGMENT_RELAY.to_string());
    }
    process(&state, Redirect::from_query(params)).await
}

pub async fn fragment(
    Query(params): Query<HashMap<String, String>>,
    Extension(state): Extension<Arc<CallbackState>>,
) -> Html<String> {
    process(&state, Redirect::from_fragment(params)).await
}

async fn process(state: &CallbackState, redirect: Redirect) -> Html<String> {
    let mut outcome = state.outcome.lock().await;
    if outcome.is_some() {
        return Html("<h4>Login already processed.</h4>".to_string());
    }

    let result = auth::handle_redirect(state.store.as_ref(), state.strategy.as_ref(), Some(&redirect)).await;
    let page = match &result {
        Ok(CallbackOutcome::Authenticated(_)) | Ok(CallbackOutcome::ExistingSession(_)) => {
            "<h2>Authentication successful.</h2><p>Close browser window.</p>".to_string()
        }
        Ok(CallbackOutcome::NoRedirect) => "<h4>Login failed: the redirect carried no credentials.</h4>".to_string(),
        Err(e) => {
            warning!("Login failed: {}", e);
            format!("<h4>Login failed.</h4><p>{}</p>", escape(&e.to_string()))
        }
    };

    *outcome = Some(result);
    Html(page)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
