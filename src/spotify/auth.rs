use std::{collections::HashMap, fmt, str::FromStr};

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    ExchangeFailure, Res, SpotiviewError, config, debug,
    management::TokenStore,
    types::{ExchangeResponse, SessionTokens},
};

/// OAuth variant used by a deployment.
///
/// The two flows are mutually exclusive: a deployment picks one through
/// `SPOTIFY_AUTH_FLOW` and never mixes them at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    /// The access token comes back directly in the redirect fragment.
    Implicit,
    /// A short-lived code comes back in the redirect query and is exchanged
    /// for a token by the trusted backend.
    Code,
}

impl AuthFlow {
    pub fn response_type(&self) -> &'static str {
        match self {
            AuthFlow::Implicit => "token",
            AuthFlow::Code => "code",
        }
    }
}

impl FromStr for AuthFlow {
    type Err = SpotiviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "token" | "implicit" => Ok(AuthFlow::Implicit),
            "code" => Ok(AuthFlow::Code),
            other => Err(SpotiviewError::Config(format!(
                "Unknown auth flow '{}', expected 'token' or 'code'",
                other
            ))),
        }
    }
}

impl fmt::Display for AuthFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.response_type())
    }
}

/// Fixed settings of the authorization request.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub flow: AuthFlow,
    pub exchange_url: Option<String>,
}

impl AuthConfig {
    /// Builds the configuration from the environment.
    ///
    /// # Errors
    ///
    /// - the client id is missing
    /// - `SPOTIFY_AUTH_FLOW` names an unknown flow
    /// - the code flow is selected without `SPOTIFY_EXCHANGE_URL`
    pub fn from_env() -> Res<Self> {
        let flow: AuthFlow = config::spotify_auth_flow().parse()?;
        let exchange_url = config::spotify_exchange_url();
        if flow == AuthFlow::Code && exchange_url.is_none() {
            return Err(SpotiviewError::Config(
                "SPOTIFY_EXCHANGE_URL must be set for the code flow".to_string(),
            ));
        }

        Ok(Self {
            authorize_url: config::spotify_apiauth_url(),
            client_id: config::spotify_client_id()?,
            redirect_uri: config::spotify_redirect_uri(),
            scopes: config::spotify_scopes(),
            flow,
            exchange_url,
        })
    }
}

/// Builds the provider authorization URL for `mode`.
///
/// The redirect URI and the space-joined scope list are percent-encoded
/// (spaces become `%20`). The result only depends on `config` and `mode`.
///
/// # Example
///
/// ```
/// let url = build_auth_url(&config, AuthFlow::Implicit);
/// // https://accounts.spotify.com/authorize?client_id=..&response_type=token&redirect_uri=..&scope=..
/// ```
pub fn build_auth_url(config: &AuthConfig, mode: AuthFlow) -> String {
    format!(
        "{auth_url}?client_id={client_id}&response_type={response_type}&redirect_uri={redirect_uri}&scope={scope}",
        auth_url = config.authorize_url,
        client_id = urlencoding::encode(&config.client_id),
        response_type = mode.response_type(),
        redirect_uri = urlencoding::encode(&config.redirect_uri),
        scope = urlencoding::encode(&config.scopes.join(" ")),
    )
}

/// Query and fragment parameters of an inbound redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirect {
    pub query: HashMap<String, String>,
    pub fragment: HashMap<String, String>,
}

impl Redirect {
    /// Splits a full redirect URL into its query and fragment parameters.
    pub fn parse(redirect_url: &str) -> Res<Self> {
        let url = url::Url::parse(redirect_url.trim())
            .map_err(|e| SpotiviewError::AuthorizationDenied(format!("invalid redirect URL: {}", e)))?;

        Ok(Self {
            query: url.query_pairs().into_owned().collect(),
            fragment: url.fragment().map(parse_params).unwrap_or_default(),
        })
    }

    /// Redirect whose query string was delivered to the local receiver.
    pub fn from_query(query: HashMap<String, String>) -> Self {
        Self {
            query,
            fragment: HashMap::new(),
        }
    }

    /// Redirect whose fragment was relayed to the local receiver.
    pub fn from_fragment(fragment: HashMap<String, String>) -> Self {
        Self {
            query: HashMap::new(),
            fragment,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.fragment.is_empty()
    }

    fn provider_error(&self) -> Option<&String> {
        self.fragment.get("error").or_else(|| self.query.get("error"))
    }
}

/// Parses an `a=b&c=d` parameter string, as found in a redirect fragment.
pub fn parse_params(params: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(params.trim_start_matches(['#', '?']).as_bytes())
        .into_owned()
        .collect()
}

/// Extracts session tokens from a redirect, one implementation per flow.
#[async_trait]
pub trait RedirectStrategy: Send + Sync {
    fn flow(&self) -> AuthFlow;

    async fn extract(&self, redirect: &Redirect) -> Res<SessionTokens>;
}

/// Reads `access_token` from the redirect fragment.
pub struct ImplicitStrategy;

#[async_trait]
impl RedirectStrategy for ImplicitStrategy {
    fn flow(&self) -> AuthFlow {
        AuthFlow::Implicit
    }

    async fn extract(&self, redirect: &Redirect) -> Res<SessionTokens> {
        match redirect.fragment.get("access_token").filter(|t| !t.is_empty()) {
            Some(token) => Ok(SessionTokens {
                access_token: token.clone(),
                refresh_token: None,
            }),
            None => Err(SpotiviewError::AuthorizationDenied(
                redirect
                    .provider_error()
                    .cloned()
                    .unwrap_or_else(|| "access token not found in redirect".to_string()),
            )),
        }
    }
}

/// Exchanges an authorization code for session tokens.
#[async_trait]
pub trait CodeExchanger: Send + Sync {
    async fn exchange(&self, code: &str) -> Result<SessionTokens, ExchangeFailure>;
}

/// Reads `code` from the redirect query and hands it to a [`CodeExchanger`].
pub struct CodeStrategy<E> {
    exchanger: E,
}

impl<E: CodeExchanger> CodeStrategy<E> {
    pub fn new(exchanger: E) -> Self {
        Self { exchanger }
    }
}

#[async_trait]
impl<E: CodeExchanger> RedirectStrategy for CodeStrategy<E> {
    fn flow(&self) -> AuthFlow {
        AuthFlow::Code
    }

    async fn extract(&self, redirect: &Redirect) -> Res<SessionTokens> {
        if let Some(error) = redirect.query.get("error") {
            return Err(SpotiviewError::AuthorizationDenied(error.clone()));
        }

        let code = redirect
            .query
            .get("code")
            .filter(|c| !c.is_empty())
            .ok_or(ExchangeFailure::MissingCode)?;

        Ok(self.exchanger.exchange(code).await?)
    }
}

/// Calls the trusted exchange backend: `GET <endpoint>?code=<code>`.
///
/// The backend holds the client secret; this side only forwards the code.
pub struct BackendExchanger {
    http: Client,
    endpoint: String,
}

impl BackendExchanger {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CodeExchanger for BackendExchanger {
    async fn exchange(&self, code: &str) -> Result<SessionTokens, ExchangeFailure> {
        debug!("GET {}?code=…", self.endpoint);
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("code", code)])
            .send()
            .await
            .map_err(|e| ExchangeFailure::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExchangeFailure::NetworkError(e.to_string()))?;
        let parsed: ExchangeResponse = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            return Err(ExchangeFailure::ExchangeRejected(
                parsed
                    .error
                    .unwrap_or_else(|| format!("exchange endpoint answered {}", status)),
            ));
        }

        match parsed.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(SessionTokens {
                access_token,
                refresh_token: parsed.refresh_token,
            }),
            None => Err(ExchangeFailure::ExchangeRejected(
                parsed
                    .error
                    .unwrap_or_else(|| "response carried no access_token".to_string()),
            )),
        }
    }
}

/// Returns the strategy matching the configured flow.
pub fn strategy_for(config: &AuthConfig) -> Res<Box<dyn RedirectStrategy>> {
    match (config.flow, &config.exchange_url) {
        (AuthFlow::Implicit, _) => Ok(Box::new(ImplicitStrategy)),
        (AuthFlow::Code, Some(endpoint)) => Ok(Box::new(CodeStrategy::new(
            BackendExchanger::new(endpoint.clone()),
        ))),
        (AuthFlow::Code, None) => Err(SpotiviewError::Config(
            "SPOTIFY_EXCHANGE_URL must be set for the code flow".to_string(),
        )),
    }
}

/// Result of processing the inbound redirect at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// A token was already stored; the redirect was not looked at.
    ExistingSession(String),
    /// The redirect was processed and the access token stored.
    Authenticated(SessionTokens),
    /// There was nothing to process; the user still has to log in.
    NoRedirect,
}

/// Processes the redirect the provider sent the user back with.
///
/// An already stored token wins over the redirect, so a stale redirect is
/// never processed twice. Otherwise the strategy extracts the session tokens
/// and the access token is saved; the refresh token is only handed back.
///
/// Without a redirect there is nothing to do. An empty redirect means the same
/// for the implicit flow, while the code flow reports it as a missing code.
///
/// # Errors
///
/// - [`SpotiviewError::AuthorizationDenied`] when the redirect carries no token (implicit flow)
///   or the provider reported an error
/// - [`SpotiviewError::ExchangeFailed`] when the code is missing or the exchange failed
/// - [`SpotiviewError::Io`] when the token cannot be persisted
///
/// Nothing is stored on failure.
pub async fn handle_redirect(
    store: &dyn TokenStore,
    strategy: &dyn RedirectStrategy,
    redirect: Option<&Redirect>,
) -> Res<CallbackOutcome> {
    if let Some(token) = store.read_token().await {
        return Ok(CallbackOutcome::ExistingSession(token));
    }

    let redirect = match redirect {
        Some(r) if !r.is_empty() || strategy.flow() == AuthFlow::Code => r,
        _ => return Ok(CallbackOutcome::NoRedirect),
    };

    let tokens = strategy.extract(redirect).await?;
    store.save_token(&tokens.access_token).await?;
    Ok(CallbackOutcome::Authenticated(tokens))
}
