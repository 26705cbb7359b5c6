mod common;

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    Form, Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;

use spotiview::{
    ExchangeFailure, SpotiviewError,
    api::{CallbackState, ExchangeSettings},
    management::{MemoryTokenStore, TokenStore},
    server,
    spotify::auth::{
        self, AuthConfig, AuthFlow, BackendExchanger, CallbackOutcome, CodeExchanger,
        CodeStrategy, ImplicitStrategy, Redirect, RedirectStrategy,
    },
    types::SessionTokens,
};

fn test_config(flow: AuthFlow) -> AuthConfig {
    AuthConfig {
        authorize_url: "https://accounts.spotify.com/authorize".to_string(),
        client_id: "client123".to_string(),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        scopes: vec!["user-read-private".to_string(), "user-top-read".to_string()],
        flow,
        exchange_url: None,
    }
}

/// Exchanger answering from a fixed table instead of a backend.
struct FakeExchanger;

#[async_trait]
impl CodeExchanger for FakeExchanger {
    async fn exchange(&self, code: &str) -> Result<SessionTokens, ExchangeFailure> {
        match code {
            "good" => Ok(SessionTokens {
                access_token: "XYZ".to_string(),
                refresh_token: Some("R1".to_string()),
            }),
            "offline" => Err(ExchangeFailure::NetworkError("connection refused".to_string())),
            _ => Err(ExchangeFailure::ExchangeRejected("invalid_grant".to_string())),
        }
    }
}

#[test]
fn test_build_auth_url_encodes_scopes_and_redirect() {
    let url = auth::build_auth_url(&test_config(AuthFlow::Implicit), AuthFlow::Implicit);

    assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(url.contains("client_id=client123"));
    assert!(url.contains("scope=user-read-private%20user-top-read"));
    assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8888%2Fcallback"));
    assert_eq!(url.matches("response_type=").count(), 1);
    assert!(url.contains("response_type=token"));
}

#[test]
fn test_build_auth_url_code_mode() {
    let config = test_config(AuthFlow::Code);
    let url = auth::build_auth_url(&config, AuthFlow::Code);

    assert!(url.contains("response_type=code"));
    assert!(!url.contains("response_type=token"));
    // pure function of its inputs
    assert_eq!(url, auth::build_auth_url(&config, AuthFlow::Code));
}

#[test]
fn test_auth_flow_from_str() {
    assert_eq!("token".parse::<AuthFlow>().unwrap(), AuthFlow::Implicit);
    assert_eq!("Implicit".parse::<AuthFlow>().unwrap(), AuthFlow::Implicit);
    assert_eq!("code".parse::<AuthFlow>().unwrap(), AuthFlow::Code);
    assert!(matches!(
        "pkce".parse::<AuthFlow>(),
        Err(SpotiviewError::Config(_))
    ));
}

#[test]
fn test_redirect_parse_splits_query_and_fragment() {
    let redirect =
        Redirect::parse("http://127.0.0.1:8888/callback?state=s1#access_token=ABC&token_type=Bearer")
            .unwrap();

    assert_eq!(redirect.query.get("state").map(String::as_str), Some("s1"));
    assert_eq!(redirect.fragment.get("access_token").map(String::as_str), Some("ABC"));
    assert_eq!(redirect.fragment.get("token_type").map(String::as_str), Some("Bearer"));

    assert!(matches!(
        Redirect::parse("not a url"),
        Err(SpotiviewError::AuthorizationDenied(_))
    ));
}

#[test]
fn test_parse_params_decodes_values() {
    let params = auth::parse_params("#access_token=A%2FB&expires_in=3600");

    assert_eq!(params.get("access_token").map(String::as_str), Some("A/B"));
    assert_eq!(params.get("expires_in").map(String::as_str), Some("3600"));
}

#[tokio::test]
async fn test_implicit_redirect_stores_access_token() {
    let store = MemoryTokenStore::new();
    let redirect =
        Redirect::parse("http://127.0.0.1:8888/callback#access_token=ABC&token_type=Bearer").unwrap();

    let outcome = auth::handle_redirect(&store, &ImplicitStrategy, Some(&redirect))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CallbackOutcome::Authenticated(SessionTokens {
            access_token: "ABC".to_string(),
            refresh_token: None,
        })
    );
    assert_eq!(store.read_token().await, Some("ABC".to_string()));
}

#[tokio::test]
async fn test_implicit_redirect_without_token_is_denied() {
    let store = MemoryTokenStore::new();
    let redirect = Redirect::parse("http://127.0.0.1:8888/callback#token_type=Bearer").unwrap();

    let result = auth::handle_redirect(&store, &ImplicitStrategy, Some(&redirect)).await;

    assert!(matches!(result, Err(SpotiviewError::AuthorizationDenied(_))));
    assert_eq!(store.read_token().await, None);
}

#[tokio::test]
async fn test_implicit_redirect_reports_provider_error() {
    let store = MemoryTokenStore::new();
    let redirect = Redirect::parse("http://127.0.0.1:8888/callback#error=access_denied").unwrap();

    let result = auth::handle_redirect(&store, &ImplicitStrategy, Some(&redirect)).await;

    match result {
        Err(SpotiviewError::AuthorizationDenied(reason)) => assert_eq!(reason, "access_denied"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_existing_token_wins_over_redirect() {
    let store = MemoryTokenStore::with_token("OLD");
    let redirect = Redirect::parse("http://127.0.0.1:8888/callback#access_token=NEW").unwrap();

    let outcome = auth::handle_redirect(&store, &ImplicitStrategy, Some(&redirect))
        .await
        .unwrap();

    assert_eq!(outcome, CallbackOutcome::ExistingSession("OLD".to_string()));
    assert_eq!(store.read_token().await, Some("OLD".to_string()));
}

#[tokio::test]
async fn test_missing_redirect_needs_login() {
    let store = MemoryTokenStore::new();

    let outcome = auth::handle_redirect(&store, &ImplicitStrategy, None).await.unwrap();
    assert_eq!(outcome, CallbackOutcome::NoRedirect);

    let empty = Redirect::default();
    let outcome = auth::handle_redirect(&store, &ImplicitStrategy, Some(&empty))
        .await
        .unwrap();
    assert_eq!(outcome, CallbackOutcome::NoRedirect);
    assert_eq!(store.read_token().await, None);
}

#[tokio::test]
async fn test_code_redirect_exchanges_code() {
    let store = MemoryTokenStore::new();
    let strategy = CodeStrategy::new(FakeExchanger);
    let redirect = Redirect::parse("http://127.0.0.1:8888/callback?code=good").unwrap();

    let outcome = auth::handle_redirect(&store, &strategy, Some(&redirect))
        .await
        .unwrap();

    match outcome {
        CallbackOutcome::Authenticated(tokens) => {
            assert_eq!(tokens.access_token, "XYZ");
            assert_eq!(tokens.refresh_token.as_deref(), Some("R1"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(store.read_token().await, Some("XYZ".to_string()));
}

#[tokio::test]
async fn test_code_redirect_failures() {
    let strategy = CodeStrategy::new(FakeExchanger);

    let cases = [
        ("http://127.0.0.1:8888/callback?state=s1", "missing_code"),
        ("http://127.0.0.1:8888/callback?code=", "missing_code"),
        ("http://127.0.0.1:8888/callback?code=bad", "exchange_rejected"),
        ("http://127.0.0.1:8888/callback?code=offline", "network_error"),
    ];

    for (url, expected) in cases {
        let store = MemoryTokenStore::new();
        let redirect = Redirect::parse(url).unwrap();

        match auth::handle_redirect(&store, &strategy, Some(&redirect)).await {
            Err(SpotiviewError::ExchangeFailed(failure)) => assert_eq!(failure.code(), expected, "{}", url),
            other => panic!("unexpected outcome for {}: {:?}", url, other),
        }
        assert_eq!(store.read_token().await, None, "{}", url);
    }
}

#[tokio::test]
async fn test_code_redirect_with_provider_error_is_denied() {
    let store = MemoryTokenStore::new();
    let strategy = CodeStrategy::new(FakeExchanger);
    let redirect = Redirect::parse("http://127.0.0.1:8888/callback?error=access_denied").unwrap();

    let result = auth::handle_redirect(&store, &strategy, Some(&redirect)).await;

    assert!(matches!(result, Err(SpotiviewError::AuthorizationDenied(_))));
    assert!(result.unwrap_err().is_session_terminal());
}

#[test]
fn test_strategy_for_code_flow_requires_exchange_url() {
    let config = test_config(AuthFlow::Code);
    assert!(matches!(
        auth::strategy_for(&config),
        Err(SpotiviewError::Config(_))
    ));

    let config = AuthConfig {
        exchange_url: Some("http://127.0.0.1:8889/api/exchange".to_string()),
        ..test_config(AuthFlow::Code)
    };
    assert_eq!(auth::strategy_for(&config).unwrap().flow(), AuthFlow::Code);
    assert_eq!(
        auth::strategy_for(&test_config(AuthFlow::Implicit)).unwrap().flow(),
        AuthFlow::Implicit
    );
}

#[tokio::test]
async fn test_backend_exchanger_against_backend_responses() {
    let app = Router::new().route(
        "/api/exchange",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            match q.get("code").map(String::as_str) {
                Some("good") => (
                    StatusCode::OK,
                    Json(json!({ "access_token": "XYZ", "refresh_token": "R1" })),
                ),
                Some("empty") => (StatusCode::OK, Json(json!({}))),
                _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))),
            }
        }),
    );
    let base = common::spawn(app).await;
    let exchanger = BackendExchanger::new(format!("{}/api/exchange", base));

    let tokens = exchanger.exchange("good").await.unwrap();
    assert_eq!(tokens.access_token, "XYZ");
    assert_eq!(tokens.refresh_token.as_deref(), Some("R1"));

    assert_eq!(
        exchanger.exchange("bad").await,
        Err(ExchangeFailure::ExchangeRejected("invalid_grant".to_string()))
    );
    assert!(matches!(
        exchanger.exchange("empty").await,
        Err(ExchangeFailure::ExchangeRejected(_))
    ));
}

#[tokio::test]
async fn test_backend_exchanger_unreachable_endpoint() {
    let (listener, base) = common::bind().await;
    drop(listener);
    let exchanger = BackendExchanger::new(format!("{}/api/exchange", base));

    let result = exchanger.exchange("good").await;

    assert!(matches!(result, Err(ExchangeFailure::NetworkError(_))));
}

/// Fake accounts service token endpoint checking the confidential request.
async fn fake_token_endpoint() -> String {
    let app = Router::new().route(
        "/api/token",
        post(
            |headers: HeaderMap, Form(form): Form<HashMap<String, String>>| async move {
                let expected = format!("Basic {}", STANDARD.encode("client123:secret456"));
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v == expected);
                if !authorized {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid_client" })));
                }
                assert_eq!(form.get("grant_type").map(String::as_str), Some("authorization_code"));
                assert_eq!(
                    form.get("redirect_uri").map(String::as_str),
                    Some("http://127.0.0.1:8888/callback")
                );

                match form.get("code").map(String::as_str) {
                    Some("good") => (
                        StatusCode::OK,
                        Json(json!({
                            "access_token": "XYZ",
                            "token_type": "Bearer",
                            "refresh_token": "R1",
                            "expires_in": 3600
                        })),
                    ),
                    _ => (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))),
                }
            },
        ),
    );
    let base = common::spawn(app).await;
    format!("{}/api/token", base)
}

async fn exchange_backend() -> String {
    let settings = ExchangeSettings::new(
        "client123".to_string(),
        "secret456".to_string(),
        "http://127.0.0.1:8888/callback".to_string(),
        fake_token_endpoint().await,
    );
    let base = common::spawn(server::exchange_router(Arc::new(settings))).await;
    format!("{}{}", base, server::EXCHANGE_ROUTE)
}

#[tokio::test]
async fn test_code_flow_through_exchange_backend() {
    let endpoint = exchange_backend().await;
    let store = MemoryTokenStore::new();
    let strategy = CodeStrategy::new(BackendExchanger::new(endpoint));

    let redirect = Redirect::parse("http://127.0.0.1:8888/callback?code=good").unwrap();
    let outcome = auth::handle_redirect(&store, &strategy, Some(&redirect))
        .await
        .unwrap();

    assert!(matches!(outcome, CallbackOutcome::Authenticated(_)));
    assert_eq!(store.read_token().await, Some("XYZ".to_string()));
}

#[tokio::test]
async fn test_exchange_backend_error_responses() {
    let endpoint = exchange_backend().await;
    let http = reqwest::Client::new();

    let response = http.get(&endpoint).send().await.unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Authorization code is missing");

    let response = http.get(&endpoint).query(&[("code", "stale")]).send().await.unwrap();
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_grant");

    let response = http.get(&endpoint).query(&[("code", "good")]).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["access_token"], "XYZ");
    assert_eq!(body["refresh_token"], "R1");
    assert!(body.get("expires_in").is_none());
}

#[tokio::test]
async fn test_exchange_backend_unreachable_provider() {
    let (listener, base) = common::bind().await;
    drop(listener);
    let settings = ExchangeSettings::new(
        "client123".to_string(),
        "secret456".to_string(),
        "http://127.0.0.1:8888/callback".to_string(),
        format!("{}/api/token", base),
    );
    let backend = common::spawn(server::exchange_router(Arc::new(settings))).await;

    let response = reqwest::Client::new()
        .get(format!("{}{}", backend, server::EXCHANGE_ROUTE))
        .query(&[("code", "good")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_callback_receiver_relays_fragment_and_keeps_first_outcome() {
    let store = Arc::new(MemoryTokenStore::new());
    let state = Arc::new(CallbackState::new(store.clone(), Arc::new(ImplicitStrategy)));
    let base = common::spawn(server::callback_router("/callback", state.clone())).await;
    let http = reqwest::Client::new();

    let relay = http
        .get(format!("{}/callback", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(relay.contains("/fragment?"));
    assert!(state.take_outcome().await.is_none());

    let page = http
        .get(format!("{}/callback/fragment?access_token=ABC&token_type=Bearer", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Authentication successful"));

    let again = http
        .get(format!("{}/callback/fragment?access_token=OTHER", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(again.contains("already processed"));

    let outcome = state.take_outcome().await.unwrap().unwrap();
    assert!(matches!(outcome, CallbackOutcome::Authenticated(_)));
    assert_eq!(store.read_token().await, Some("ABC".to_string()));
}

#[tokio::test]
async fn test_callback_receiver_code_query_error() {
    let store = Arc::new(MemoryTokenStore::new());
    let strategy: Arc<dyn RedirectStrategy> = Arc::new(CodeStrategy::new(FakeExchanger));
    let state = Arc::new(CallbackState::new(store.clone(), strategy));
    let base = common::spawn(server::callback_router("/callback", state.clone())).await;

    let page = reqwest::get(format!("{}/callback?code=bad", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Login failed"));

    let outcome = state.take_outcome().await.unwrap();
    assert!(matches!(
        outcome,
        Err(SpotiviewError::ExchangeFailed(ExchangeFailure::ExchangeRejected(_)))
    ));
    assert_eq!(store.read_token().await, None);
}

#[tokio::test]
async fn test_empty_code_redirect_reports_missing_code() {
    let store = MemoryTokenStore::new();
    let strategy = CodeStrategy::new(FakeExchanger);

    let result = auth::handle_redirect(&store, &strategy, Some(&Redirect::default())).await;

    assert!(matches!(
        result,
        Err(SpotiviewError::ExchangeFailed(ExchangeFailure::MissingCode))
    ));
    // no redirect at all is still just a pending login
    let outcome = auth::handle_redirect(&store, &strategy, None).await.unwrap();
    assert_eq!(outcome, CallbackOutcome::NoRedirect);
    assert_eq!(store.read_token().await, None);
}

#[tokio::test]
async fn test_callback_receiver_code_flow_without_query() {
    let store = Arc::new(MemoryTokenStore::new());
    let strategy: Arc<dyn RedirectStrategy> = Arc::new(CodeStrategy::new(FakeExchanger));
    let state = Arc::new(CallbackState::new(store.clone(), strategy));
    let base = common::spawn(server::callback_router("/callback", state.clone())).await;

    let page = reqwest::get(format!("{}/callback", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Login failed"));

    let outcome = state.take_outcome().await.unwrap();
    assert!(matches!(
        outcome,
        Err(SpotiviewError::ExchangeFailed(ExchangeFailure::MissingCode))
    ));
}
