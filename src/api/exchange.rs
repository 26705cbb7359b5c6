use std::{collections::HashMap, sync::Arc};

use axum::{Extension, Json, extract::Query, http::StatusCode};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde_json::{Value, json};

use crate::{Res, config, debug};

/// Confidential settings of the token exchange backend.
pub struct ExchangeSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: String,
    http: Client,
}

impl ExchangeSettings {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String, token_url: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            token_url,
            http: Client::new(),
        }
    }

    pub fn from_env() -> Res<Self> {
        Ok(Self::new(
            config::spotify_client_id()?,
            config::spotify_client_secret()?,
            config::spotify_redirect_uri(),
            config::spotify_apitoken_url(),
        ))
    }

    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

/// Exchanges `?code=` for tokens on behalf of the client.
///
/// - missing code: `400 {"error": "Authorization code is missing"}`
/// - provider error: `400 {"error": <provider error>}`
/// - success: `200 {"access_token", "refresh_token"}`
/// - provider unreachable: `500 {"error": <message>}`
pub async fn exchange(
    Query(params): Query<HashMap<String, String>>,
    Extension(settings): Extension<Arc<ExchangeSettings>>,
) -> (StatusCode, Json<Value>) {
    let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Authorization code is missing" })),
        );
    };

    let (status, body) = exchange_code(&settings, code).await;
    (status, Json(body))
}

async fn exchange_code(settings: &ExchangeSettings, code: &str) -> (StatusCode, Value) {
    debug!("POST {}", settings.token_url);
    let response = settings
        .http
        .post(&settings.token_url)
        .header(reqwest::header::AUTHORIZATION, settings.basic_auth())
        .form(&[
            ("code", code),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await;

    let data: Value = match response {
        Ok(resp) => match resp.json().await {
            Ok(data) => data,
            Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() })),
        },
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() })),
    };

    if let Some(error) = data.get("error").filter(|e| !e.is_null()) {
        return (StatusCode::BAD_REQUEST, json!({ "error": error }));
    }

    (
        StatusCode::OK,
        json!({
            "access_token": data["access_token"],
            "refresh_token": data["refresh_token"],
        }),
    )
}
