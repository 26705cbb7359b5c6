//! Configuration management for spotiview.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the OAuth
//! client settings, endpoint URLs, local server addresses and the preview player
//! command.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{Res, SpotiviewError};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_EXCHANGE_SERVER_ADDRESS: &str = "127.0.0.1:8889";
pub const DEFAULT_PREVIEW_PLAYER: &str = "mpv --no-video --really-quiet";

/// Permissions requested during authorization.
pub const DEFAULT_SCOPES: [&str; 9] = [
    "user-read-private",
    "user-read-recently-played",
    "user-read-email",
    "user-top-read",
    "playlist-read-private",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-library-read",
    "user-library-modify",
];

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `spotiview` data directory if it doesn't exist and loads
/// environment variables from `spotiview/.env` when that file is present.
/// A missing file is not an error: every value can also come from the
/// process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotiview/.env`
/// - macOS: `~/Library/Application Support/spotiview/.env`
/// - Windows: `%LOCALAPPDATA%/spotiview/.env`
///
/// # Errors
///
/// Returns [`SpotiviewError::Io`] if the directory cannot be created and
/// [`SpotiviewError::Config`] if the file exists but cannot be parsed.
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| SpotiviewError::Config(e.to_string()))?;
    }
    Ok(())
}

/// Root of everything spotiview keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotiview");
    path
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required(key: &str) -> Res<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SpotiviewError::Config(format!("{} must be set", key)))
}

/// Returns the address the local redirect receiver binds to.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:8888`. The host and port
/// must match the registered redirect URI.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the address the token exchange backend binds to.
pub fn exchange_server_addr() -> String {
    var_or("EXCHANGE_SERVER_ADDRESS", DEFAULT_EXCHANGE_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID.
///
/// # Errors
///
/// Fails with [`SpotiviewError::Config`] if `SPOTIFY_API_AUTH_CLIENT_ID` is not set.
pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify API client secret.
///
/// Only the exchange backend reads this value; the client side of the code
/// flow never sees it.
///
/// # Errors
///
/// Fails with [`SpotiviewError::Config`] if `SPOTIFY_API_AUTH_CLIENT_SECRET` is not set.
pub fn spotify_client_secret() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Returns the registered OAuth redirect URI.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the requested scope list.
///
/// `SPOTIFY_API_AUTH_SCOPE` may override the defaults with a space separated list.
pub fn spotify_scopes() -> Vec<String> {
    match env::var("SPOTIFY_API_AUTH_SCOPE") {
        Ok(scope) if !scope.trim().is_empty() => {
            scope.split_whitespace().map(str::to_string).collect()
        }
        _ => DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Returns the OAuth flow selected for this deployment (`token` or `code`).
pub fn spotify_auth_flow() -> String {
    var_or("SPOTIFY_AUTH_FLOW", "token")
}

/// Returns the Spotify authorization endpoint.
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the Spotify token endpoint used by the exchange backend.
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the trusted token exchange endpoint, if one is configured.
///
/// Only the code flow needs it.
pub fn spotify_exchange_url() -> Option<String> {
    env::var("SPOTIFY_EXCHANGE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the preview player command line, split into program and arguments.
pub fn preview_player() -> Vec<String> {
    var_or("PREVIEW_PLAYER", DEFAULT_PREVIEW_PLAYER)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
