//! # CLI Module
//!
//! This module provides the command-line interface layer for spotiview. Each
//! public function implements one subcommand and coordinates token storage,
//! the Spotify integration layer and terminal output.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth`] - Logs in through the configured OAuth flow
//! - [`logout`] - Forgets the stored access token
//! - [`serve_exchange`] - Runs the token exchange backend used by the code flow
//!
//! ### Views
//!
//! - [`playlists`] - Lists playlists, or the tracks of one playlist
//! - [`recent`] - Shows the complete listening history the API exposes
//! - [`stats`] - Top tracks, artists, albums and genres for a time range
//! - [`discover`] - Mood based recommendations
//!
//! ### Actions
//!
//! - [`add`] - Adds a track to a playlist
//! - [`preview`] - Plays preview clips, one at a time
//!
//! ## Error Handling
//!
//! A view whose request fails falls back to its empty state and prints a
//! warning. Missing or rejected credentials are different: no view is useful
//! without a token, so they end the program with a message pointing at
//! `spotiview auth`.

mod add;
mod auth;
mod discover;
mod exchange;
mod playlists;
mod preview;
mod recent;
mod stats;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res, error,
    management::{FileTokenStore, TokenStore},
    spotify::client::ApiClient,
    warning,
};

pub use add::add;
pub use auth::auth;
pub use auth::logout;
pub use discover::discover;
pub use exchange::serve_exchange;
pub use playlists::playlists;
pub use preview::preview;
pub use recent::recent;
pub use stats::stats;

/// API client plus whatever token is currently stored.
async fn session() -> (ApiClient, Option<String>) {
    let token = FileTokenStore::new().read_token().await;
    (ApiClient::from_env(), token)
}

/// Unwraps a view's data, degrading to the empty value on failure.
///
/// Failures that need a new login end the program instead.
fn or_empty<T: Default>(result: Res<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) if e.requires_login() => error!("{}", e),
        Err(e) => {
            warning!("Failed to load {}. Err: {}", what, e);
            T::default()
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
