//! # Spotify Integration Module
//!
//! This module is the integration layer between spotiview and the Spotify
//! accounts service and Web API.
//!
//! ```text
//! CLI Layer
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (implicit flow / code flow via exchange backend)
//!     ├── API client (bearer auth, status mapping, pagination draining)
//!     ├── Library (playlists, listening history)
//!     ├── Statistics (top tracks, artists, genres, albums)
//!     └── Discovery (mood based recommendations)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Authentication
//!
//! [`auth`] builds the authorization URL and processes the redirect the user is
//! sent back with. The flow is fixed per deployment by `SPOTIFY_AUTH_FLOW`:
//!
//! - **Implicit flow**: the access token arrives in the redirect fragment.
//! - **Code flow**: the authorization code arrives in the redirect query and is
//!   exchanged by a trusted backend (see [`crate::api::exchange`]) that holds the
//!   client secret.
//!
//! A token that is already stored always wins over a redirect. Tokens are not
//! refreshed; a token is used until the API rejects it.
//!
//! ## API access
//!
//! [`client::ApiClient`] is the only place that talks to the Web API. It fails
//! with `Unauthenticated` without touching the network when no token is given,
//! maps every non-success status to `RequestFailed` and never retries.
//!
//! ## Usage
//!
//! ```rust
//! let api = ApiClient::from_env();
//! let token = store.read_token().await;
//!
//! let history = spotify::library::recently_played(&api, token.as_deref()).await?;
//! let stats = spotify::stats::fetch_statistics(&api, token.as_deref(), TimeRange::ShortTerm).await?;
//! ```
//!
//! ## API Coverage
//!
//! - `GET /me/playlists`, `GET /playlists/{id}`, `POST /playlists/{id}/tracks`
//! - `GET /me/player/recently-played` (drained)
//! - `GET /me/top/tracks`, `GET /me/top/artists`
//! - `GET /recommendations`

pub mod auth;
pub mod client;
pub mod discovery;
pub mod library;
pub mod stats;
