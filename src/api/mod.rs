//! # API Module
//!
//! HTTP handlers served by spotiview's two local servers.
//!
//! ## Redirect receiver
//!
//! - [`callback`] - Receives the provider redirect at the registered redirect
//!   URI path. Query redirects (code flow) are processed directly; for the
//!   implicit flow it serves a relay page that forwards the URL fragment to
//!   [`fragment`], since browsers never send fragments to a server.
//! - [`fragment`] - Processes the relayed fragment parameters.
//!
//! ## Exchange backend
//!
//! - [`exchange`] - Trades an authorization code for tokens using the confidential
//!   client credentials. Only deployments using the code flow run it.
//!
//! ## Monitoring
//!
//! - [`health`] - Status and version information, mounted on both servers.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotiview::api::{exchange, health};
//!
//! let app = Router::new()
//!     .route("/api/exchange", get(exchange))
//!     .route("/health", get(health));
//! ```

mod callback;
pub mod exchange;
mod health;

pub use callback::CallbackState;
pub use callback::callback;
pub use callback::fragment;
pub use exchange::ExchangeSettings;
pub use exchange::exchange;
pub use health::health;
