//! Spotify Listening Client Library
//!
//! This library provides the building blocks of `spotiview`: OAuth token
//! acquisition against the Spotify accounts service, a single access point for
//! the Spotify Web API, and the local aggregation used to derive listening
//! statistics from API responses.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local redirect receiver and the exchange backend
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by every module
//! - `management` - Token storage
//! - `player` - Single-slot preview playback
//! - `server` - Local HTTP servers
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Aggregation routines and helpers
//!
//! # Example
//!
//! ```
//! use spotiview::{config, management::FileTokenStore, spotify::client::ApiClient};
//!
//! #[tokio::main]
//! async fn main() -> spotiview::Res<()> {
//!     config::load_env().await?;
//!     let api = ApiClient::from_env();
//!     // Use the API client...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod player;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::{ExchangeFailure, SpotiviewError};

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports a [`SpotiviewError`], so callers
/// can match on the failure kind (for instance to tell a missing token apart from
/// a rejected request).
///
/// # Example
///
/// ```
/// use spotiview::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, SpotiviewError>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Opening the Spotify login page...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible, such as authentication failures that leave no
/// useful view to fall back to.
///
/// # Example
///
/// ```
/// error!("Authorization denied: {}", reason);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a view that fell back to its empty state
/// because a request failed.
///
/// # Example
///
/// ```
/// warning!("Failed to load playlists. Err: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic line when `SPOTIVIEW_DEBUG` is set.
///
/// # Example
///
/// ```
/// debug!("GET {}", url);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if std::env::var_os("SPOTIVIEW_DEBUG").is_some() {
      use colored::Colorize;
      eprintln!("[{}] {}", "·".dimmed(), std::format_args!($($arg)*));
    }
  })
}
