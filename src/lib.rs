//! Top tracks heatmap.
//!
//! A small web app that signs a user in with Spotify, lists their ten most
//! played tracks of the last weeks and draws a heatmap of the tracks' audio
//! features.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the four pages and the health check
//! - `config` - Environment loading and `Settings`
//! - `errors` - Error types of the configuration, auth and data phases
//! - `heatmap` - Feature matrix and Plotly figure rendering
//! - `management` - Sessions and the side channel token file
//! - `server` - Shared state, router and listener
//! - `spotify` - OAuth flow and Web API client
//! - `types` - Tokens, tracks and audio features
//! - `utils` - Ids, cookies and escaping
//! - `views` - HTML pages
//!
//! # Example
//!
//! ```
//! use top_heat::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> top_heat::Res<()> {
//!     config::load_env();
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(settings, false).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod heatmap;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod views;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the process level plumbing (binding the listener, serving)
/// where the caller only reports the failure. Request paths use the typed
/// errors in [`errors`].
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a progress or status line, prefixed with a blue `o`.
///
/// ```
/// info!("Listening on {}", url);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green `✓` once something completed.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only for startup failures the server cannot run without, such as missing
/// credentials. Request handlers never call this.
///
/// ```
/// error!("Invalid configuration: {}", err);
/// // unreachable
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a recoverable problem to stderr, prefixed with a yellow `!`.
///
/// Failed exchanges, refreshes and upstream fetches end up here; the request
/// itself carries on to a redirect or the error page.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
