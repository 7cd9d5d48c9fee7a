//! hostmix library
//!
//! This library implements a small web application that logs a host in with
//! Spotify using the OAuth 2.0 authorization-code flow and then builds a
//! playlist from recommendations seeded by the host's top tracks. It includes
//! modules for the HTTP endpoints, the token and workflow state of each
//! session, configuration, and the Spotify Web API calls.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints, one per workflow step
//! - `cli` - Command implementations for the binary
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy and its HTTP mapping
//! - `management` - Token manager, session store and workflow state machine
//! - `server` - Router construction and the listening loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use hostmix::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> hostmix::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(server::AppState::new(config)).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for startup and server-loop code.
///
/// Request handling uses [`error::Result`]; this boxed variant covers the
/// places where socket, address and configuration errors meet.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Logs an informational line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// ```
/// info!("Listening on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Logs a completed step prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Logs a fatal error prefixed with a red `!` and exits with status 1.
///
/// Only meant for startup failures in the binary; request handlers report
/// errors through [`error::Error`] instead.
///
/// ```
/// error!("Invalid configuration: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Logs a recoverable problem prefixed with a yellow `!`.
///
/// Handlers use it for failed upstream calls and rejected callbacks before
/// turning the error into a response.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
