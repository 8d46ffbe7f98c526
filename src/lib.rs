//! Spotify Playlist Exporter Library
//!
//! This library signs a user in to Spotify through the OAuth 2.0 authorization
//! code flow with PKCE and exports their complete playlist library to JSON
//! files. It includes modules for the local redirect listener, the Web API
//! client with pagination and rate-limit handling, configuration and the
//! export itself.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local callback server
//! - `browser` - Opening the authorization URL in the user's browser
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types
//! - `export` - Shaping and writing export files
//! - `server` - One-shot local HTTP server for OAuth callbacks
//! - `spotify` - Spotify accounts service and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE generation, name sanitizing and file helpers

pub mod api;
pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints a status line prefixed with a blue `o`.
///
/// ```
/// info!("Signed in as {}", user);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a status line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Only for the top level: everything below `main` returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a status line prefixed with a yellow `!`. Execution continues.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
