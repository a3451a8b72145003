//! Juke Server Library
//!
//! This library implements a session-authenticated proxy between a browser
//! and the Spotify Web API. On top of OAuth-delegated API calls it layers
//! per-user persistence: an append-only like/dislike history with aggregate
//! counters, a per-user playlist on Spotify mirroring the liked tracks, and
//! a global per-track like/dislike aggregate shared across users.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints served to the browser
//! - `config` - Configuration management and environment variables
//! - `error` - Crate-wide error taxonomy
//! - `management` - Persistence stores and the high-level flows built on them
//! - `server` - HTTP server setup and routing
//! - `session` - Cookie-bound server-side session state
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in this crate resolves to one of the variants
/// of [`Error`], so callers can decide at the route boundary whether a
/// failure becomes a redirect, an error response, or a retry.
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only used for unrecoverable startup errors; request handling paths return
/// [`Error`] values instead of terminating the process.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
