//! Shared error type
//!
//! Covers what this library actually does: configuration loading and data
//! folder setup. Pipeline and HTTP failures have their own types in the
//! service crate.

use thiserror::Error;

/// Result alias for setup and configuration paths
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Config file missing a required value, unreadable, or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data folder or config file access failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
