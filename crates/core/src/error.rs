//! Error types for luapack-core

use thiserror::Error;

/// Errors that can occur while bundling
#[derive(Debug, Error)]
pub enum Error {
    #[error("Entry file not found: {0}")]
    EntryNotFound(String),

    #[error("Failed to read module '{path}': {message}")]
    ModuleRead { path: String, message: String },

    #[error("Cannot resolve require('{name}') in '{from}': tried {searched}")]
    ModuleNotFound {
        name: String,
        from: String,
        searched: String,
    },
}
