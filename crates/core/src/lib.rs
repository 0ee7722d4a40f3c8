//! luapack-core: Lua bundling for luapack
//!
//! This crate provides the bundling capability behind the `luapack` binary:
//! - `bundle`: inline a root file and its transitive requires into one chunk
//! - `BundleOptions`: metadata toggle + callback for non-literal requires
//! - Lua-style module resolution (`?.lua`, `?/init.lua`)

mod bundle;
mod error;
mod resolve;
mod scan;

pub use bundle::{bundle, BundleOptions, ExpressionHandler, ModuleContext, SourceLocation};
pub use error::Error;

/// Result type for bundling operations
pub type Result<T> = std::result::Result<T, Error>;
