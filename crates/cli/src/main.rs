//! luapack: bundle the Lua source tree into one distributable file.
//!
//! Single fixed action, no arguments: bundle [`ENTRY`] and its transitive
//! requires, write the result to [`OUTPUT`], log completion. Non-literal
//! requires are warned about and left in place.

use std::path::Path;

use anyhow::{Context, Result};
use luapack_core::{bundle, BundleOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Root source file bundling starts from, relative to the invocation dir.
const ENTRY: &str = "lua/main.lua";

/// Destination of the bundled library.
const OUTPUT: &str = "dist/bundle.lua";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let bundled = bundle(
        Path::new(ENTRY),
        BundleOptions {
            metadata: false,
            expression_handler: Some(Box::new(|module, location| {
                warn!(
                    "Non-literal require found in '{}' at {}",
                    module.name, location
                );
            })),
        },
    )?;

    let output = Path::new(OUTPUT);
    if let Some(dir) = output.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    // Completion is only reported once the write has actually finished.
    tokio::fs::write(output, &bundled)
        .await
        .with_context(|| format!("failed to write {OUTPUT}"))?;

    info!("Library bundle created: {OUTPUT}");
    Ok(())
}
