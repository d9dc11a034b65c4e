//! Background cache warmup.
//!
//! Warmup eagerly discovers providers and populates the structured cache
//! for each of them, so the first real lookups are served warm. It runs on
//! a dedicated thread decoupled from startup: the service answers requests
//! before warmup completes, and requests arriving meanwhile simply take the
//! cold resolution path. A warmup failure is logged and abandons the rest
//! of the warmup; it never takes the process down.

use std::thread;

use crate::error::Result;
use crate::registry::ModuleRegistry;

/// Run warmup on a background thread.
pub fn spawn(registry: ModuleRegistry) -> thread::JoinHandle<()> {
    thread::spawn(move || run(&registry))
}

/// Run warmup to completion on the current thread.
pub fn run(registry: &ModuleRegistry) {
    tracing::info!("Starting cache warmup");
    match warm(registry) {
        Ok(count) => tracing::info!("Cache warmup completed ({} providers)", count),
        Err(e) => tracing::error!("Cache warmup failed: {}", e),
    }
}

fn warm(registry: &ModuleRegistry) -> Result<usize> {
    registry.verify_access()?;

    let providers = registry.providers()?;
    tracing::info!("Warmup found {} providers", providers.len());

    for provider in &providers {
        tracing::info!("Warmup: scanning provider '{}'", provider.name);
        registry.modules_for_provider(&provider.name, true)?;
    }
    Ok(providers.len())
}
