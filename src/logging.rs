//! Log output setup for binaries and demos.
//!
//! The library itself only emits `tracing` events; nothing is printed until a
//! subscriber is installed.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::types::*;

/// Install a formatted log subscriber.
///
/// `default_directive` (e.g. `"finance_core=info"`) applies unless `RUST_LOG`
/// is set. Fails if a global subscriber is already installed.
pub fn init_tracing(default_directive: &str) -> FinanceResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| FinanceError::Config(format!("invalid log filter: {}", e)))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .map_err(|e| FinanceError::Config(format!("could not install log subscriber: {}", e)))
}
