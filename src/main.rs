//! MosaicBeat API binary entrypoint.
//! Boots the Axum HTTP server: config, tracing, metrics, routes.

use mosaicbeat::{config, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install tracing. JSON output with MOSAICBEAT_LOG_JSON=1.
/// Leaves an already-installed subscriber (e.g. the runtime's) alone.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mosaicbeat=info,warn"));

    let json = std::env::var("MOSAICBEAT_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = config::load_default()?;
    let mut router = mosaicbeat::app(&cfg)?;

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = %e, "metrics recorder not installed; /metrics disabled"),
    }

    Ok(router.into())
}
