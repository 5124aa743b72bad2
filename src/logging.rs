use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "feed_cache=debug,info";

/// Installs a global subscriber. Later calls, or an embedding application
/// that already installed its own, leave the existing one in place.
pub fn init() {
    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if installed.is_ok() {
        tracing::debug!("feed cache logging initialized");
    }
}
