use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const DEFAULT_LOG_FILTER: &str =
    "sparklight_core=info,sparklight_plugin_spark=info,sparklight_plugin_api=info";

pub fn init() {
    init_with_default(DEFAULT_LOG_FILTER);
}

pub fn init_with_default(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A host may already own the global subscriber.
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already set");
    }
}

pub fn init_dev() {
    init_with_default("sparklight_core=debug,sparklight_plugin_spark=debug,sparklight_plugin_api=debug");
}
