use crate::config::EngineConfig;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered at `config.log_level`.
///
/// Returns `false` when a global subscriber is already set, which is the
/// normal case for tests and for hosts that configure tracing themselves.
pub fn init_tracing(config: &EngineConfig) -> bool {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
