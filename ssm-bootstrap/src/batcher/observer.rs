use tracing::{info, warn};

/// Progress callbacks emitted while a fetch pass runs. Inject a different
/// implementation to capture progress somewhere other than the log stream.
pub trait FetchObserver: Send + Sync {
    fn config_written(&self, _name: &str, _version: i64) {}
    fn prefix_loaded(&self, _path: &str, _count: usize) {}
    fn env_var_added(&self, _name: &str) {}
    fn invalid_parameters(&self, _names: &[String]) {}
}

/// Default observer, reporting through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn config_written(&self, name: &str, version: i64) {
        info!("writing config '{}' (version {})", name, version);
    }

    fn prefix_loaded(&self, path: &str, count: usize) {
        info!("got {} parameters under '{}'", count, path);
    }

    fn env_var_added(&self, name: &str) {
        info!("adding env '{}'", name);
    }

    fn invalid_parameters(&self, names: &[String]) {
        warn!("parameters not returned by the store: {}", names.join(", "));
    }
}
