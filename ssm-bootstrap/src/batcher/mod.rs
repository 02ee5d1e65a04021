pub mod observer;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::files;
use crate::store::source::ParameterSource;

pub use observer::{FetchObserver, TracingObserver};

const DEFAULT_BATCH: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    FetchFailed(String),
    WriteFailed(String),
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
            Self::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
        }
    }
}

impl std::error::Error for BatchError {}

/// Fetch-and-write orchestrator. Holds the store capability and the page
/// size used for path lookups; safe to reuse across calls, but concurrent
/// calls over overlapping targets are not serialized here.
pub struct Batcher {
    source: Arc<dyn ParameterSource>,
    batch: i32,
    observer: Arc<dyn FetchObserver>,
}

impl Batcher {
    pub fn new(source: Arc<dyn ParameterSource>, batch: i32) -> Self {
        let batch = if batch <= 0 { DEFAULT_BATCH } else { batch };

        Self {
            source,
            batch,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn FetchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Fetch every parameter named in `targets` and write each value to its
    /// target path, stamping the file with the parameter's last-modified
    /// timestamp. Names the store does not return are reported to the
    /// observer and produce no file; the first store or filesystem failure
    /// aborts the pass.
    pub async fn write_configs(
        &self,
        targets: &BTreeMap<String, PathBuf>,
    ) -> Result<(), BatchError> {
        let names: Vec<String> = targets.keys().cloned().collect();

        let lookup = self
            .source
            .get_by_names(&names, true)
            .await
            .map_err(|e| {
                BatchError::FetchFailed(format!(
                    "failed to get parameters [{}]: {}",
                    names.join(", "),
                    e
                ))
            })?;

        if !lookup.invalid_names.is_empty() {
            self.observer.invalid_parameters(&lookup.invalid_names);
        }

        // writes follow the store's response order
        for parameter in &lookup.parameters {
            let Some(path) = targets.get(&parameter.name) else {
                continue;
            };

            self.observer
                .config_written(&parameter.name, parameter.version);

            files::write_config_file(path, &parameter.value, parameter.last_modified).map_err(
                |e| {
                    BatchError::WriteFailed(format!(
                        "failed to write file '{}' for parameter '{}': {}",
                        path.display(),
                        parameter.name,
                        e
                    ))
                },
            )?;
        }

        Ok(())
    }

    /// For each path prefix in `env_files`, fetch every parameter stored
    /// under it and aggregate them into one env file, replacing any prior
    /// content. Prefixes are processed in sorted order; a failure on any
    /// prefix aborts the remaining ones.
    pub async fn write_env_files(
        &self,
        env_files: &BTreeMap<String, PathBuf>,
    ) -> Result<(), BatchError> {
        for (prefix, env_path) in env_files {
            let parameters = self
                .source
                .get_by_path(prefix, true, true, self.batch)
                .await
                .map_err(|e| {
                    BatchError::FetchFailed(format!(
                        "failed to get parameters under '{}': {}",
                        prefix, e
                    ))
                })?;

            self.observer.prefix_loaded(prefix, parameters.len());

            // last write wins when two names collapse to the same variable
            let mut envs = BTreeMap::new();
            for parameter in &parameters {
                let env_name = env_var_name(&parameter.name, prefix);
                self.observer.env_var_added(&env_name);
                envs.insert(env_name, parameter.value.clone());
            }

            files::write_env_file(env_path, &envs).map_err(|e| {
                BatchError::WriteFailed(format!(
                    "failed to write env file '{}': {}",
                    env_path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

/// Convert a parameter name to an environment variable name by removing the
/// base path prefix, trimming leading slashes, replacing the remaining
/// slashes with underscores, and upper-casing.
///
/// For example:
///   - name "/app/database/HOST", base "/app/database" -> "HOST"
///   - name "/app/api/port", base "/app" -> "API_PORT"
pub fn env_var_name(parameter_name: &str, base_path: &str) -> String {
    let trimmed = parameter_name
        .strip_prefix(base_path)
        .unwrap_or(parameter_name);

    trimmed
        .trim_start_matches('/')
        .replace('/', "_")
        .to_uppercase()
}
