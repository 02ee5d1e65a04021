use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const SYSTEM_PLAN_PATH: &str = "/etc/ssm-bootstrap.json";
const USER_PLAN_FILE: &str = ".ssm-bootstrap.json";

/// The two mappings a run operates on: parameter name to config file path,
/// and path prefix to env file path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchPlan {
    #[serde(default)]
    pub configs: BTreeMap<String, PathBuf>,

    #[serde(default, rename = "env-files")]
    pub env_files: BTreeMap<String, PathBuf>,
}

impl FetchPlan {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read mapping file '{}': {}", path.display(), e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse mapping file '{}': {}", path.display(), e))
    }

    /// Load the first mapping file found in the default locations, or an
    /// empty plan when none exists.
    pub fn discover() -> Result<Self, String> {
        for path in default_plan_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Flag-supplied pairs override file entries with the same key.
    pub fn add_config_pairs(&mut self, pairs: &[(String, String)]) {
        for (name, path) in pairs {
            self.configs.insert(name.clone(), PathBuf::from(path));
        }
    }

    pub fn add_env_file_pairs(&mut self, pairs: &[(String, String)]) {
        for (prefix, path) in pairs {
            self.env_files.insert(prefix.clone(), PathBuf::from(path));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty() && self.env_files.is_empty()
    }
}

fn default_plan_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_PLAN_PATH)];

    if let Ok(home) = env::var("HOME") {
        paths.push(Path::new(&home).join(USER_PLAN_FILE));
    }

    paths
}

/// clap value parser for `KEY=VALUE` pairs.
pub fn parse_pair(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", input)),
    }
}
