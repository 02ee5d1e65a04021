use std::fmt;

use chrono::{DateTime, Utc};

/// A single record fetched from the parameter store.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    pub version: i64,
    pub last_modified: DateTime<Utc>,
}

/// Result of a lookup by explicit names. The store may omit names it could
/// not resolve (not found, access denied); those come back in
/// `invalid_names` instead of failing the call.
#[derive(Debug, Clone, Default)]
pub struct NamedLookup {
    pub parameters: Vec<Parameter>,
    pub invalid_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    CallFailed(String),
    InvalidRecord(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallFailed(msg) => write!(f, "Store call failed: {}", msg),
            Self::InvalidRecord(msg) => write!(f, "Invalid store record: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Capability the batcher depends on; concrete stores live in `adapters`.
#[async_trait::async_trait]
pub trait ParameterSource: Send + Sync {
    /// Fetch an explicit set of parameters. Names absent from the store are
    /// reported through `NamedLookup::invalid_names`, not as an error.
    async fn get_by_names(&self, names: &[String], decrypt: bool)
    -> Result<NamedLookup, StoreError>;

    /// Fetch every parameter stored under `path`, exhausting pagination with
    /// the given page size before returning.
    async fn get_by_path(
        &self,
        path: &str,
        recursive: bool,
        decrypt: bool,
        page_size: i32,
    ) -> Result<Vec<Parameter>, StoreError>;
}
