use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::store::source::{NamedLookup, Parameter, ParameterSource, StoreError};

/// In-memory parameter store, keyed by parameter name. Backs the test suites
/// and local experimentation; never talks to the network.
#[derive(Clone, Default)]
pub struct LocalParameterStore {
    records: Arc<RwLock<HashMap<String, Parameter>>>,
}

impl LocalParameterStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_parameters(parameters: Vec<Parameter>) -> Self {
        let store = Self::new();
        for parameter in parameters {
            store
                .records
                .write()
                .unwrap()
                .insert(parameter.name.clone(), parameter);
        }
        store
    }

    pub fn put(&self, parameter: Parameter) {
        self.records
            .write()
            .unwrap()
            .insert(parameter.name.clone(), parameter);
    }

    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }

    fn under_path(name: &str, path: &str) -> bool {
        match name.strip_prefix(path) {
            Some(rest) if rest.is_empty() => false,
            Some(rest) => rest.starts_with('/') || path.ends_with('/'),
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl ParameterSource for LocalParameterStore {
    async fn get_by_names(
        &self,
        names: &[String],
        _decrypt: bool,
    ) -> Result<NamedLookup, StoreError> {
        let records = self.records.read().unwrap();

        let mut lookup = NamedLookup::default();
        for name in names {
            match records.get(name) {
                Some(parameter) => lookup.parameters.push(parameter.clone()),
                None => lookup.invalid_names.push(name.clone()),
            }
        }

        Ok(lookup)
    }

    async fn get_by_path(
        &self,
        path: &str,
        recursive: bool,
        _decrypt: bool,
        _page_size: i32,
    ) -> Result<Vec<Parameter>, StoreError> {
        let records = self.records.read().unwrap();

        let mut parameters: Vec<Parameter> = records
            .values()
            .filter(|parameter| Self::under_path(&parameter.name, path))
            .filter(|parameter| {
                recursive || {
                    let rest = parameter.name[path.len()..].trim_start_matches('/');
                    !rest.contains('/')
                }
            })
            .cloned()
            .collect();

        parameters.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(parameters)
    }
}
