use std::time::SystemTime;

use anyhow::Result as AnyResult;
use aws_config::BehaviorVersion;
use aws_config::imds::region::ImdsRegionProvider;
use aws_sdk_ssm::Client;
use aws_types::region::Region;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::configs::AwsClientConfig;
use crate::store::source::{NamedLookup, Parameter, ParameterSource, StoreError};

/// Parameter store backed by AWS SSM Parameter Store.
#[derive(Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    /// Build a store from the ambient AWS configuration, with optional
    /// profile/region/endpoint overrides. When `ec2_discovery` is set the
    /// region is resolved from EC2 instance metadata instead of the
    /// configured one.
    pub async fn new(config: &AwsClientConfig, ec2_discovery: bool) -> AnyResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        if ec2_discovery {
            debug!("resolving region from EC2 instance metadata");
            loader = loader.region(ImdsRegionProvider::builder().build());
        } else if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let shared_config = loader.load().await;

        Ok(Self::with_client(Client::new(&shared_config)))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl std::fmt::Debug for SsmParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsmParameterStore").finish()
    }
}

fn convert(param: &aws_sdk_ssm::types::Parameter) -> Result<Parameter, StoreError> {
    let name = param
        .name()
        .ok_or_else(|| StoreError::InvalidRecord("parameter has no name".to_string()))?;

    let value = param
        .value()
        .ok_or_else(|| StoreError::InvalidRecord(format!("parameter '{}' has no value", name)))?;

    let last_modified = param
        .last_modified_date()
        .cloned()
        .and_then(|date| SystemTime::try_from(date).ok())
        .map(DateTime::<Utc>::from)
        .ok_or_else(|| {
            StoreError::InvalidRecord(format!("parameter '{}' has no last modified date", name))
        })?;

    Ok(Parameter {
        name: name.to_string(),
        value: value.to_string(),
        version: param.version(),
        last_modified,
    })
}

#[async_trait::async_trait]
impl ParameterSource for SsmParameterStore {
    async fn get_by_names(
        &self,
        names: &[String],
        decrypt: bool,
    ) -> Result<NamedLookup, StoreError> {
        let result = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(decrypt)
            .send()
            .await
            .map_err(|e| StoreError::CallFailed(format!("GetParameters failed: {}", e)))?;

        let parameters = result
            .parameters()
            .iter()
            .map(convert)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NamedLookup {
            parameters,
            invalid_names: result.invalid_parameters().to_vec(),
        })
    }

    async fn get_by_path(
        &self,
        path: &str,
        recursive: bool,
        decrypt: bool,
        page_size: i32,
    ) -> Result<Vec<Parameter>, StoreError> {
        let mut pages = self
            .client
            .get_parameters_by_path()
            .path(path)
            .recursive(recursive)
            .with_decryption(decrypt)
            .into_paginator()
            .page_size(page_size)
            .send();

        let mut parameters = Vec::new();
        while let Some(page) = pages.try_next().await.map_err(|e| {
            StoreError::CallFailed(format!("GetParametersByPath failed for '{}': {}", path, e))
        })? {
            debug!("got page of {} parameters under '{}'", page.parameters().len(), path);
            for param in page.parameters() {
                parameters.push(convert(param)?);
            }
        }

        Ok(parameters)
    }
}
