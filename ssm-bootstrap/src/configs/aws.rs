use std::env;

use super::Configs;

/// AWS client settings taken from the environment. All optional; anything
/// unset falls through to the SDK's default resolution chain.
#[derive(Debug, Clone, Default)]
pub struct AwsClientConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

#[async_trait::async_trait]
impl Configs for AwsClientConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(AwsClientConfig {
            region: env::var("AWS_REGION").ok(),
            profile: env::var("AWS_PROFILE").ok(),
            endpoint_url: env::var("AWS_ENDPOINT")
                .or_else(|_| env::var("SSM_ENDPOINT"))
                .ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_load_reads_environment() {
        unsafe {
            env::set_var("AWS_REGION", "eu-west-1");
            env::set_var("AWS_PROFILE", "bootstrap");
            env::remove_var("AWS_ENDPOINT");
            env::set_var("SSM_ENDPOINT", "http://localhost:4566");
        }

        let config = AwsClientConfig::load().await.unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.profile.as_deref(), Some("bootstrap"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));

        unsafe {
            env::remove_var("AWS_REGION");
            env::remove_var("AWS_PROFILE");
            env::remove_var("SSM_ENDPOINT");
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_load_defaults_to_unset() {
        unsafe {
            env::remove_var("AWS_REGION");
            env::remove_var("AWS_PROFILE");
            env::remove_var("AWS_ENDPOINT");
            env::remove_var("SSM_ENDPOINT");
        }

        let config = AwsClientConfig::load().await.unwrap();
        assert_eq!(config.region, None);
        assert_eq!(config.profile, None);
        assert_eq!(config.endpoint_url, None);
    }
}
