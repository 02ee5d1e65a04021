pub mod aws;
pub mod targets;

pub use aws::AwsClientConfig;
pub use targets::{FetchPlan, parse_pair};

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}
