use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ssm_bootstrap::batcher::Batcher;
use ssm_bootstrap::configs::{AwsClientConfig, Configs, FetchPlan, parse_pair};
use ssm_bootstrap::store::adapters::ssm_store::SsmParameterStore;

#[derive(Parser, Debug)]
#[command(version, about = "Materialize AWS SSM parameters as local config and env files", long_about = None)]
struct Args {
    /// Print the resolved fetch plan without writing any files
    #[arg(long)]
    dry_run: bool,

    /// Page size used when listing parameters under a path prefix
    #[arg(long, default_value_t = 10)]
    batch: i32,

    /// Discover the AWS region from EC2 instance metadata
    #[arg(long)]
    ec2_discovery: bool,

    /// SSM parameter name and configuration target path (repeatable)
    #[arg(long = "config", value_name = "NAME=PATH", value_parser = parse_pair)]
    configs: Vec<(String, String)>,

    /// SSM path prefix and env file target path (repeatable)
    #[arg(long = "env-file", value_name = "PREFIX=PATH", value_parser = parse_pair)]
    env_files: Vec<(String, String)>,

    /// Mapping file with "configs" and "env-files" sections
    #[arg(long, value_name = "FILE")]
    mapping: Option<PathBuf>,
}

fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_level(true)
        .try_init();
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    setup_logging();

    let args = Args::parse();

    if let Err(err) = run(args).await {
        error!("{}", err);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut plan = match &args.mapping {
        Some(path) => FetchPlan::from_file(path)?,
        None => FetchPlan::discover()?,
    };
    plan.add_config_pairs(&args.configs);
    plan.add_env_file_pairs(&args.env_files);

    if plan.is_empty() {
        warn!("no configs or env files requested, nothing to do");
    }

    if args.dry_run {
        info!("dry run enabled, not writing any files");
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let aws_config = AwsClientConfig::load().await?;
    let store = SsmParameterStore::new(&aws_config, args.ec2_discovery).await?;
    let batcher = Batcher::new(Arc::new(store), args.batch);

    batcher.write_configs(&plan.configs).await?;
    batcher.write_env_files(&plan.env_files).await?;

    Ok(())
}
