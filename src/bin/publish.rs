use clap::Parser;
use dotenvy::dotenv;
use site_publisher::infrastructure::storage;
use site_publisher::models::Stage;
use site_publisher::services::artifact_upload::{find_archive, upload_artifact};
use site_publisher::utils::telemetry::init_tracing;
use std::path::PathBuf;
use tracing::info;

/// Uploads a site archive to the artifacts folder of the site bucket, which
/// triggers the publisher function.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Site bucket receiving the archive
    #[arg(short, long, env = "SITE_BUCKET")]
    bucket: String,

    /// Target stage (alpha, prod)
    #[arg(short, long, default_value = "prod")]
    stage: Stage,

    /// Archive to upload; defaults to the first .zip of the current directory
    archive: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let archive = match args.archive {
        Some(path) => path,
        None => find_archive(&std::env::current_dir()?)?,
    };

    let aws_config = storage::load_aws_config().await;
    let store = storage::setup_storage(&aws_config);
    let key = upload_artifact(store.as_ref(), &args.bucket, args.stage, &archive).await?;

    info!(
        "✅ Uploaded to s3://{}/{}; the {} site is published once the trigger completes",
        args.bucket, key, args.stage
    );
    Ok(())
}
