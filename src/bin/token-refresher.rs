use anyhow::{bail, Result};
use clap::Parser;
use token_refresher::utils::config_loader;
use token_refresher::utils::logging;
use token_refresher::utils::logging::LogLevel;
use token_refresher::{TokenProvider, TokenStatus};
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "token-refresher.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 2. Wire secret store and remote API
    // -------------------------------

    let provider = TokenProvider::from_config(&service_config)?;
    let refs = service_config.secret_store.token_refs();

    // -------------------------------
    // 3. Probe and refresh if needed
    // -------------------------------

    info!(
        project = %service_config.secret_store.project,
        token_secret = %refs.token.name,
        "token refresh starting"
    );
    let fresh = provider
        .ensure_fresh_token(&refs)
        .await
        .inspect_err(|err| error!(stage = %err.stage(), error = %err, "token refresh failed"))?;

    match fresh.status {
        TokenStatus::Cached => info!("token still valid"),
        TokenStatus::Refreshed => info!("token refreshed"),
        TokenStatus::Unpersisted(err) => bail!("token refreshed but not stored: {}", err),
    }

    Ok(())
}
