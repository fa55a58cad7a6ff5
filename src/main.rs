use campaign_tracker::config::{Config, DatabaseBackend};
use campaign_tracker::Error;
use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "campaign-tracker")]
#[command(about = "Tracks advertising campaign budgets and spend")]
#[command(version)]
struct Cli {
    /// Address to listen on (overrides config)
    #[arg(long, env = "CAMPAIGN_TRACKER__BIND")]
    bind: Option<String>,

    /// Keep campaigns in memory instead of MongoDB
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Drop all campaigns and insert demo data on startup
    #[arg(long, default_value_t = false)]
    seed: bool,
}

#[actix_web::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if cli.memory {
        config.database.backend = DatabaseBackend::Memory;
    }
    if cli.seed {
        config.seed = true;
    }

    info!(
        bind = %config.bind,
        backend = ?config.database.backend,
        seed = config.seed,
        "campaign tracker starting"
    );

    campaign_tracker::run(config).await
}
