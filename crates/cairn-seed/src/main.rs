//! CLI entry point for the cairn-seed graph tool.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use cairn_auth::{SecurityClient, SecurityConfig};
use cairn_core::CairnConfig;
use cairn_graph::{ClientPool, GraphConfig};

use cairn_seed::error::SeedError;
use cairn_seed::run::run_seed;
use cairn_seed::seeder::{SeedProfile, Seeder};

#[derive(Parser)]
#[command(name = "cairn-seed")]
#[command(about = "Push the canned demo graph to the graph service")]
struct Cli {
    /// Directory containing *.toml configuration files.
    #[arg(short = 'f', long = "config-file", alias = "configFile")]
    config_file: PathBuf,

    /// Whether to (re)create the schema first: true or false.
    #[arg(short = 'c', long = "create", value_parser = parse_bool_literal)]
    create: bool,

    /// Query the seeded vertex back after the send and report the count.
    #[arg(long)]
    verify: bool,
}

fn parse_bool_literal(s: &str) -> Result<bool, String> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("expected \"true\" or \"false\", got \"{s}\"")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, config_dir = %cli.config_file.display(), "Starting seed run");

    let config = CairnConfig::load_from_dir(&cli.config_file)?;

    let graph_config = GraphConfig {
        uri: config.graph.uri.clone(),
        user: config.graph.user.clone(),
        password: config.graph.password.clone(),
        max_connections: config.graph.max_connections,
        fetch_size: config.graph.fetch_size,
    };
    let pool = ClientPool::connect("graph-service", &graph_config, config.graph.pool_size)
        .await
        .map_err(SeedError::ClientAcquisition)?;

    let profile = SeedProfile::from_config(&config);
    let security = SecurityClient::new(SecurityConfig {
        endpoint: config.security.endpoint.clone(),
        security_id: profile.security_id.clone(),
        timeout_secs: config.security.timeout_secs,
    })
    .map_err(SeedError::TokenAcquisition)?;
    let token = security
        .fetch_app_token()
        .await
        .map_err(SeedError::TokenAcquisition)?;

    let seeder = Seeder::new(profile);
    let outcome = run_seed(&pool, &seeder, &token, cli.create, cli.verify).await?;

    tracing::info!(
        %run_id,
        schema = ?outcome.report.schema,
        write = ?outcome.report.write,
        "Seed run complete"
    );
    if let Some(found) = outcome.verified {
        tracing::info!(found, "Verified seeded vertices");
    }

    Ok(())
}
