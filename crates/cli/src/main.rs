use clap::Parser;
use relay_dns_domain::CliOverrides;
use relay_dns_infrastructure::dns::DnsServer;
use tokio_util::sync::CancellationToken;
use tracing::info;

mod bootstrap;

#[derive(Parser)]
#[command(name = "relay-dns")]
#[command(version)]
#[command(about = "Relay DNS - caching, forwarding DNS server with local records")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address, e.g. ":53" or "127.0.0.1:5353"
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen: cli.listen.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Relay DNS v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_file = cli.config.as_deref().unwrap_or("default"),
        listen = %config.server.listen,
        local_records = config.dns.records.len(),
        "Configuration loaded"
    );

    let shutdown = CancellationToken::new();
    bootstrap::spawn_signal_listener(shutdown.clone());

    DnsServer::from_config(&config)?.run(shutdown).await?;

    info!("Relay DNS stopped");
    Ok(())
}
