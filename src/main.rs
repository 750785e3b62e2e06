mod cli;
mod config;

use clap::Parser;
use cli::Cli;
use config::CliConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    if let Err(e) = cli::run(cli, &config) {
        if json {
            println!("{}", serde_json::json!({"error": e.to_string()}));
        } else {
            eprintln!("❌ {}", e);
        }
        return Err(e);
    }

    Ok(())
}
