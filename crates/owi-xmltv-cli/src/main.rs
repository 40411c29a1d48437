use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use owi_xmltv_core::{ClientConfig, EpgFetcher, ScheduleDocumentGenerator};

#[derive(Parser, Debug)]
#[command(name = "owi2xmltv")]
#[command(version)]
#[command(about = "Save the EPG of an OpenWebif receiver as an XMLTV file")]
#[command(long_about = None)]
#[command(disable_help_flag = true)]
struct Cli {
    /// The name of the bouquet to parse. If not specified parse all bouquets
    #[arg(short, long)]
    bouquet: Option<String>,

    /// OpenWebif username
    #[arg(short, long)]
    username: Option<String>,

    /// OpenWebif password
    #[arg(short, long)]
    password: Option<String>,

    /// OpenWebif host
    #[arg(short, long, default_value = "localhost")]
    host: String,

    /// OpenWebif port
    #[arg(short = 'P', long, default_value_t = 80)]
    port: u16,

    /// Output file
    #[arg(short, long, default_value = "epg.xml")]
    output_file: String,

    /// Log every bouquet found on the receiver
    #[arg(short, long)]
    list_bouquets: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            ..ClientConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!(
        "owi_xmltv_core={level},owi2xmltv={level}",
        level = cli.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting owi2xmltv v{}", env!("CARGO_PKG_VERSION"));

    let fetcher = EpgFetcher::new(cli.client_config())?;

    if cli.list_bouquets {
        for bouquet in fetcher.list_bouquets().await? {
            info!("Found bouquet: {}", bouquet.name);
        }
    }

    let listing = fetcher.fetch_listing(cli.bouquet.as_deref()).await?;

    let generated_at = Local::now().fixed_offset();
    let xml = ScheduleDocumentGenerator::new(fetcher.api_root()).generate(&listing, &generated_at)?;

    info!("Saving XMLTV payload to file {}", cli.output_file);
    tokio::fs::write(&cli.output_file, &xml)
        .await
        .with_context(|| format!("Failed to write {}", cli.output_file))?;

    Ok(())
}
