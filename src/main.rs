use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use upc_scraper::client::UpcClient;
use upc_scraper::config::Config;
use upc_scraper::{logging, optout, proceedings, sink};

#[derive(Parser)]
#[command(name = "upc_scraper")]
#[command(about = "Unified Patent Court case and opt-out scraper")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch opt-out records for a list of patent numbers
    OptOuts {
        /// Input .xlsx with patent numbers in the first column
        #[arg(long)]
        input: PathBuf,
        /// Directory the timestamped output workbook is written to
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },
    /// Fetch all proceedings received within the recent query window
    Proceedings {
        /// Directory the timestamped output workbook is written to
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Override the configured query window width in days
        #[arg(long)]
        days: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::OptOuts { input, output_dir } => {
            println!("🔄 Running opt-out pipeline...");

            let patent_numbers = sink::read_patent_numbers(&input)?;
            info!(patents = patent_numbers.len(), "loaded patent list");
            println!("   Patents to query: {}", patent_numbers.len());

            let client = UpcClient::new(config.api, config.retry);
            let tables = optout::run(&client, &patent_numbers).await?;
            let output_file = sink::write_opt_outs(&output_dir, &tables)?;

            println!("\n📊 Opt-out results:");
            println!("   Latest rows: {}", tables.latest.len());
            println!("   Historical rows: {}", tables.historical.len());
            println!("   Output file: {}", output_file.display());
        }
        Commands::Proceedings { output_dir, days } => {
            println!("🔄 Running proceedings pipeline...");

            if let Some(days) = days {
                config.api.window_days = days;
            }
            let client = UpcClient::new(config.api, config.retry);
            let rows = proceedings::run(&client).await?;
            let output_file = sink::write_proceedings(&output_dir, &rows)?;

            println!("\n📊 Proceedings results:");
            println!("   Rows: {}", rows.len());
            println!("   Output file: {}", output_file.display());
        }
    }
    Ok(())
}
