mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;
use vidgrab::api::error::INSPECTION_FAILED_MESSAGE;
use vidgrab::config::Config;
use vidgrab::engine::YtDlp;
use vidgrab::inspector::FormatInspector;
use vidgrab::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    observability::init_tracing();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Server(args) => vidgrab::api::run(config, args.address).await?,
        Commands::Inspect(args) => {
            let inspector = FormatInspector::new(Arc::new(YtDlp::from_config(&config.engine)));
            let Ok(summary) = inspector.inspect(&args.url).await else {
                eprintln!("{INSPECTION_FAILED_MESSAGE}");
                std::process::exit(1);
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
