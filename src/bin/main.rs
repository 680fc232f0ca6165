use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use costar_rs::config::Config;

#[derive(Parser, Debug)]
#[command(name = "costar-server")]
#[command(about = "Film recommendations from similar actors' filmographies", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "costar-server.yaml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard over HTTP (the default)
    Serve,
    /// Print recommendations for one actor as JSON
    Recommend {
        actor: String,
        /// CSV file to read instead of the one named in the config file
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "costar_rs=debug,tower_http=debug"
    } else {
        "costar_rs=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match args.command.unwrap_or(Command::Serve) {
        Command::Serve => costar_rs::run(&args.config, args.debug).await,
        Command::Recommend { actor, dataset } => recommend(&args.config, &actor, dataset),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn recommend(config_path: &str, actor: &str, dataset: Option<PathBuf>) -> Result<(), costar_rs::ServerError> {
    // The config file is optional here; defaults apply when it is absent.
    let config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    let path = dataset.unwrap_or_else(|| config.dataset_path());

    let rec = costar_rs::recommend_once(&path, actor, &config.recommend)?;
    let json = serde_json::to_string_pretty(&rec)
        .map_err(|e| costar_rs::ServerError::Server(format!("Failed to encode result: {}", e)))?;
    println!("{}", json);
    Ok(())
}
