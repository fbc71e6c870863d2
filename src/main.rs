use clap::{Parser, Subcommand};
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::process;
use streamscout::{
    Extension, ExtensionConfig, FeedExtension, MetadataExtension, VideoExtension,
};

/// Query the streaming catalog from the command line
#[derive(Debug, Parser)]
#[command(name = "streamscout", version, about)]
struct Cli {
    /// Path to a configuration file (defaults to the user config, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// User agent sent to upstream sites and attached to resolved streams
    #[arg(long, global = true)]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the catalog
    Search { query: String },

    /// Show details for a `<numericId>-<slug>` id
    Show { id: String },

    /// List the episodes of one season
    Episodes { id: String, season: u32 },

    /// Resolve playable streams for `<numericId>` or `<numericId>?episode_id=<episodeId>`
    Assets { id: String },

    /// Print the home feed collections
    Feed,

    /// Print the trending shows
    Trending,
}

/// Prints a value as pretty JSON on stdout
fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints an error and all of its causes to stderr
fn report_error(error: &dyn Error) {
    eprintln!("Error: {error}");

    let mut source = error.source();
    while let Some(cause) = source {
        eprintln!("  Caused by: {cause}");
        source = cause.source();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = ExtensionConfig::load(cli.config.as_deref())?;
    config.apply_user_agent(cli.user_agent);

    let extension = Extension::new(config)?;

    match cli.command {
        Command::Search { query } => print_json(&extension.fetch_shows_by_query(&query).await?),
        Command::Show { id } => print_json(&extension.fetch_show(&id).await?),
        Command::Episodes { id, season } => {
            print_json(&extension.fetch_episodes(&id, season).await?)
        }
        Command::Assets { id } => print_json(&extension.fetch_video_assets(&id).await?),
        Command::Feed => print_json(&extension.fetch_feed_collections().await?),
        Command::Trending => print_json(&extension.fetch_trending_shows().await?),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the default filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("streamscout=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        report_error(e.as_ref());
        process::exit(1);
    }
}
