use clap::{Parser, Subcommand};
use mcstore::{McConfig, OutputFormat};
use tracing::Level;

mod commands;

// Re-export argument types from command modules for use in the Commands enum
use commands::backup::BackupArgs;
use commands::config::ConfigArgs;
use commands::init::InitArgs;
use commands::settings::SettingsArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.mcstore/mcstore.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long, global = true)]
    debug: bool,

    /// Output format: table (default), markdown, json, json-pretty
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the store, creating and upgrading it as needed
    Init(InitArgs),

    /// Show store file, schema version and pending upgrades without modifying anything
    Status,

    /// Show reminder settings, phrases or rest actions
    Settings(SettingsArgs),

    /// Copy the store file to a timestamped sibling
    Backup(BackupArgs),

    /// Show configuration
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match McConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level INFO or higher.
            .with_max_level(Level::INFO)
            .init();
    }

    let output_format = cli.format;

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(&config, args, output_format),
        Commands::Status => commands::status::run(&config, output_format),
        Commands::Settings(args) => commands::settings::run(&config, args, output_format),
        Commands::Backup(args) => commands::backup::run(&config, args, output_format),
        Commands::Config(args) => commands::config::run(&config, args, output_format),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {:#}", e);
        std::process::exit(1);
    }
}
