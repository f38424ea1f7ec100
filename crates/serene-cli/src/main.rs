use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "serene", version, about = "Serene consumption-limit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Limit management
    Limit {
        #[command(subcommand)]
        action: commands::limit::LimitAction,
    },
    /// Log consumption against a limit
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Aggregate game status across all limits
    Game {
        #[command(subcommand)]
        action: commands::game::GameAction,
    },
    /// Global clean-time tracking
    Clean {
        #[command(subcommand)]
        action: commands::clean::CleanAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Encrypted export and import
    Data {
        #[command(subcommand)]
        action: commands::data::DataAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Limit { action } => commands::limit::run(action),
        Commands::Log { action } => commands::log::run(action),
        Commands::Game { action } => commands::game::run(action),
        Commands::Clean { action } => commands::clean::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Data { action } => commands::data::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
