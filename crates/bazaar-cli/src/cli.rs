use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bazaar",
    about = "Bazaar — asset marketplace ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open a marketplace and print its operator and listing fee
    Deploy(MarketArgs),
    /// Run the list, buy, resell walkthrough against a fresh marketplace
    Demo(MarketArgs),
    /// Print the effective configuration as TOML
    Config(MarketArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct MarketArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the listing fee, e.g. 0.1
    #[arg(long)]
    pub fee: Option<String>,
    /// Override the operator by label
    #[arg(long)]
    pub operator: Option<String>,
}
