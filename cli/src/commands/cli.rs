use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "escoba-cli", about = "Run and watch AI Escoba simulations")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.escoba/config.toml or ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Number of AI players; clamped to the configured bounds.
    #[arg(long)]
    pub players: Option<usize>,

    /// Model per player, in order. A value outside the catalog (or
    /// `custom:<id>`) is used as a custom override.
    /// Can be specified multiple times.
    #[arg(long = "model", action = clap::ArgAction::Append)]
    pub models: Vec<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Pause between narrated events.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Give up on the simulate request after this long.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub tui: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ModelsArgs {
    #[arg(long)]
    pub base_url: Option<String>,

    /// Fail instead of falling back to an empty catalog.
    #[arg(long, default_value_t = false)]
    pub refresh: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Run(RunArgs),
    Models(ModelsArgs),
}
