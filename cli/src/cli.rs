use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Memory,
    Sqlite,
}

#[derive(Debug, Parser)]
#[clap(name = "adapter-check", version)]
pub struct Cli {
    /// Reference adapter to run the conformance suite against
    #[clap(long, value_enum)]
    pub backend: Option<Backend>,

    /// SQLite connection string (sqlite backend only)
    #[clap(long)]
    pub database_url: Option<String>,

    /// Emit logs as JSON lines
    #[clap(long)]
    pub json_logs: bool,

    /// Only print the final outcome
    #[clap(long, short)]
    pub quiet: bool,
}
