use std::path::PathBuf;

use clap::Parser;

/// Discord poll bot with a web results surface.
#[derive(Debug, Parser)]
#[command(name = "plinko-server", version)]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "plinko.toml")]
    pub config: PathBuf,

    /// Override the configured bind address.
    #[arg(long)]
    pub bind_address: Option<String>,
}
