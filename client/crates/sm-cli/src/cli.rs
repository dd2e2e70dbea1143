use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "sm-session")]
#[command(about = "School manager session client")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Server URL (overrides api.base_url)
    #[arg(long, global = true)]
    pub(crate) server: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,
}
