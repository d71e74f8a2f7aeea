use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "unveiled")]
#[clap(about = "GitHub profile analysis with live progress streaming", long_about = None)]
#[clap(version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
