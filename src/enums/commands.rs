use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample configuration file
    Init,
    /// Check the configuration for problems
    Validate,
    /// Run the analysis stream server
    Serve {
        #[clap(short, long)]
        port: Option<u16>,
    },
    /// Stream a profile analysis from a running server
    Analyze {
        username: String,
        #[clap(short, long)]
        server: Option<String>,
        #[clap(short, long)]
        job_id: Option<String>,
        #[clap(short, long)]
        open: bool,
    },
    /// Show the stored progress of a job
    Progress {
        job_id: String,
        #[clap(short, long)]
        server: Option<String>,
    },
    /// Recompute the leaderboard from stored results
    Leaderboard,
}
