use clap::Parser;
use env_logger::Env;
use unveiled_analyzer::errors::ErrorHandler;
use unveiled_analyzer::structs::cli::Cli;
use unveiled_analyzer::workers::command_runner::CommandRunner;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let mut runner = CommandRunner::new();

    if let Err(e) = runner.run_command(cli.command).await {
        ErrorHandler::handle_error(&e);
        std::process::exit(1);
    }
}
