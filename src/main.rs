use clap::Parser;
use tiered_orchestrator::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(cli::serve::ServeArgs::default())) {
        Command::Serve(args) => cli::serve::run(args).await,
    }
}
