//! CLI module for the orchestrator
//!
//! - `serve`: run the HTTP server (default)

pub mod serve;

use clap::{Parser, Subcommand};

/// Tiered-state orchestrator with hot session cache and cold knowledge search
#[derive(Parser)]
#[command(name = "tiered-orchestrator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["tiered-orchestrator", "serve", "--port", "9000"]).unwrap();

        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(9000)),
            None => panic!("expected serve command"),
        }
    }

    #[test]
    fn test_no_subcommand_defaults() {
        let cli = Cli::try_parse_from(["tiered-orchestrator"]).unwrap();
        assert!(cli.command.is_none());
    }
}
