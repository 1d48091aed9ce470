//! CLI module for the semantic response cache
//!
//! - `serve`: run the HTTP API

pub mod serve;

use clap::{Parser, Subcommand};

/// Semantic response cache in front of a remote LLM
#[derive(Parser)]
#[command(name = "semantic-response-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the query and admin API server
    Serve(serve::ServeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["semantic-response-cache", "serve"]).unwrap();

        let Command::Serve(args) = cli.command;
        assert!(args.port.is_none());
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from([
            "semantic-response-cache",
            "serve",
            "--port",
            "9000",
            "--capacity",
            "10",
        ])
        .unwrap();

        let Command::Serve(args) = cli.command;
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.capacity, Some(10));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["semantic-response-cache"]).is_err());
    }
}
