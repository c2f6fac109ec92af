//! CLI module for the ID registry
//!
//! - `serve`: run the HTTP service (default)
//! - `check-config`: load and validate configuration, then exit

pub mod serve;

use clap::{Parser, Subcommand};

/// IP-bound ID registry
#[derive(Parser)]
#[command(name = "id-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP service
    Serve,

    /// Validate configuration and print the effective settings
    CheckConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["id-registry"]);
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["id-registry", "serve"]);
        assert_eq!(cli.command, Some(Command::Serve));

        let cli = Cli::parse_from(["id-registry", "check-config"]);
        assert_eq!(cli.command, Some(Command::CheckConfig));
    }
}
