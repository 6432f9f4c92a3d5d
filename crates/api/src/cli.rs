//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Rentdesk - multi-tenant rental management API
#[derive(Parser, Debug)]
#[command(name = "rentdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Inspect the CORS origin policy
    Origins(OriginsArgs),

    /// Print the OpenAPI document as JSON
    Openapi,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides SERVER_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (overrides SERVER_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the origins command
#[derive(Parser, Debug)]
pub struct OriginsArgs {
    #[command(subcommand)]
    pub action: OriginsAction,
}

#[derive(Subcommand, Debug)]
pub enum OriginsAction {
    /// Show which rule admits an origin
    Check {
        /// Origin as sent by a browser, e.g. "http://localhost:5173"
        origin: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_origin_check() {
        let cli = Cli::parse_from(["rentdesk", "origins", "check", "http://localhost:5173"]);
        match cli.command {
            Commands::Origins(OriginsArgs {
                action: OriginsAction::Check { origin },
            }) => assert_eq!(origin, "http://localhost:5173"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_overrides_are_optional() {
        let cli = Cli::parse_from(["rentdesk", "-v", "serve", "--port", "9000"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
