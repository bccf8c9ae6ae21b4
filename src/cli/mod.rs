//! CLI module for Relay
//!
//! Command-line parsing for the relay-server binary. Uses clap for argument
//! parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Relay - intent routing for tool-using assistants
///
/// Serves `POST /orchestrate`: an LLM picks one tool (news, weather, stocks,
/// Wikipedia, calculator) for each query, or answers conversationally.
#[derive(Parser, Debug)]
#[command(
    name = "relay-server",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Relay - intent routing for tool-using assistants",
    after_help = "EXAMPLES:\n    \
                  relay-server                          # Start the server (relay.toml optional)\n    \
                  relay-server --config my.toml serve   # Use a custom config file\n    \
                  relay-server ask \"weather in Paris\"   # Answer one query and exit\n    \
                  relay-server tools                    # List registered tools"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "relay.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Orchestrate a single query and print the result
    Ask {
        /// The query, e.g. "what is the weather in Paris?"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// List the tools the router can choose from
    Tools,

    /// Show the effective configuration
    Config {
        /// Only validate, print nothing on success
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, `serve` when none was given.
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
