use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ytsdebrid")]
#[command(author, version, about = "YTS movie catalog addon with Real-Debrid stream conversion")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the addon server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve streams for a single title and print them
    Resolve {
        /// External id, e.g. tt0111161
        #[arg(required = true)]
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one catalog page
    Catalog {
        /// Genre filter
        #[arg(long)]
        genre: Option<String>,

        /// Number of items already shown
        #[arg(long)]
        skip: Option<u32>,
    },

    /// Check the configured debrid API key against the provider
    CheckKey,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
