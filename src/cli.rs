use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "specials-admin",
    version,
    about = "Manage a restaurant's daily specials from the command line"
)]
pub struct Args {
    /// Base URL of the REST API
    #[arg(long, global = true, env = "SPECIALS_API_BASE_URL")]
    pub base_url: Option<String>,

    /// File holding the session tokens
    #[arg(long, global = true, env = "SPECIALS_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and store the session tokens
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "SPECIALS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// List one page of daily specials
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// List active daily specials
    Active,

    /// Totals and the most recently created specials
    Dashboard,

    /// Create a daily special
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Decimal price, e.g. 249.00
        #[arg(long)]
        price: String,

        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Update fields of a daily special
    Update {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        image: Option<PathBuf>,

        /// Set the active flag explicitly
        #[arg(long)]
        active: Option<bool>,
    },

    /// Flip the active flag of a daily special
    Toggle { id: u64 },

    /// Delete a daily special
    Delete { id: u64 },
}
