use clap::{Parser, Subcommand};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "credfill",
    version,
    about = "Login-form detection and credential autofill engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: credfill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the form detector and page classifier over a page snapshot
    Analyze {
        /// Path to a page snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Generate memorable passwords
    Generate {
        /// How many passwords to print
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
}
