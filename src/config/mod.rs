pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text; batch reports are written as CSV
    #[default]
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "card-format")]
#[command(about = "Validate and format payment card input")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, help = "Override the output format")]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the card network detected from a number
    Network { number: String },

    /// Check length, prefix and checksum of a card number
    ValidateNumber { number: String },

    /// Check an expiry, either "MM/YY" or separate month and year
    ValidateExpiry {
        month: String,
        year: Option<String>,
    },

    /// Check a CVC, optionally against a network's CVC lengths
    ValidateCvc {
        cvc: String,
        #[arg(long)]
        network: Option<String>,
    },

    /// Group a card number for display
    FormatNumber { number: String },

    /// Render an expiry as "MM / YY"
    FormatExpiry { expiry: String },

    /// Run every applicable check on a card
    Check {
        number: String,
        #[arg(long)]
        expiry: Option<String>,
        #[arg(long)]
        cvc: Option<String>,
    },

    /// Check every row of a CSV file; card numbers are not written to the report
    Batch {
        input: String,
        #[arg(short, long, help = "Write the report here instead of stdout")]
        output: Option<String>,
    },

    /// List the built-in card networks
    Networks,
}
