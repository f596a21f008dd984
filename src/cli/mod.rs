//! CLI command definitions and parsing
use crate::extraction::ExtractionMode;
use crate::layout::{ScaleKind, SpiralKind};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "yuntu",
    version,
    author = "neur0map",
    about = "Word cloud layout generator for Chinese and mixed-script text",
    long_about = "Yuntu extracts weighted keywords from text, merges them with your own exclusions and \
                  inclusions, and lays them out as a non-overlapping word cloud. The layout is printed as \
                  JSON for any renderer to draw."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/yuntu/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Source text and word adjustments shared by `generate` and `words`
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Text file to analyse ("-" or omitted reads stdin unless --text is given)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Source text given inline
    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    /// Words to leave out, separated by commas, spaces or newlines
    #[arg(short, long, default_value = "")]
    pub exclude: String,

    /// Words to force in, as `word` or `word:weight`
    #[arg(short, long, default_value = "")]
    pub include: String,

    /// Extraction backend (overrides config)
    #[arg(long, value_enum)]
    pub mode: Option<ExtractionMode>,

    /// Profile to apply from the config file
    #[arg(short, long)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a word cloud layout and print it as JSON
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<f64>,

        /// Random seed for a reproducible layout
        #[arg(long)]
        seed: Option<u64>,

        /// Spiral used to search for free space
        #[arg(long, value_enum)]
        spiral: Option<SpiralKind>,

        /// Weight to font size mapping
        #[arg(long, value_enum)]
        scale: Option<ScaleKind>,

        /// Number of discrete rotation angles
        #[arg(long)]
        rotation_steps: Option<u32>,

        /// Write the layout to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the ranked keyword list without laying it out
    Words {
        #[command(flatten)]
        input: InputArgs,

        /// Show at most this many words
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
