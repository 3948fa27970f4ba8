//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

use crate::rag::Mode;

#[derive(Parser)]
#[command(name = "docrag")]
#[command(about = "Ask questions about a directory of PDF documents")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a TOML config file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS
        #[arg(long)]
        cors: bool,
    },
    /// Interactive question loop ('exit' to quit, 'switch' to change mode)
    Ask {
        /// Starting instruction preset
        #[arg(short, long, value_enum, default_value = "technical")]
        mode: ModeArg,
    },
    /// Ask a single question
    Query {
        /// The question to ask
        question: String,
        /// Number of chunks to retrieve (default: from config)
        #[arg(short, long, allow_negative_numbers = true)]
        k: Option<i64>,
        /// Only print the retrieved chunks, do not call the model
        #[arg(long)]
        no_answer: bool,
        /// Instruction preset
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Load, chunk and index the documents
    Ingest {
        /// Rebuild even if the persisted index is current
        #[arg(long)]
        force: bool,
    },
    /// Check credentials, directories and the completion service
    Check,
    /// Show current configuration
    Config,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Technical,
    Summary,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Technical => Self::Technical,
            ModeArg::Summary => Self::Summary,
        }
    }
}
