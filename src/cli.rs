use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "bike_tracker")]
#[command(about = "Track price and availability history of shop bike listings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the SQLite database (overrides BIKE_TRACKER_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one snapshot and merge it into the stored history
    Fetch,
    /// Serve the dashboard over HTTP
    Serve {
        /// Address to bind (overrides BIKE_TRACKER_ADDR)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
    /// Print tracked bikes
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the stored state
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted, required for xlsx)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Render the dashboard table as a static HTML file
    Render {
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Store request headers copied from a logged-in browser session
    CaptureHeaders {
        /// JSON file with `[{name, value}]` or `{name: value}`
        file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Xlsx,
}
