use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// clipkeep - keeps a history of everything you copy.
#[derive(Debug, Parser)]
#[command(name = "clipkeep", version, about)]
pub struct Cli {
    /// TOML bootstrap config (defaults to <data dir>/clipkeep/config.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the clipboard and record every new text until Ctrl-C.
    Watch {
        /// Read overlay touch samples as JSON lines from stdin.
        #[arg(long)]
        touch_stdin: bool,
    },
    /// Serve privileged clipboard reads over stdin/stdout.
    Helper,
    /// List recorded clips, newest first.
    List {
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },
    /// Find clips containing a substring (ASCII case-insensitive).
    Search { query: String },
    /// Delete one clip by id.
    Delete { id: String },
    /// Delete every clip.
    Clear,
    /// Print the number of recorded clips.
    Count,
    /// Write the history to a JSON file.
    Export { file: PathBuf },
    /// Add clips from a JSON file written by `export`.
    Import { file: PathBuf },
    /// Stop capturing (persisted; a running watcher follows).
    Pause,
    /// Resume capturing.
    Resume,
    /// Print the effective settings.
    Settings,
}
