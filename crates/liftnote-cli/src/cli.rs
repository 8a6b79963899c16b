//! CLI argument definitions for liftnote.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// liftnote -- turn scribbled workout notes into structured records.
#[derive(Parser)]
#[command(
    name = "liftnote",
    version,
    about = "liftnote -- turn workout notes into structured exercise records",
    long_about = "Type workouts the way you would scribble them in a notebook \
                  (\"db bench 100 2x5\") and get back exercise, weight, sets, reps \
                  and duration."
)]
pub struct Cli {
    /// Gateway configuration file (TOML, or JSON with a `.json` extension).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse workout text once and print the records.
    Parse {
        /// Workout text; multiple arguments are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Print a one-line summary instead of JSON.
        #[arg(long)]
        summary: bool,
    },

    /// Edit a workout note line by line.
    Edit {
        /// Title of the note.
        #[arg(long, short, default_value = "Workout")]
        title: String,
    },

    /// Serve the HTTP API.
    Serve {
        /// Address to bind the HTTP server to.
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Port to listen on (falls back to `PORT`, then 4000).
        #[arg(long, short)]
        port: Option<u16>,
    },
}
