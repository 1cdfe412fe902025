// pwmsg — CLI Module
//
// Command-line interface using clap derive macros.
// Subcommands: reveal, add, edit, delete, list, export, import.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::store::Schema;

pub use commands::execute;

/// pwmsg — keep messages behind passwords.
#[derive(Parser, Debug)]
#[command(name = "pwmsg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the storage database (defaults to the platform data directory).
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Record schema: "v1" (password, message) or "v2" (adds category).
    #[arg(long, global = true, default_value = "v2")]
    pub schema: Schema,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the message stored behind a password.
    Reveal {
        /// The password to look up (exact match).
        password: String,
    },

    /// Add a new password → message pair.
    Add {
        #[arg(long)]
        password: String,

        #[arg(long, default_value = "")]
        message: String,

        /// Free-text category (ignored by the v1 schema).
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Edit the pair at INDEX. Fields not given keep their current value.
    Edit {
        /// Index as shown by `list`.
        index: usize,

        #[arg(long)]
        password: Option<String>,

        #[arg(long)]
        message: Option<String>,

        #[arg(long)]
        category: Option<String>,
    },

    /// Delete the pair at INDEX.
    Delete {
        /// Index as shown by `list`.
        index: usize,

        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List stored pairs, optionally filtered.
    List {
        /// Case-sensitive substring to match against password, message and category.
        #[arg(long, default_value = "")]
        filter: String,

        /// Print passwords instead of masking them.
        #[arg(long)]
        show_passwords: bool,
    },

    /// Write all pairs to pw_to_msg_export.json.
    Export {
        /// Directory to write the export file into.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Replace all pairs with the JSON array in FILE.
    Import {
        file: PathBuf,
    },
}
