// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.trim().to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  presently login -e ada@example.edu    Sign in
  presently scan <token>                Mark attendance from a scanned code
  presently queue                       Show scans waiting to sync
  presently sync --watch                Sync whenever the server is reachable
  presently classes                     List your classes and their ids
  presently issue <class-id>            Display rotating class tokens";

#[derive(Parser, Debug)]
#[command(name = "presently")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first attendance client")]
#[command(
    long_about = "Offline-first attendance client.\n\n\
    Scans made without a connection are saved locally and submitted in order \
    once the server is reachable again."
)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Use <path> as the data directory
    #[arg(short = 'C', long = "data-dir", global = true, value_name = "path")]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Sign in and store the bearer token
    Login {
        /// Account email
        #[arg(long, short, value_parser = non_empty_string)]
        email: String,

        /// Account password (defaults to $PRESENTLY_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored bearer token
    Logout,

    /// Show the signed-in identity
    Whoami,

    // ─────────────────────────────────────────────────────────────────────────
    // Attendance
    // ─────────────────────────────────────────────────────────────────────────
    /// Mark attendance with a scanned token
    #[command(after_help = "\
Examples:
  presently scan 3f9c2a                 Submit now, or queue if unreachable
  presently scan 3f9c2a --offline       Queue without contacting the server")]
    Scan {
        /// Attendance token decoded from the class QR code
        #[arg(value_parser = non_empty_string)]
        token: String,

        /// Queue the scan without trying the server
        #[arg(long)]
        offline: bool,
    },

    /// List scans waiting to sync
    Queue {
        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Submit queued scans to the server
    Sync {
        /// Keep running and sync whenever the server becomes reachable
        #[arg(long, short)]
        watch: bool,
    },

    /// Show your attendance history
    History {
        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Classes
    // ─────────────────────────────────────────────────────────────────────────
    /// List the classes you teach or attend
    Classes {
        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Join a class with its code
    Join {
        /// Class code shared by the instructor
        #[arg(value_parser = non_empty_string)]
        code: String,
    },

    /// Leave a class
    Leave {
        /// Class id, as shown by 'presently classes'
        #[arg(value_parser = non_empty_string)]
        class_id: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Instructor
    // ─────────────────────────────────────────────────────────────────────────
    /// Show sessions attended per student of a class
    Roster {
        /// Class id, as shown by 'presently classes'
        #[arg(value_parser = non_empty_string)]
        class_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Issue rotating attendance tokens for a class
    #[command(after_help = "\
Examples:
  presently issue 65a1f0c2              Rotate every 30 seconds until Ctrl-C
  presently issue 65a1f0c2 --count 1    Print one token and exit")]
    Issue {
        /// Class to open an attendance session for
        #[arg(value_parser = non_empty_string)]
        class_id: String,

        /// Rotation window in seconds (defaults to the configured window)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        window: Option<u64>,

        /// Stop after this many tokens
        #[arg(long, short = 'n', value_parser = clap::value_parser!(u32).range(1..))]
        count: Option<u32>,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
