// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};
use stow_core::RequestStatus;

pub use args::{parse_header, RequestArgs};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Id,
}

/// Output format for commands without a bare-id form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    #[default]
    Text,
    Json,
}

/// Parse a status that may be stored on a queued request.
fn persistable_status(s: &str) -> Result<RequestStatus, String> {
    match s.parse::<RequestStatus>() {
        Ok(status) if status.is_persistable() => Ok(status),
        _ => Err("expected 'pending' or 'failed'".to_string()),
    }
}

#[derive(Parser)]
#[command(name = "stow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A durable queue for HTTP requests made while offline")]
#[command(
    long_about = "A durable queue for HTTP requests made while offline.\n\n\
    Requests are stored in SQLite and delivered oldest-first once the network is back. \
    A request that keeps failing is retried a bounded number of times, then dropped."
)]
pub struct Cli {
    /// Run as if stow was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a queue in the current directory
    Init {
        /// Base URL for request URLs starting with '/'
        #[arg(long)]
        endpoint: Option<String>,

        /// Directory to initialize (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Queue a request for later delivery
    #[command(after_help = "\
Examples:
  stow enqueue https://api.example/ping                    Queue a GET
  stow enqueue /orders -X POST -d '{\"qty\":1}' --json-body  POST JSON to the endpoint
  stow enqueue https://api.example/x -H 'X-Token: abc'     Add a header
  stow enqueue https://api.example/x -o id                 Print only the id")]
    Enqueue {
        #[command(flatten)]
        request: RequestArgs,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Deliver a request now, queueing it if delivery is not possible
    Submit {
        #[command(flatten)]
        request: RequestArgs,

        /// Output format (text, json, id)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List queued requests, oldest first
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: ListFormat,
    },

    /// Remove queued request(s)
    #[command(arg_required_else_help = true)]
    Remove {
        /// Request ID(s), e.g. 3 or #3
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Change the retry count or status of a queued request
    #[command(arg_required_else_help = true)]
    Update {
        /// Request ID
        id: String,

        /// New retry count (at most the request's max retries)
        #[arg(long)]
        retries: Option<u32>,

        /// New status (pending, failed)
        #[arg(long, value_parser = persistable_status)]
        status: Option<RequestStatus>,
    },

    /// Remove every queued request
    Clear,

    /// Attempt delivery of every queued request once
    Flush {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: ListFormat,
    },

    /// Flush on reconnect and periodically until interrupted
    Watch,
}

impl Command {
    /// Default log level for this command.
    pub fn log_level(&self) -> &'static str {
        match self {
            Command::Watch => crate::logging::WATCH_LEVEL,
            _ => crate::logging::DEFAULT_LEVEL,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
