// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use stowrs::Cli;

fn main() {
    let cli = Cli::parse();
    stowrs::logging::setup_logging(cli.command.log_level());

    if let Some(dir) = &cli.directory {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("error: cannot change to directory '{}': {}", dir, e);
            std::process::exit(1);
        }
    }

    if let Err(e) = stowrs::run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
