// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use stow_core::Store;

use crate::config::{get_queue_path, init_stow_dir, Config};
use crate::error::Result;

pub fn run(endpoint: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let config = Config::new(endpoint);
    let stow_dir = init_stow_dir(&target_path, &config)?;

    // Create the database now so permission problems surface at init
    let queue_path = get_queue_path(&stow_dir, &config);
    Store::open(&queue_path, config.queue.limits())?;

    println!("Initialized request queue at {}", stow_dir.display());
    if let Some(endpoint) = &config.endpoint {
        println!("Endpoint: {}", endpoint);
    }
    Ok(())
}
