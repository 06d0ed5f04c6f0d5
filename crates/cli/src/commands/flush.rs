// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{block_on, http_transport, open_queue};
use crate::cli::ListFormat;
use crate::error::Result;
use crate::sync::{Connectivity, ConnectivityMonitor, Flusher};

pub fn run(output: ListFormat) -> Result<()> {
    let (queue, config, _) = open_queue()?;
    let transport = http_transport(&config)?;
    // An explicit flush always tries the network
    let flusher = Flusher::new(queue, transport, ConnectivityMonitor::new(Connectivity::Online));

    let report = block_on(async { Ok(flusher.flush().await?) })?;

    match output {
        ListFormat::Text => {
            for dead in &report.dead_letters {
                println!(
                    "Dropped {} {} {} after {} retries: {}",
                    dead.request.id,
                    dead.request.method,
                    dead.request.url,
                    dead.request.retries,
                    dead.error
                );
            }
            println!(
                "Delivered {}, retrying {}, dropped {}",
                report.delivered, report.retried, report.dead_lettered
            );
        }
        ListFormat::Json => println!("{}", serde_json::to_string(&report)?),
    }
    Ok(())
}
