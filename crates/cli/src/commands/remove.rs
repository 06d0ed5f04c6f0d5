// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use stow_core::RequestId;

use super::{block_on, open_queue};
use crate::error::Result;

pub fn run(ids: &[String]) -> Result<()> {
    // Parse everything up front so a typo removes nothing
    let ids = ids
        .iter()
        .map(|raw| raw.parse::<RequestId>())
        .collect::<stow_core::Result<Vec<_>>>()?;

    let (queue, _, _) = open_queue()?;
    block_on(async {
        for id in ids {
            if queue.remove(id).await? {
                println!("Removed {}", id);
            } else {
                println!("{} was not queued", id);
            }
        }
        Ok(())
    })
}
