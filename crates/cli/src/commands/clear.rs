// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{block_on, open_queue};
use crate::error::Result;

pub fn run() -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let removed = block_on(async {
        let count = queue.count().await?;
        queue.clear().await?;
        Ok(count)
    })?;
    println!("Cleared {} queued request(s)", removed);
    Ok(())
}
