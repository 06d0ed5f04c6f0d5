// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use stow_core::{RequestId, RequestPatch, RequestStatus};

use super::list::format_line;
use super::{block_on, open_queue};
use crate::error::{Error, Result};

pub fn run(id: &str, retries: Option<u32>, status: Option<RequestStatus>) -> Result<()> {
    let id: RequestId = id.parse()?;
    let patch = RequestPatch { retries, status };
    if patch.is_empty() {
        return Err(Error::FieldRequired {
            field: "--retries or --status",
        });
    }

    let (queue, _, _) = open_queue()?;
    let updated = block_on(async { Ok(queue.update(id, patch).await?) })?;
    println!("{}", format_line(&updated));
    Ok(())
}
