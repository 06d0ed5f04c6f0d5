// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;
use stow_core::RequestId;

use super::{block_on, open_queue};
use crate::cli::{OutputFormat, RequestArgs};
use crate::error::Result;

#[derive(Serialize)]
struct EnqueueJson {
    id: RequestId,
    queued: usize,
}

pub fn run(request: &RequestArgs, output: OutputFormat) -> Result<()> {
    let (queue, config, _) = open_queue()?;
    let candidate = request.to_candidate(&config)?;

    let (id, queued) = block_on(async {
        let id = queue.enqueue(candidate).await?;
        let queued = queue.count().await?;
        Ok((id, queued))
    })?;

    match output {
        OutputFormat::Text => println!("Queued {} ({} pending)", id, queued),
        OutputFormat::Json => println!("{}", serde_json::to_string(&EnqueueJson { id, queued })?),
        OutputFormat::Id => println!("{}", id.get()),
    }
    Ok(())
}
