// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::json;

use super::{block_on, http_transport, initial_connectivity, open_queue};
use crate::cli::{OutputFormat, RequestArgs};
use crate::error::{Error, Result};
use crate::sync::{Flusher, SubmitOutcome};

pub fn run(request: &RequestArgs, output: OutputFormat) -> Result<()> {
    let (queue, config, _) = open_queue()?;
    let candidate = request.to_candidate(&config)?;
    let transport = http_transport(&config)?;

    let outcome = block_on(async {
        let monitor = initial_connectivity(&config, transport.as_ref()).await;
        let flusher = Flusher::new(queue, transport, monitor);
        Ok(flusher.submit(candidate).await?)
    })?;

    match outcome {
        SubmitOutcome::Delivered { status } => match output {
            OutputFormat::Text => println!("Delivered ({})", status),
            OutputFormat::Json => println!("{}", json!({"delivered": true, "status": status})),
            OutputFormat::Id => {}
        },
        SubmitOutcome::Queued(id) => match output {
            OutputFormat::Text => println!("Queued {}", id),
            OutputFormat::Json => println!("{}", json!({"delivered": false, "id": id})),
            OutputFormat::Id => println!("{}", id.get()),
        },
        SubmitOutcome::Failed { reason } => return Err(Error::SubmitFailed(reason)),
    }
    Ok(())
}
