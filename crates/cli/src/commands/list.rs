// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Local};
use stow_core::QueuedRequest;

use super::{block_on, open_queue};
use crate::cli::ListFormat;
use crate::error::Result;

pub fn run(output: ListFormat) -> Result<()> {
    let (queue, _, _) = open_queue()?;
    let records = block_on(async { Ok(queue.list_pending().await?) })?;

    match output {
        ListFormat::Text => {
            if records.is_empty() {
                println!("No queued requests");
            }
            for record in &records {
                println!("{}", format_line(record));
            }
        }
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

/// One-line summary: id, method, url, retries, status, and enqueue time.
pub(crate) fn format_line(record: &QueuedRequest) -> String {
    format!(
        "{:<5} {:<6} {}  [{}, {}/{} retries, queued {}]",
        record.id.to_string(),
        record.method.as_str(),
        record.url,
        record.status,
        record.retries,
        record.max_retries,
        format_timestamp(record.timestamp),
    )
}

fn format_timestamp(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => ms.to_string(),
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
