// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running flush loop.

use std::sync::Arc;

use stow_core::Capability;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{http_transport, initial_connectivity, open_queue};
use crate::error::{Error, Result};
use crate::sync::{run_flush_loop, run_probe_loop, Flusher, QueueEvent};

pub fn run() -> Result<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))?;
    rt.block_on(run_async())
}

async fn run_async() -> Result<()> {
    let (queue, config, stow_dir) = open_queue()?;

    if let Capability::Degraded { reason } = queue.initialize_or_degrade().await? {
        warn!(reason = %reason, "running without a durable queue");
    }

    let transport = http_transport(&config)?;
    let monitor = initial_connectivity(&config, transport.as_ref()).await;
    let flusher = Arc::new(Flusher::new(
        Arc::clone(&queue),
        Arc::clone(&transport),
        monitor.clone(),
    ));
    let mut events = flusher.subscribe();
    let cancel = CancellationToken::new();

    info!(
        dir = %stow_dir.display(),
        state = %monitor.current(),
        pending = queue.count().await?,
        "watching queue"
    );

    let mut tasks = tokio::task::JoinSet::new();
    if let Some(url) = config.monitor.probe_url.clone() {
        tasks.spawn(run_probe_loop(
            monitor.clone(),
            Arc::clone(&transport),
            url,
            config.monitor.probe_interval(),
            cancel.clone(),
        ));
    }
    tasks.spawn(run_flush_loop(
        flusher,
        monitor,
        config.monitor.sync_interval(),
        cancel.clone(),
    ));

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(missed)) => warn!(missed, "event stream lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    info!("shutting down");
    cancel.cancel();
    while tasks.join_next().await.is_some() {}
    Ok(())
}

fn print_event(event: &QueueEvent) {
    match event {
        QueueEvent::Delivered { id, status } => println!("delivered {} ({})", id, status),
        QueueEvent::RetryScheduled { id, retries, error } => {
            println!("retry {} for {}: {}", retries, id, error)
        }
        QueueEvent::DeadLettered(dead) => println!(
            "dropped {} {} {}: {}",
            dead.request.id, dead.request.method, dead.request.url, dead.error
        ),
    }
}
