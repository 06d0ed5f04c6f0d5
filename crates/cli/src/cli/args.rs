// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` by every command that
//! takes a request on the command line.

use clap::Args;
use serde_json::Value;
use stow_core::NewRequest;

use crate::config::Config;
use crate::error::{Error, Result};

/// A request described on the command line.
#[derive(Args, Clone, Debug, Default)]
pub struct RequestArgs {
    /// Target URL (a leading `/` resolves against the configured endpoint)
    pub url: String,

    /// HTTP method (GET, POST, PUT, DELETE, PATCH) [default: GET]
    #[arg(long = "method", short = 'X')]
    pub method: Option<String>,

    /// Request header as 'Name: value' (repeatable)
    #[arg(long = "header", short = 'H', value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(long = "data", short = 'd', value_name = "BODY")]
    pub data: Option<String>,

    /// Parse the body as JSON instead of sending it as text
    #[arg(long, requires = "data")]
    pub json_body: bool,
}

impl RequestArgs {
    /// Build a queue candidate. Queue limits are checked later by validation.
    pub fn to_candidate(&self, config: &Config) -> Result<NewRequest> {
        let mut candidate = NewRequest::new(config.resolve_url(&self.url));
        if let Some(method) = &self.method {
            candidate = candidate.with_method(method.clone());
        }
        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            candidate = candidate.with_header(name, value);
        }
        if let Some(data) = &self.data {
            let body = if self.json_body {
                serde_json::from_str(data).map_err(|e| Error::InvalidBody(e.to_string()))?
            } else {
                Value::String(data.clone())
            };
            candidate = candidate.with_body(body);
        }
        Ok(candidate)
    }
}

/// Split `Name: value` into its trimmed parts.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| Error::InvalidHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
