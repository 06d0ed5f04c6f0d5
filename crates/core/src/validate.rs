// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Input validation for queue candidates.
//!
//! Checks run in a fixed order so the first violation is the one reported:
//! object shape, serialized size, url, method, then headers.

use http::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::request::{Method, NewRequest};

/// Maximum URL length in characters.
pub const MAX_URL_LEN: usize = 2000;

/// Maximum size of a serialized candidate in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 50_000;

/// Default number of records the store will hold.
pub const DEFAULT_MAX_PENDING: usize = 100;

/// Default number of failed deliveries before a record is dead-lettered.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Capacity and retry bounds enforced by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueLimits {
    pub max_pending: usize,
    pub max_retries: u32,
    pub max_url_len: usize,
    pub max_payload_bytes: usize,
}

impl Default for QueueLimits {
    fn default() -> Self {
        QueueLimits {
            max_pending: DEFAULT_MAX_PENDING,
            max_retries: DEFAULT_MAX_RETRIES,
            max_url_len: MAX_URL_LEN,
            max_payload_bytes: MAX_PAYLOAD_BYTES,
        }
    }
}

impl QueueLimits {
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// A candidate that passed validation and may be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    url: String,
    method: Method,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl ValidRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Validate a typed candidate against the limits.
pub fn validate(candidate: &NewRequest, limits: &QueueLimits) -> Result<ValidRequest> {
    check_size(serde_json::to_vec(candidate)?.len(), limits)?;

    if candidate.url.is_empty() {
        return Err(Error::validation("url is required"));
    }
    let url_len = candidate.url.chars().count();
    if url_len > limits.max_url_len {
        return Err(Error::validation(format!(
            "url too long ({url_len} chars, max {})",
            limits.max_url_len
        )));
    }

    let method = match candidate.method.as_deref() {
        None => Method::Get,
        Some(raw) => raw.parse()?,
    };

    for (name, value) in &candidate.headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(Error::validation(format!("invalid header name '{name}'")));
        }
        if HeaderValue::from_str(value).is_err() {
            return Err(Error::validation(format!(
                "invalid value for header '{name}'"
            )));
        }
    }

    Ok(ValidRequest {
        url: candidate.url.clone(),
        method,
        headers: candidate.headers.clone(),
        body: candidate.body.clone(),
    })
}

impl NewRequest {
    /// Decode a candidate from an untyped JSON value.
    ///
    /// Rejects anything that is not an object, then measures the whole
    /// serialized value (headers and url count toward the limit, not just
    /// the body) before looking at individual fields.
    pub fn from_json(value: &Value, limits: &QueueLimits) -> Result<NewRequest> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::validation("request must be a JSON object"))?;

        check_size(serde_json::to_vec(value)?.len(), limits)?;

        let url = match object.get("url") {
            None | Some(Value::Null) => return Err(Error::validation("url is required")),
            Some(Value::String(url)) => url.clone(),
            Some(_) => return Err(Error::validation("url must be a string")),
        };

        let method = match object.get("method") {
            None | Some(Value::Null) => None,
            Some(Value::String(method)) => Some(method.clone()),
            Some(_) => return Err(Error::validation("method must be a string")),
        };

        let mut headers = BTreeMap::new();
        match object.get("headers") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (name, value) in map {
                    let value = value.as_str().ok_or_else(|| {
                        Error::validation(format!("header '{name}' must be a string"))
                    })?;
                    headers.insert(name.clone(), value.to_string());
                }
            }
            Some(_) => return Err(Error::validation("headers must be an object")),
        }

        let body = match object.get("body") {
            None | Some(Value::Null) => None,
            Some(body) => Some(body.clone()),
        };

        Ok(NewRequest {
            url,
            method,
            headers,
            body,
        })
    }
}

fn check_size(size: usize, limits: &QueueLimits) -> Result<()> {
    if size > limits.max_payload_bytes {
        return Err(Error::validation(format!(
            "request too large ({size} bytes, max {})",
            limits.max_payload_bytes
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
