// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued request types.
//!
//! A [`QueuedRequest`] is one deferred network operation held by the store
//! until a flush delivers it or it exhausts its retries. Candidates enter
//! as a [`NewRequest`] and are only persisted after validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Store-assigned identifier of a queued request.
///
/// Allocated by the backend from a monotonically increasing sequence and
/// never reused, even after the record is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(i64);

impl RequestId {
    pub fn new(value: i64) -> Self {
        RequestId(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for RequestId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        digits
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .map(RequestId)
            .ok_or_else(|| Error::validation(format!("invalid request id '{s}'")))
    }
}

/// HTTP verbs a queued request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    /// Returns the uppercase verb used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            _ => Err(Error::validation(format!(
                "method '{s}' is not allowed\n  hint: allowed methods are: GET, POST, PUT, DELETE, PATCH"
            ))),
        }
    }
}

/// Lifecycle state of a queued request.
///
/// Only `Pending` and `Failed` are ever written to the store. `InFlight` is
/// held by the flush routine while a delivery is outstanding, and `Dead` is
/// carried by a dead-letter after the record has been removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestStatus {
    #[default]
    Pending,
    InFlight,
    Failed,
    Dead,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InFlight => "in-flight",
            RequestStatus::Failed => "failed",
            RequestStatus::Dead => "dead",
        }
    }

    /// Returns true if a record may be stored with this status.
    pub fn is_persistable(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Failed)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "in-flight" | "in_flight" => Ok(RequestStatus::InFlight),
            "failed" => Ok(RequestStatus::Failed),
            "dead" => Ok(RequestStatus::Dead),
            _ => Err(Error::CorruptedData(format!("invalid request status '{s}'"))),
        }
    }
}

/// Candidate request submitted for queueing.
///
/// Nothing about a `NewRequest` is trusted; it becomes a
/// [`ValidRequest`](crate::validate::ValidRequest) only through
/// [`validate`](crate::validate::validate).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl NewRequest {
    /// Creates a GET candidate for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        NewRequest {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A persisted deferred request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedRequest {
    pub id: RequestId,
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Number of failed delivery attempts so far.
    pub retries: u32,
    pub max_retries: u32,
    pub status: RequestStatus,
}

impl QueuedRequest {
    /// Returns true if one more failed attempt would exceed `max_retries`.
    pub fn is_last_attempt(&self) -> bool {
        self.retries >= self.max_retries
    }
}

/// Typed partial update for a queued request.
///
/// Only `retries` and `status` can change after insertion. Decoding a patch
/// from JSON drops every other field, so `id`, `url`, and `timestamp` cannot
/// be modified through this path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
}

impl RequestPatch {
    pub fn retries(retries: u32) -> Self {
        RequestPatch {
            retries: Some(retries),
            status: None,
        }
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Decodes a patch from an untyped JSON object, ignoring unknown fields.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::validation("patch must be a JSON object"));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| Error::validation(format!("invalid patch: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        self.retries.is_none() && self.status.is_none()
    }

    /// Merges this patch into `record`.
    ///
    /// Either every field is applied or, on error, none are.
    pub fn apply(&self, record: &mut QueuedRequest) -> Result<()> {
        if let Some(status) = self.status {
            if !status.is_persistable() {
                return Err(Error::validation(format!(
                    "status '{status}' cannot be stored\n  hint: only pending and failed are persisted"
                )));
            }
        }
        if let Some(retries) = self.retries {
            if retries > record.max_retries {
                return Err(Error::validation(format!(
                    "retries {retries} exceeds max_retries {}",
                    record.max_retries
                )));
            }
        }

        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(retries) = self.retries {
            record.retries = retries;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
