//! Cache Entry Module
//!
//! Defines the request signature used as cache key and the entry it maps to.

use std::fmt;
use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tokio::time::Instant;

// == Signature ==
/// Cache key: HTTP method plus path.
///
/// Query string and body are deliberately not part of the key, so two GETs
/// to the same path with different filters share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub method: Method,
    pub path: String,
}

impl Signature {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

// == Cache Entry ==
/// A cached response body and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response envelope
    pub value: Value,
    /// Insertion time on the tokio clock
    pub inserted_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is already
    /// expired, i.e. it is valid only while `age < ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Time since insertion.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.inserted_at)
    }
}
