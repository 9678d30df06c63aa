//! # Persisted Snapshot Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Durable Entry ("panzo_cart")                         │
//! │                                                                         │
//! │  Current:                                                              │
//! │    { "items": { "<key>": CartLine, ... }, "timestamp": 1718000000000 } │
//! │                                                                         │
//! │  Legacy (written before timestamps existed):                           │
//! │    { "<key>": CartLine, ... }                                          │
//! │                                                                         │
//! │  A falsy timestamp (missing, null, 0) means legacy.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The raw text is decoded twice on purpose: once to look at the timestamp,
//! once straight into [`Cart`] so the object's line order survives.

use chrono::{DateTime, Utc};
use panzo_core::Cart;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// A decoded durable entry.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedSnapshot {
    /// Current format with its save time.
    Current {
        cart: Cart,
        saved_at: DateTime<Utc>,
    },
    /// No timestamp; adopted without an expiration check.
    Legacy(Cart),
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    items: &'a Cart,
    timestamp: i64,
}

#[derive(Deserialize)]
struct Probe {
    #[serde(default)]
    timestamp: Value,
}

#[derive(Deserialize)]
struct Current {
    items: Cart,
}

/// Serializes a cart with its save time as epoch milliseconds.
pub fn encode(cart: &Cart, saved_at: DateTime<Utc>) -> StoreResult<String> {
    let snapshot = SnapshotRef {
        items: cart,
        timestamp: saved_at.timestamp_millis(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Parses a durable entry in either format.
///
/// ## Errors
/// - Text that is not a JSON object, or lines of the wrong shape
/// - A truthy timestamp that is not a number, or out of chrono's range
pub fn decode(raw: &str) -> StoreResult<LoadedSnapshot> {
    let probe: Probe = serde_json::from_str(raw)?;

    match saved_at_millis(&probe.timestamp)? {
        Some(millis) => {
            let saved_at = DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| StoreError::InvalidTimestamp(millis.to_string()))?;
            let current: Current = serde_json::from_str(raw)?;
            Ok(LoadedSnapshot::Current {
                cart: current.items,
                saved_at,
            })
        }
        None => Ok(LoadedSnapshot::Legacy(serde_json::from_str(raw)?)),
    }
}

/// `None` for a falsy timestamp, the millisecond value otherwise.
fn saved_at_millis(timestamp: &Value) -> StoreResult<Option<i64>> {
    match timestamp {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
                .ok_or_else(|| StoreError::InvalidTimestamp(n.to_string()))?;
            Ok((millis != 0).then_some(millis))
        }
        other => Err(StoreError::InvalidTimestamp(other.to_string())),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
