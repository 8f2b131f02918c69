//! Normalized outcomes of remote marketplace calls.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Outcome of a single remote call, normalized across marketplaces.
///
/// Success carries the parsed JSON body of the remote response and
/// serializes as that payload unchanged. Failure carries a human-readable
/// reason and serializes as `{"status":"failed","error":"<reason>"}` so
/// every failed slot in a report has one uniform shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCallResult {
    /// The remote accepted the call; payload is its parsed response body.
    Success(Map<String, Value>),
    /// The call failed in a modeled way; reason is the normalized message.
    Failure {
        /// Why the call failed.
        reason: String,
    },
}

impl RemoteCallResult {
    /// Creates a success result from a parsed response payload.
    pub fn success(payload: Map<String, Value>) -> Self {
        Self::Success(payload)
    }

    /// Creates a failure result with the given reason.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns true if the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true if the call failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns the response payload for a successful call.
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the failure reason for a failed call.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

impl Serialize for RemoteCallResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success(payload) => payload.serialize(serializer),
            Self::Failure { reason } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("status", "failed")?;
                map.serialize_entry("error", reason)?;
                map.end()
            }
        }
    }
}

/// Reference to an inventory record created on Marketplace B.
///
/// Publishing requires this handle; a create result without a usable
/// string `inventory_id` yields none, which gates the publish call off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryHandle {
    inventory_id: String,
}

impl InventoryHandle {
    /// Extracts the handle from a create-inventory result.
    ///
    /// Returns `Some` only when the result is a success whose payload
    /// carries a string-valued `inventory_id`.
    pub fn from_result(result: &RemoteCallResult) -> Option<Self> {
        let inventory_id = result.payload()?.get("inventory_id")?.as_str()?;
        Some(Self {
            inventory_id: inventory_id.to_string(),
        })
    }

    /// Returns the inventory identifier.
    pub fn inventory_id(&self) -> &str {
        &self.inventory_id
    }
}

impl std::fmt::Display for InventoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inventory_id)
    }
}
