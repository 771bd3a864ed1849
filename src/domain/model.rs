use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Property keys of the tracked token, per the collection's permission list.
pub mod property_keys {
    /// The live value fetched from the data API.
    pub const VALUE: &str = "a.0";
    /// Human-readable timestamp of the last update.
    pub const UPDATED_AT: &str = "a.1";
    /// CID of the current token image.
    pub const IMAGE_CID: &str = "i.i";

    /// Every key the collection grants mutable permissions for.
    pub const ALL_MUTABLE: [&str; 8] = ["i.u", "i.c", "i.i", "i.h", "n", "d", "a.0", "a.1"];
}

/// One reading obtained from the external data API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReading {
    pub param: f64,
    pub fetched_at: DateTime<Utc>,
}

/// A key/value metadata field attached to the token record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenProperty {
    pub key: String,
    pub value: String,
}

impl TokenProperty {
    pub fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
        }
    }

    /// Attribute values use the schema's localized-string envelope.
    pub fn wrapped(key: &str, value: impl std::fmt::Display) -> Self {
        Self {
            key: key.to_string(),
            value: format!("{{\"_\": \"{}\"}}", value),
        }
    }
}

/// Receipt returned by the content-addressed store.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub cid: String,
}

/// Available balance of an account, as reported by the chain SDK.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub amount: f64,
    pub unit: String,
}

/// The token being updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRef {
    pub collection_id: u32,
    pub token_id: u32,
}

/// Result of one completed update run.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub token: TokenRef,
    pub cid: String,
    pub fee: f64,
    pub unit: String,
}

/// Ids minted by the create-collection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintedIds {
    pub collection_id: u32,
    pub token_id: u32,
}

/// Descriptive fields of the collection created by the bootstrap flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPlan {
    pub name: String,
    pub description: String,
    pub token_prefix: String,
}

impl Default for CollectionPlan {
    fn default() -> Self {
        Self {
            name: "Live NFT".to_string(),
            description: "Live NFT collection".to_string(),
            token_prefix: "LIVE".to_string(),
        }
    }
}

/// Timestamp label written to the `a.1` property, e.g. "5 August 2026 13:45:12".
pub fn updated_at_label(at: DateTime<Utc>) -> String {
    at.format("%-d %B %Y %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wrapped_property_uses_envelope() {
        let prop = TokenProperty::wrapped(property_keys::VALUE, 42);
        assert_eq!(prop.key, "a.0");
        assert_eq!(prop.value, "{\"_\": \"42\"}");
    }

    #[test]
    fn test_updated_at_label_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 5, 13, 45, 12).unwrap();
        assert_eq!(updated_at_label(at), "5 August 2026 13:45:12");
    }
}
