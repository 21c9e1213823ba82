//! Role metadata helpers.
//!
//! Keys starting with `_` belong to the platform; `_reserved: true` marks a
//! built-in role that user-defined roles may not shadow.
use serde_json::Value;
use std::collections::BTreeMap;

pub type Metadata = BTreeMap<String, Value>;

pub const RESERVED_PREFIX: &str = "_";
pub const RESERVED_METADATA_KEY: &str = "_reserved";

/// Metadata attached to every built-in role.
pub fn reserved() -> Metadata {
    Metadata::from([(RESERVED_METADATA_KEY.to_string(), Value::Bool(true))])
}

/// Whether the metadata marks its role as reserved.
pub fn is_reserved(metadata: &Metadata) -> bool {
    matches!(metadata.get(RESERVED_METADATA_KEY), Some(Value::Bool(true)))
}

/// Whether any key uses the platform-owned `_` prefix.
pub fn contains_reserved_keys(metadata: &Metadata) -> bool {
    metadata.keys().any(|key| key.starts_with(RESERVED_PREFIX))
}
