//! Wire key names and alias lookup.
//!
//! Backends disagree on field spelling (`disease_name` vs `diseaseName`).
//! Lookups try an ordered candidate list against the untyped map; the first
//! key holding a non-blank string wins. Matching is exact and case-sensitive.

use serde_json::{Map, Value};

/// Envelope key wrapping the next layer.
pub const RESULT_KEY: &str = "result";

/// Candidate keys for the disease name, in priority order.
pub const DISEASE_NAME_KEYS: &[&str] = &["disease_name", "diseaseName"];

/// Candidate keys for the crop type, in priority order.
pub const CROP_TYPE_KEYS: &[&str] = &["crop_type", "cropType"];

/// Recommendation list key (also the nesting key for coerced lists).
pub const RECOMMENDATIONS_KEY: &str = "recommendations";

/// Weather risk list key.
pub const RISKS_KEY: &str = "risks";

/// Sentinel for an absent disease name.
pub const UNKNOWN_DISEASE: &str = "Unknown disease";

/// Sentinel for an absent crop type.
pub const UNKNOWN_CROP: &str = "Unknown crop";

/// Return the first present, non-blank string value among `keys`.
pub fn lookup_str<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
}

/// Whether any of `keys` is present, whatever its value.
pub fn exposes_any(map: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|key| map.contains_key(*key))
}
