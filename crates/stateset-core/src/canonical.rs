//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only input accepted by the digest functions.
//! Its constructor serializes the value to JSON, rejects floats, and emits
//! RFC 8785 (JCS) output: sorted keys, compact separators.
//!
//! Floats are rejected because two implementations can disagree on the
//! shortest round-trip rendering of a double. Monetary and numeric record
//! fields are integers for that reason.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// The inner buffer is private; [`CanonicalBytes::new`] is the sole
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value contains a non-integer number,
    /// `SerializationFailed` if serde cannot represent the value as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// The canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Array(items) => items.iter().try_for_each(reject_floats),
        Value::Object(map) => map.values().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_str(cb: &CanonicalBytes) -> &str {
        std::str::from_utf8(cb.as_bytes()).unwrap()
    }

    #[test]
    fn keys_are_sorted_and_compact() {
        let data = serde_json::json!({"b": 2, "a": 1, "c": "hello"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(as_str(&cb), r#"{"a":1,"b":2,"c":"hello"}"#);
    }

    #[test]
    fn nested_objects_are_sorted() {
        let data = serde_json::json!({"outer": {"b": 2, "a": 1}, "list": [3, 2, 1]});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(as_str(&cb), r#"{"list":[3,2,1],"outer":{"a":1,"b":2}}"#);
    }

    #[test]
    fn floats_are_rejected_anywhere() {
        let top = serde_json::json!({"value": 1.5});
        let nested = serde_json::json!({"a": [{"b": 0.25}]});
        assert!(matches!(
            CanonicalBytes::new(&top),
            Err(CanonicalizationError::FloatRejected(f)) if f == 1.5
        ));
        assert!(CanonicalBytes::new(&nested).is_err());
    }

    #[test]
    fn integers_and_null_pass() {
        let data = serde_json::json!({"value": 42, "active": null, "neg": -7});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(as_str(&cb), r#"{"active":null,"neg":-7,"value":42}"#);
    }
}
