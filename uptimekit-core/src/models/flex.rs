//! Tolerant decoders for inconsistently typed wire fields.
//!
//! Different API versions encode some fields differently:
//! - [`FlexBool`] - `true`, `"true"`, `"TRUE"` and `null` all occur for flags
//! - [`FlexId`] - identifiers arrive as `1234` or `"1234"`
//!
//! Both inspect the JSON token kind before dispatching, so they work through
//! `deserialize_any` and survive `#[serde(flatten)]`.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// FlexBool
// ============================================================================

/// Optional boolean decoded from a bool literal, a bool string, or `null`.
///
/// `None` means the server sent `null` (or the field was absent and the
/// containing struct uses `#[serde(default)]`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlexBool(pub Option<bool>);

impl FlexBool {
    /// A known `true`.
    pub const TRUE: Self = Self(Some(true));
    /// A known `false`.
    pub const FALSE: Self = Self(Some(false));
    /// Absent or unknown.
    pub const ABSENT: Self = Self(None);

    /// Returns the decoded value, if any.
    pub fn get(self) -> Option<bool> {
        self.0
    }

    /// Returns the decoded value, treating absent as `default`.
    pub fn unwrap_or(self, default: bool) -> bool {
        self.0.unwrap_or(default)
    }

    /// Returns true if the server sent no value.
    pub fn is_absent(self) -> bool {
        self.0.is_none()
    }
}

impl From<bool> for FlexBool {
    fn from(value: bool) -> Self {
        Self(Some(value))
    }
}

impl From<Option<bool>> for FlexBool {
    fn from(value: Option<bool>) -> Self {
        Self(value)
    }
}

impl From<FlexBool> for Option<bool> {
    fn from(value: FlexBool) -> Self {
        value.0
    }
}

impl Serialize for FlexBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(value) => serializer.serialize_bool(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FlexBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FlexBoolVisitor)
    }
}

struct FlexBoolVisitor;

impl<'de> Visitor<'de> for FlexBoolVisitor {
    type Value = FlexBool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, \"true\"/\"false\", or null")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<FlexBool, E> {
        Ok(FlexBool(Some(value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<FlexBool, E> {
        if value.eq_ignore_ascii_case("true") {
            Ok(FlexBool::TRUE)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(FlexBool::FALSE)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<FlexBool, E> {
        Ok(FlexBool::ABSENT)
    }

    fn visit_none<E: de::Error>(self) -> Result<FlexBool, E> {
        Ok(FlexBool::ABSENT)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<FlexBool, D::Error> {
        deserializer.deserialize_any(self)
    }
}

// ============================================================================
// FlexId
// ============================================================================

/// Identifier decoded from either a JSON string or a JSON number.
///
/// Numbers are rendered in their exact decimal form, so `1234` and `"1234"`
/// decode to equal values. `null` decodes to the empty identifier. Always
/// serialized as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlexId(String);

impl FlexId {
    /// Creates an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the identifier is empty (decoded from `null` or `""`).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the identifier, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for FlexId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FlexId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FlexId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlexId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FlexId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for FlexId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<FlexId> for String {
    fn from(value: FlexId) -> Self {
        value.0
    }
}

impl PartialEq<str> for FlexId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FlexId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for FlexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FlexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FlexIdVisitor)
    }
}

struct FlexIdVisitor;

impl<'de> Visitor<'de> for FlexIdVisitor {
    type Value = FlexId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or number identifier")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<FlexId, E> {
        Ok(FlexId(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<FlexId, E> {
        Ok(FlexId(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<FlexId, E> {
        Ok(FlexId(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<FlexId, E> {
        Ok(FlexId(value.to_string()))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<FlexId, E> {
        Ok(FlexId(value.to_string()))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<FlexId, E> {
        Ok(FlexId(value.to_string()))
    }

    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    fn visit_f64<E: de::Error>(self, value: f64) -> Result<FlexId, E> {
        // 1234.0 is an integral id that went through a float somewhere upstream
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.007_199_254_740_992e15 {
            Ok(FlexId((value as i64).to_string()))
        } else {
            Ok(FlexId(value.to_string()))
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<FlexId, E> {
        Ok(FlexId::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<FlexId, E> {
        Ok(FlexId::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<FlexId, D::Error> {
        deserializer.deserialize_any(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
