//! Strata Codec
//!
//! Transport serialization boundary. Both facades run codec conversion at
//! the edge: documents and cache values cross the wire as JSON text, and
//! decode failures surface as errors rather than absent results.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::error::{Result, StrataError};
use serde::de::DeserializeOwned;
use serde::Serialize;

// =============================================================================
// Codec Trait
// =============================================================================

/// Serializes domain values to and from the transport representation.
///
/// Implementations must preserve `null` for absent optional fields and must
/// not escape non-ASCII characters by default.
pub trait Codec: Send + Sync {
    /// Encode a value to transport text.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Decode transport text into a target shape.
    fn decode<T: DeserializeOwned>(&self, input: &str) -> Result<T>;
}

// =============================================================================
// JSON Codec
// =============================================================================

/// The default codec: JSON via serde_json.
///
/// serde_json keeps `null` values in place and emits non-ASCII characters
/// verbatim, so both codec contract points hold without configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| StrataError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, input: &str) -> Result<T> {
        serde_json::from_str(input).map_err(|e| StrataError::Decode(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
