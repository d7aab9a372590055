//! Strata Error - Unified Error Types
//!
//! Error handling for all Strata facade operations. Transport failures,
//! invalid input, and codec failures each get their own variant; an absent
//! result is never an error and is represented as `Option::None` across
//! get/rank/aggregate.
//!
//! Key Features:
//! - Transport vs user error classification
//! - Retryable error detection for caller-side retry logic
//! - Decode failures surfaced to the caller instead of mapped to absent
//!
//! @version 0.1.0
//! @author Strata Development Team

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Unified error type for all Strata operations.
#[derive(Error, Debug, Clone)]
pub enum StrataError {
    // Transport errors
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("not connected")]
    NotConnected,

    // Input errors
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // Codec errors
    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    // Worker errors
    #[error("worker queue closed")]
    QueueClosed,
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Result type alias for Strata operations.
pub type Result<T> = std::result::Result<T, StrataError>;

// =============================================================================
// Error Classification
// =============================================================================

impl StrataError {
    /// Returns true if the operation can be safely retried by the caller.
    ///
    /// Strata never retries internally; transport errors are fatal to the
    /// call and the caller decides.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Returns true if this is a connection-level error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::NotConnected)
    }

    /// Returns true if this is a user error (vs system error).
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

// =============================================================================
// Tests
// =============================================================================
