//! Strata Common - Shared Types and Utilities
//!
//! Foundational pieces used by both Strata facades: the unified error
//! taxonomy, the transport codec boundary, and the single-threaded
//! background worker that backs all async facade operations.
//!
//! Key Features:
//! - Unified error types with retryable error detection
//! - Pluggable codec boundary with a JSON default
//! - FIFO background task worker with explicit queue semantics
//!
//! @version 0.1.0
//! @author Strata Development Team

pub mod codec;
pub mod error;
pub mod worker;

pub use codec::{Codec, JsonCodec};
pub use error::{Result, StrataError};
pub use worker::TaskWorker;
