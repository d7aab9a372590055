//! Strata Document - Data Model
//!
//! Core data types shared by the store and cache facades: schema-less
//! documents, JSON-compatible values, and the two-element lookup pair.
//!
//! Documents have no fixed schema and no intrinsic identifier; callers pick
//! whatever field they like as a lookup key (commonly a unique id field).
//!
//! @version 0.1.0
//! @author Strata Development Team

pub mod pair;
pub mod types;

pub use pair::Pair;
pub use types::{Document, Value};
