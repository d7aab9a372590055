//! Strata Pair
//!
//! An immutable 2-tuple used to batch two independent single-document
//! lookups into one logical call. There is no transactional guarantee
//! between the halves; one may be absent while the other is present.
//!
//! @version 0.1.0
//! @author Strata Development Team

use serde::{Deserialize, Serialize};

// =============================================================================
// Pair
// =============================================================================

/// An immutable pair of two independent lookup results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair<F, L> {
    first: F,
    last: L,
}

impl<F, L> Pair<F, L> {
    /// Create a new pair.
    pub fn new(first: F, last: L) -> Self {
        Self { first, last }
    }

    /// Get the first element.
    pub fn first(&self) -> &F {
        &self.first
    }

    /// Get the last element.
    pub fn last(&self) -> &L {
        &self.last
    }

    /// Consume the pair, returning both elements.
    pub fn into_inner(self) -> (F, L) {
        (self.first, self.last)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_accessors() {
        let pair = Pair::new(Some(1), None::<i32>);
        assert_eq!(pair.first(), &Some(1));
        assert_eq!(pair.last(), &None);
    }

    #[test]
    fn test_pair_into_inner() {
        let pair = Pair::new("a".to_string(), 2i64);
        let (first, last) = pair.into_inner();
        assert_eq!(first, "a");
        assert_eq!(last, 2);
    }
}
