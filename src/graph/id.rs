//! Identity types for the filter graph.
//!
//! All IDs are newtypes over `u32` that serve as direct array indices
//! into their respective storage vectors, providing O(1) lookup.

use serde::Serialize;
use std::fmt;

/// Index into `FilterGraph::filters`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FilterId(pub u32);

impl FilterId {
    pub const INVALID: FilterId = FilterId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "FilterId(INVALID)")
        } else {
            write!(f, "FilterId({})", self.0)
        }
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Index into `FilterGraph::connections`.
///
/// Slots are never reused, so an id stays stale after `disconnect`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_id() {
        let id = FilterId(42);
        assert!(id.is_valid());
        assert_eq!(id.index(), 42);
        assert!(!FilterId::INVALID.is_valid());
        assert_eq!(format!("{}", FilterId::INVALID), "FilterId(INVALID)");
    }

    #[test]
    fn test_connection_id() {
        let id = ConnectionId(5);
        assert_eq!(id.index(), 5);
        assert_eq!(id.to_string(), "ConnectionId(5)");
    }
}
