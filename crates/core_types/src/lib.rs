//! Shared identifier types for the glassbox engine.
//!
//! These are intentionally plain newtypes over integers so that leaf crates
//! can exchange handles without depending on each other.

use serde::{Deserialize, Serialize};

/// Version of the host ↔ boundary message protocol.
///
/// Bumped whenever the envelope or message shapes change incompatibly.
/// Inbound envelopes carrying a different version are rejected.
pub const PROTOCOL_VERSION: u16 = 1;

/// Identifies one render session (one raw → sanitized → mounted lifecycle).
///
/// Monotonically increasing within an engine instance; a larger value always
/// supersedes a smaller one ("latest session wins").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }

    /// The next session id in sequence.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Opaque identifier for one editable element within a catalog.
///
/// Derived deterministically from the element's structural position, so an
/// unchanged document re-detected with the same options yields the same ids.
/// The raw value has no meaning outside the session that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_orders_by_generation() {
        let a = SessionId::from_raw(1);
        let b = a.next();
        assert!(b > a);
        assert_eq!(b.as_raw(), 2);
    }

    #[test]
    fn element_id_display_is_fixed_width_hex() {
        let id = ElementId::from_raw(0xbeef);
        assert_eq!(id.to_string(), "000000000000beef");
    }
}
