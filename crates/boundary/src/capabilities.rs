//! The fixed capability contract for mounted content.
//!
//! The set is deliberately not configurable per call or per session: script
//! execution, same-document-origin access (the edit overlay must traverse
//! the mounted DOM), and form submission are always granted; top-level
//! navigation and pop-ups are always denied. A fixed contract cannot creep.

/// Capability contract of the render boundary. Zero-sized and constructor-
/// only on purpose: there is nothing to configure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities;

impl Capabilities {
    pub const fn fixed() -> Self {
        Self
    }

    pub const fn allows_scripts(self) -> bool {
        true
    }

    pub const fn allows_same_origin(self) -> bool {
        true
    }

    pub const fn allows_forms(self) -> bool {
        true
    }

    pub const fn allows_navigation(self) -> bool {
        false
    }

    pub const fn allows_popups(self) -> bool {
        false
    }

    /// The sandbox token list a hosting shell applies to the isolated
    /// context, in stable order.
    pub const fn sandbox_tokens(self) -> &'static [&'static str] {
        &["allow-scripts", "allow-same-origin", "allow-forms"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_is_fixed() {
        let caps = Capabilities::fixed();
        assert!(caps.allows_scripts());
        assert!(caps.allows_same_origin());
        assert!(caps.allows_forms());
        assert!(!caps.allows_navigation());
        assert!(!caps.allows_popups());
        assert_eq!(
            caps.sandbox_tokens(),
            ["allow-scripts", "allow-same-origin", "allow-forms"]
        );
    }
}
