//! Allow-list HTML sanitization and advisory security auditing.
//!
//! Two independent passes over the same untrusted input:
//! - [`sanitize`] transforms raw HTML into safe HTML (enforcement),
//! - [`audit`] produces a violation report from the raw input (advisory).
//!
//! They are deliberately decoupled: the report reflects what arrived, not
//! what survived, so the host can warn the user even though rendering
//! proceeds with the defanged content.

mod audit;
mod engine;
mod policy;

pub use audit::{AuditReport, SecurityViolation, Severity, ViolationKind, audit};
pub use engine::{SAFE_PLACEHOLDER, sanitize};
pub use policy::SanitizationPolicy;
