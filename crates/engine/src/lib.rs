//! # engine
//!
//! The top-level glassbox pipeline: untrusted HTML in, an auditable,
//! sanitized, editable render session out.
//!
//! A content push runs audit → sanitize → mount; detection completes in a
//! second phase once the host's event loop observes the mount. Edits flow
//! through the [`interaction`] controller as effects and land in the
//! [`ContentSyncBridge`], which keeps the catalog descriptors, the mounted
//! document, and the host in agreement.

mod bridge;
mod error;
mod session;

pub use bridge::{ChangeEvent, CommitOutcome, ContentSyncBridge};
pub use error::EngineError;
pub use session::{DetectionOutcome, Engine, RenderSession};
