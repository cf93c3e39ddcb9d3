//! Host ↔ render-boundary message protocol.
//!
//! Communication across the isolation boundary is message-passing only —
//! never direct object references. Every message travels inside an
//! [`Envelope`] carrying the protocol version, the sender origin, and the
//! session it belongs to; [`check_envelope`] vets all three before the
//! payload is acted on. Envelopes from a superseded session are discarded,
//! never merged.

use core_types::{ElementId, PROTOCOL_VERSION, SessionId};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender, channel};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Message {
    /// Host → boundary: new sanitized content to mount.
    ContentUpdate {
        html: String,
        css: Option<String>,
    },
    /// Host → boundary: toggle edit affordances.
    EditModeUpdate {
        enabled: bool,
    },
    /// Boundary → host: the user selected an element.
    ElementSelected {
        id: ElementId,
    },
    /// Boundary → host: an element's text was committed.
    ContentChanged {
        id: ElementId,
        old_text: String,
        new_text: String,
    },
    /// Either direction: liveness probe.
    HealthCheck,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub version: u16,
    pub origin: String,
    pub session: SessionId,
    pub message: Message,
}

impl Envelope {
    pub fn new(origin: &str, session: SessionId, message: Message) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            origin: origin.to_string(),
            session,
            message,
        }
    }
}

/// Outcome of vetting an inbound envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeCheck {
    Accepted,
    WrongVersion,
    WrongOrigin,
    /// Belongs to a session that has been superseded.
    StaleSession,
}

/// Vet an inbound envelope. Origin and version are hard failures; a session
/// older than the current one is stale (a *newer* session id is accepted so
/// a fresh session's first message cannot race its own announcement).
pub fn check_envelope(
    envelope: &Envelope,
    expected_origin: &str,
    current_session: SessionId,
) -> EnvelopeCheck {
    if envelope.version != PROTOCOL_VERSION {
        return EnvelopeCheck::WrongVersion;
    }
    if envelope.origin != expected_origin {
        return EnvelopeCheck::WrongOrigin;
    }
    if envelope.session < current_session {
        return EnvelopeCheck::StaleSession;
    }
    EnvelopeCheck::Accepted
}

/// Paired channel endpoints for one host ↔ boundary link.
pub struct Bus {
    pub to_boundary: Sender<Envelope>,
    pub from_host: Receiver<Envelope>,
    pub to_host: Sender<Envelope>,
    pub from_boundary: Receiver<Envelope>,
}

impl Bus {
    pub fn new() -> Self {
        let (to_boundary, from_host) = channel();
        let (to_host, from_boundary) = channel();
        Self {
            to_boundary,
            from_host,
            to_host,
            from_boundary,
        }
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
