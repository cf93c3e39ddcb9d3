//! Render-session lifecycle and the engine facade.
//!
//! One [`RenderSession`] covers one raw → sanitized → mounted content cycle.
//! Sessions are built wholesale and superseded wholesale: a new content push
//! replaces the previous session outright, and anything still in flight for
//! the old session (detection completions, commits) is discarded on arrival
//! by comparing session ids. Everything runs on the caller's thread; ordering
//! comes from the event loop plus the latest-session-wins rule, so there is
//! nothing to lock.

use crate::bridge::{ChangeEvent, CommitOutcome, ContentSyncBridge};
use crate::error::EngineError;
use boundary::RenderBoundary;
use bus::{Envelope, EnvelopeCheck, Message, check_envelope};
use catalog::{DetectOptions, ElementCatalog, detect};
use core_types::{ElementId, SessionId};
use interaction::{Effect, InteractionConfig, InteractionController};
use log::{debug, warn};
use sanitize::{SAFE_PLACEHOLDER, SanitizationPolicy, SecurityViolation, audit, sanitize};
use std::sync::mpsc::{Receiver, Sender, channel};

/// One raw → sanitized → mounted lifecycle. Never patched in place; the next
/// push builds a fresh one.
pub struct RenderSession {
    pub id: SessionId,
    pub raw_content: String,
    pub sanitized_content: String,
    pub violations: Vec<SecurityViolation>,
    pub is_secure: bool,
    pub(crate) boundary: RenderBoundary,
    pub(crate) catalog: ElementCatalog,
    pub(crate) detected: bool,
}

impl RenderSession {
    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    /// The mounted document, if any. Hosts render from this.
    pub fn document(&self) -> Option<&html::Node> {
        self.boundary.document()
    }

    /// Whether the two-phase detection has completed for this session.
    pub fn detection_complete(&self) -> bool {
        self.detected
    }
}

/// Result of a detection completion callback.
#[derive(Debug, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// Catalog built with this many entries.
    Ready(usize),
    /// Document not ready; re-invoke on the next mount signal.
    NotReady,
    /// The session was superseded before the callback fired; its result was
    /// discarded, not applied.
    Superseded(SessionId),
}

pub struct Engine {
    origin: String,
    policy: SanitizationPolicy,
    detect_options: DetectOptions,
    bridge: ContentSyncBridge,
    to_host: Sender<Envelope>,
    controller: InteractionController,
    session: Option<RenderSession>,
    next_session: SessionId,
    faults: Vec<EngineError>,
}

impl Engine {
    /// Build an engine with default policy and options. Returns the host's
    /// receiving end for commit/selection envelopes.
    pub fn new(origin: &str) -> (Self, Receiver<Envelope>) {
        Self::with_options(
            origin,
            SanitizationPolicy::default(),
            DetectOptions::default(),
            InteractionConfig::default(),
        )
    }

    pub fn with_options(
        origin: &str,
        policy: SanitizationPolicy,
        detect_options: DetectOptions,
        interaction: InteractionConfig,
    ) -> (Self, Receiver<Envelope>) {
        let (to_host, from_engine) = channel();
        let engine = Self {
            origin: origin.to_string(),
            policy,
            detect_options,
            bridge: ContentSyncBridge::new(origin, to_host.clone()),
            to_host,
            controller: InteractionController::new(Vec::new(), interaction),
            session: None,
            next_session: SessionId::from_raw(1),
            faults: Vec::new(),
        };
        (engine, from_engine)
    }

    pub fn session(&self) -> Option<&RenderSession> {
        self.session.as_ref()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Drain the non-fatal fault reports accumulated since the last call.
    pub fn take_faults(&mut self) -> Vec<EngineError> {
        std::mem::take(&mut self.faults)
    }

    /// Audit, sanitize, and mount a new raw payload, superseding any
    /// previous session outright. Detection is phase two: call
    /// [`Engine::complete_detection`] with the returned id once the host's
    /// event loop observes the mount.
    ///
    /// Violations never block rendering — sanitization has already defanged
    /// the content — so the only error path is a failed mount.
    pub fn push_content(&mut self, raw: &str) -> Result<SessionId, EngineError> {
        let report = audit(raw);
        let sanitized = sanitize(raw, &self.policy);
        if sanitized == SAFE_PLACEHOLDER && raw != SAFE_PLACEHOLDER {
            self.faults.push(EngineError::Sanitization);
        }

        let mut render_boundary = RenderBoundary::new();
        render_boundary.mount(&sanitized)?;

        let id = self.next_session;
        self.next_session = id.next();

        // Hard reset: no interaction state survives a content swap.
        self.controller.reset();
        if let Some(old) = self.session.as_mut() {
            old.catalog.detach_all();
            old.boundary.teardown();
        }

        debug!(
            "session {} mounted ({} violations, secure={})",
            id.as_raw(),
            report.violations.len(),
            report.is_secure
        );
        self.session = Some(RenderSession {
            id,
            raw_content: raw.to_string(),
            sanitized_content: sanitized,
            is_secure: report.is_secure,
            violations: report.violations,
            boundary: render_boundary,
            catalog: ElementCatalog::default(),
            detected: false,
        });
        Ok(id)
    }

    /// Phase two of a content push: build the catalog against the mounted
    /// document. A completion for a superseded session is discarded.
    pub fn complete_detection(&mut self, session: SessionId) -> DetectionOutcome {
        let Some(current) = self.session.as_mut() else {
            self.faults.push(EngineError::DetectionUnavailable);
            return DetectionOutcome::NotReady;
        };
        if current.id != session {
            debug!(
                "discarding detection result for superseded session {}",
                session.as_raw()
            );
            return DetectionOutcome::Superseded(session);
        }

        let Some(document) = current.boundary.document_mut() else {
            self.faults.push(EngineError::DetectionUnavailable);
            return DetectionOutcome::NotReady;
        };

        let entries = detect(document, &self.detect_options);
        if entries.is_empty() {
            // Empty means "not ready", never "nothing editable".
            self.faults.push(EngineError::DetectionUnavailable);
            return DetectionOutcome::NotReady;
        }

        let count = entries.len();
        current.catalog = ElementCatalog::new(entries);
        current.detected = true;
        self.controller.set_entries(current.catalog.ids());
        DetectionOutcome::Ready(count)
    }

    /// Toggle edit-mode affordances on the mounted document.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if let Some(session) = self.session.as_mut() {
            session.boundary.set_edit_mode(enabled);
        }
    }

    /// Commit new text for an element. A stale id (vanished catalog entry,
    /// superseded session) is a reported no-op, never a panic.
    pub fn commit(&mut self, id: ElementId, new_text: &str) -> Option<ChangeEvent> {
        let Some(session) = self.session.as_mut() else {
            self.faults.push(EngineError::StaleEdit(id));
            return None;
        };
        let RenderSession {
            id: session_id,
            catalog,
            boundary,
            ..
        } = session;
        match self
            .bridge
            .commit(*session_id, catalog, boundary.document_mut(), id, new_text)
        {
            CommitOutcome::Applied(event) => Some(event),
            CommitOutcome::Stale => {
                self.faults.push(EngineError::StaleEdit(id));
                None
            }
        }
    }

    /// Reset an element's text to what detection originally found.
    pub fn revert(&mut self, id: ElementId) -> Option<ChangeEvent> {
        let Some(session) = self.session.as_mut() else {
            self.faults.push(EngineError::StaleEdit(id));
            return None;
        };
        let RenderSession {
            id: session_id,
            catalog,
            boundary,
            ..
        } = session;
        match self
            .bridge
            .revert(*session_id, catalog, boundary.document_mut(), id)
        {
            CommitOutcome::Applied(event) => Some(event),
            CommitOutcome::Stale => {
                self.faults.push(EngineError::StaleEdit(id));
                None
            }
        }
    }

    /// Carry out whatever an interaction event asked for.
    pub fn apply_effect(&mut self, effect: Effect) -> Option<ChangeEvent> {
        match effect {
            Effect::None => None,
            Effect::SelectionChanged(selected) => {
                if let (Some(session), Some(id)) = (self.session.as_ref(), selected) {
                    let _ = self.to_host.send(Envelope::new(
                        &self.origin,
                        session.id,
                        Message::ElementSelected { id },
                    ));
                }
                None
            }
            Effect::Commit { id, text } => self.commit(id, &text),
        }
    }

    /// Vet and dispatch one inbound envelope from the boundary side. Origin
    /// and version failures drop the message; stale-session envelopes are
    /// discarded rather than merged into the current session.
    pub fn handle_inbound(&mut self, envelope: &Envelope) -> EnvelopeCheck {
        let current = self
            .session
            .as_ref()
            .map(|s| s.id)
            .unwrap_or(SessionId::from_raw(0));
        let check = check_envelope(envelope, &self.origin, current);
        if check != EnvelopeCheck::Accepted {
            warn!("dropping inbound envelope: {check:?}");
            return check;
        }
        match &envelope.message {
            Message::ElementSelected { id } => {
                let effect = self.controller.click(*id);
                self.apply_effect(effect);
            }
            Message::HealthCheck => {
                let _ = self
                    .to_host
                    .send(Envelope::new(&self.origin, current, Message::HealthCheck));
            }
            // ContentUpdate/EditModeUpdate originate on the host side of the
            // bridge; ContentChanged is our own outbound notification.
            _ => {}
        }
        check
    }
}
