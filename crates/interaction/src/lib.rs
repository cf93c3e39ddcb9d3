//! # interaction
//!
//! UI-agnostic interaction state machine for the glassbox engine.
//!
//! This crate provides:
//! - [`InteractionState`]: the single hover/select/edit state value
//! - [`InteractionController`]: the event-driven state machine
//! - [`Effect`]: what the host must do after each event
//!
//! It deliberately depends on nothing but `core_types` and `std`: no DOM, no
//! rendering, no timers. The host translates raw pointer/keyboard events into
//! controller calls and drives the debounce clock through explicit
//! timestamps, which keeps every transition unit-testable.

mod controller;
mod state;

pub use controller::{Effect, InteractionConfig, InteractionController};
pub use state::InteractionState;
