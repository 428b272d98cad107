//! Live Module
//!
//! The push path: position events for trucks, their reconciliation into
//! the entity store, and the channel they arrive on.

mod channel;
mod event;
mod reconciler;

pub use channel::{IngestHub, LiveError, LiveSource};
pub use event::LivePositionEvent;
pub use reconciler::{DisplayRecord, LiveOutcome, LiveReconciler};
