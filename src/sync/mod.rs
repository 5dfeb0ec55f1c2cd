// Live view synchronizer and its owned state

mod engine;
mod state;

pub use engine::{InteractSink, Synchronizer};
pub use state::{OverlayMarker, OverlaySlot, SyncState, SyncStats, TrackedEntity};
