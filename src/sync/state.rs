use crate::entity::{Coordinate, PresenceRecord};
use crate::map::{Icon, MarkerId};
use std::collections::HashMap;

/// One remote entity currently mirrored onto the map
#[derive(Clone, Debug)]
pub struct TrackedEntity {
    /// Last-known payload, replaced wholesale on every update
    pub record: PresenceRecord,

    /// Live primary marker; the same handle survives in-place updates
    pub marker: MarkerId,
}

/// Overlay key: owning entity id plus inventory slot
pub type OverlaySlot = (String, usize);

/// One listing overlay marker with its last-applied visual state.
///
/// Position and icon are kept so unchanged slots skip their map calls.
#[derive(Clone, Debug)]
pub struct OverlayMarker {
    pub marker: MarkerId,
    pub at: Coordinate,
    pub icon: Icon,
}

/// All state owned by one synchronizer session.
///
/// Created empty with a default self payload at login; teardown disposes
/// every marker and clears every collection. Nothing outside the
/// synchronizer may mutate it.
#[derive(Debug, Default)]
pub struct SyncState {
    /// Remote entities, id → payload + marker
    pub tracked: HashMap<String, TrackedEntity>,

    /// Listing overlay markers
    pub overlay: HashMap<OverlaySlot, OverlayMarker>,

    /// Locally controlled record, mirrored to the store rather than from it
    pub self_record: PresenceRecord,

    /// Marker for the self record; present for the whole session
    pub self_marker: Option<MarkerId>,
}

/// Lifetime counters for one synchronizer session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub snapshots_applied: u64,
    pub markers_created: u64,
    pub markers_disposed: u64,
    pub markers_moved: u64,
}
