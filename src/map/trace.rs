use crate::entity::Coordinate;
use crate::map::{Icon, InteractFn, MapSurface, MarkerId};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// One live marker as the trace surface sees it
#[derive(Clone, Debug, PartialEq)]
pub struct TraceMarker {
    pub at: Coordinate,
    pub icon: Icon,
}

/// Headless map surface that records every marker operation.
///
/// Stands in for the real map widget in tests and the demo binary: tests
/// assert on live markers and lifetime counters, and can fire a marker's
/// interaction callback the way a click would.
#[derive(Default)]
pub struct TraceMap {
    markers: DashMap<MarkerId, TraceMarker>,
    callbacks: DashMap<MarkerId, InteractFn>,
    next_id: AtomicU64,

    created: AtomicU64,
    removed: AtomicU64,
    moved: AtomicU64,
    restyled: AtomicU64,
}

impl TraceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of markers currently on the surface
    pub fn live_count(&self) -> usize {
        self.markers.len()
    }

    /// Current state of one marker
    pub fn marker(&self, marker: MarkerId) -> Option<TraceMarker> {
        self.markers.get(&marker).map(|m| m.clone())
    }

    /// Lifetime create count
    pub fn created_total(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }

    /// Lifetime remove count
    pub fn removed_total(&self) -> u64 {
        self.removed.load(Ordering::Relaxed)
    }

    /// Lifetime move count
    pub fn moved_total(&self) -> u64 {
        self.moved.load(Ordering::Relaxed)
    }

    /// Lifetime icon-swap count
    pub fn restyled_total(&self) -> u64 {
        self.restyled.load(Ordering::Relaxed)
    }

    /// Simulate a user interacting with a marker.
    ///
    /// Returns false when the marker has no registered callback.
    pub fn fire_interact(&self, marker: MarkerId) -> bool {
        match self.callbacks.get(&marker) {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl MapSurface for TraceMap {
    fn create_marker(&self, at: Coordinate, icon: &Icon) -> MarkerId {
        let marker = MarkerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.markers.insert(
            marker,
            TraceMarker {
                at,
                icon: icon.clone(),
            },
        );
        self.created.fetch_add(1, Ordering::Relaxed);
        debug!(marker = marker.0, lat = at.lat, lon = at.lon, "marker created");
        marker
    }

    fn set_position(&self, marker: MarkerId, at: Coordinate) {
        if let Some(mut entry) = self.markers.get_mut(&marker) {
            entry.at = at;
            self.moved.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn set_icon(&self, marker: MarkerId, icon: &Icon) {
        if let Some(mut entry) = self.markers.get_mut(&marker) {
            entry.icon = icon.clone();
            self.restyled.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn remove_marker(&self, marker: MarkerId) {
        if self.markers.remove(&marker).is_some() {
            self.removed.fetch_add(1, Ordering::Relaxed);
            debug!(marker = marker.0, "marker removed");
        }
        self.callbacks.remove(&marker);
    }

    fn on_interact(&self, marker: MarkerId, callback: InteractFn) {
        self.callbacks.insert(marker, callback);
    }
}
