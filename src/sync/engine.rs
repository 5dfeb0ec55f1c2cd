use crate::entity::{glyph_for_category, Coordinate, PresenceRecord, PresenceUpdate};
use crate::feed::{FeedSubscription, RecordStore, Snapshot};
use crate::map::{Icon, MapSurface};
use crate::sync::state::{OverlayMarker, OverlaySlot, SyncState, SyncStats, TrackedEntity};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Callback invoked with the entity id when the user interacts with a
/// remote entity's marker (e.g. to open a chat)
pub type InteractSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Live view synchronizer.
///
/// Mirrors the remote collection delivered by a push feed onto map
/// markers, maintaining the one-marker-per-entity invariant against an
/// unordered full-replace snapshot stream without leaking markers or
/// flickering already-correct ones.
///
/// One instance owns one session: its state, its markers, and at most one
/// active feed subscription. All mutation goes through `&mut self`, so the
/// task driving [`run`](Self::run) serializes reconciliation.
pub struct Synchronizer<M: MapSurface> {
    map: M,
    state: SyncState,
    interact: Option<InteractSink>,
    subscription: Option<FeedSubscription>,
    stats: SyncStats,
}

impl<M: MapSurface> Synchronizer<M> {
    /// Start a session: empty collections, the given self payload, and the
    /// self marker already placed at its coordinate.
    pub fn new(map: M, self_record: PresenceRecord) -> Self {
        let mut sync = Self {
            map,
            state: SyncState {
                self_record,
                ..SyncState::default()
            },
            interact: None,
            subscription: None,
            stats: SyncStats::default(),
        };
        sync.ensure_self_marker();
        info!(entity_id = %sync.state.self_record.id, "session started");
        sync
    }

    /// Register the interaction callback wired onto each remote marker.
    ///
    /// Applies to markers created after the call; set it before attaching
    /// a subscription.
    pub fn set_interact_sink(&mut self, sink: InteractSink) {
        self.interact = Some(sink);
    }

    /// Install the feed subscription for this session, cancelling any
    /// prior one first. At most one subscription is active at a time, so
    /// repeated login cycles cannot leak duplicate deliveries.
    pub fn attach(&mut self, subscription: FeedSubscription) {
        if let Some(prior) = self.subscription.replace(subscription) {
            warn!("replacing active subscription");
            prior.cancel();
        }
    }

    /// Drain the attached subscription, applying every delivered snapshot.
    ///
    /// Returns when the feed closes, the subscription is cancelled, or no
    /// subscription is attached. Delivery order is taken as-is: if the
    /// transport reorders snapshots, the last delivery wins.
    pub async fn run(&mut self) {
        loop {
            let delivered = match self.subscription.as_mut() {
                Some(subscription) => subscription.next().await,
                None => {
                    warn!("run without an attached subscription");
                    return;
                }
            };

            match delivered {
                Some(snapshot) => self.apply_snapshot(&snapshot),
                None => {
                    info!("feed closed, stopping");
                    return;
                }
            }
        }
    }

    /// Reconcile local state and markers against a full snapshot.
    ///
    /// Departed ids lose their markers, new ids gain one, already-tracked
    /// ids keep their marker handle and are moved/restyled in place.
    /// Idempotent: reapplying an identical snapshot creates and disposes
    /// nothing.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        self.stats.snapshots_applied += 1;

        // Departures first
        let departed: Vec<String> = self
            .state
            .tracked
            .keys()
            .filter(|id| !snapshot.contains_key(*id))
            .cloned()
            .collect();
        for id in departed {
            self.dispose_entity(&id);
        }

        // Arrivals and in-place updates
        for (id, payload) in snapshot {
            if *id == self.state.self_record.id {
                // The self entity is mirrored to the store, not from it
                continue;
            }
            let record = PresenceRecord::from_value(id, payload);
            self.upsert_entity(record);
        }

        self.reconcile_overlay();

        debug!(
            tracked = self.state.tracked.len(),
            overlay = self.state.overlay.len(),
            "snapshot applied"
        );
    }

    /// Merge a partial update into the self record and refresh its marker.
    ///
    /// Shallow merge: incoming non-null fields overwrite, absent fields
    /// are retained. The self marker is never removed by this path.
    pub fn apply_self_update(&mut self, update: &PresenceUpdate) {
        self.state.self_record.merge(update);

        let at = self.state.self_record.coordinate();
        let icon = primary_icon(&self.state.self_record);
        match self.state.self_marker {
            Some(marker) => {
                self.map.set_position(marker, at);
                self.map.set_icon(marker, &icon);
            }
            None => self.ensure_self_marker(),
        }
    }

    /// Mirror the current self record to the store.
    ///
    /// Best effort: a failed write is logged and abandoned, never retried.
    pub fn publish_self<S: RecordStore>(&self, store: &S) {
        let record = &self.state.self_record;
        if let Err(error) = store.set_record(&record.id, record) {
            warn!(entity_id = %record.id, error = %error, "self publish failed, dropping");
        }
    }

    /// End the session: cancel the subscription, dispose every marker
    /// (remote, overlay, self), clear every collection. Runs synchronously
    /// so no partial teardown state is ever observable.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }

        for (_, tracked) in self.state.tracked.drain() {
            self.map.remove_marker(tracked.marker);
            self.stats.markers_disposed += 1;
        }
        for (_, overlay) in self.state.overlay.drain() {
            self.map.remove_marker(overlay.marker);
            self.stats.markers_disposed += 1;
        }
        if let Some(marker) = self.state.self_marker.take() {
            self.map.remove_marker(marker);
        }

        info!(entity_id = %self.state.self_record.id, "session torn down");
    }

    /// Ids currently tracked (self excluded)
    pub fn tracked_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.tracked.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Marker handle for a tracked id
    pub fn tracked_marker(&self, id: &str) -> Option<crate::map::MarkerId> {
        self.state.tracked.get(id).map(|t| t.marker)
    }

    /// Number of live listing overlay markers
    pub fn overlay_count(&self) -> usize {
        self.state.overlay.len()
    }

    pub fn self_record(&self) -> &PresenceRecord {
        &self.state.self_record
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    fn ensure_self_marker(&mut self) {
        if self.state.self_marker.is_none() {
            let at = self.state.self_record.coordinate();
            let icon = primary_icon(&self.state.self_record);
            self.state.self_marker = Some(self.map.create_marker(at, &icon));
        }
    }

    fn dispose_entity(&mut self, id: &str) {
        if let Some(tracked) = self.state.tracked.remove(id) {
            self.map.remove_marker(tracked.marker);
            self.stats.markers_disposed += 1;
            info!(entity_id = %id, "entity departed");
        }
    }

    fn upsert_entity(&mut self, record: PresenceRecord) {
        let at = record.coordinate();
        let icon = primary_icon(&record);

        if let Some(tracked) = self.state.tracked.get_mut(&record.id) {
            // Same handle, updated in place: no flicker. Calls are elided
            // when nothing changed so reapplying a snapshot is a no-op on
            // the widget.
            if tracked.record.coordinate() != at {
                self.map.set_position(tracked.marker, at);
                self.stats.markers_moved += 1;
            }
            if primary_icon(&tracked.record) != icon {
                self.map.set_icon(tracked.marker, &icon);
            }
            tracked.record = record;
            return;
        }

        let marker = self.map.create_marker(at, &icon);
        if let Some(sink) = &self.interact {
            let sink = Arc::clone(sink);
            let entity_id = record.id.clone();
            self.map
                .on_interact(marker, Box::new(move || sink(&entity_id)));
        }
        self.stats.markers_created += 1;
        info!(entity_id = %record.id, "entity arrived");
        self.state
            .tracked
            .insert(record.id.clone(), TrackedEntity { record, marker });
    }

    /// Reconcile the listing overlay against the tracked collection.
    ///
    /// Same identity-preserving strategy as primary markers, keyed by
    /// (owner id, inventory slot): stale slots are disposed, new slots
    /// created, surviving slots follow their owner.
    fn reconcile_overlay(&mut self) {
        let mut desired: HashMap<OverlaySlot, (Coordinate, Icon)> = HashMap::new();
        for (id, tracked) in &self.state.tracked {
            let at = tracked.record.coordinate();
            for (slot, listing) in tracked.record.inventory.iter().enumerate() {
                let icon = Icon::Glyph(glyph_for_category(&listing.category));
                desired.insert((id.clone(), slot), (at, icon));
            }
        }

        // Dispose stale slots
        let stale: Vec<OverlaySlot> = self
            .state
            .overlay
            .keys()
            .filter(|key| !desired.contains_key(*key))
            .cloned()
            .collect();
        for key in stale {
            if let Some(overlay) = self.state.overlay.remove(&key) {
                self.map.remove_marker(overlay.marker);
                self.stats.markers_disposed += 1;
            }
        }

        // Create new slots, refresh survivors in place
        for (key, (at, icon)) in desired {
            if let Some(existing) = self.state.overlay.get_mut(&key) {
                if existing.at != at {
                    self.map.set_position(existing.marker, at);
                    self.stats.markers_moved += 1;
                    existing.at = at;
                }
                if existing.icon != icon {
                    self.map.set_icon(existing.marker, &icon);
                    existing.icon = icon;
                }
                continue;
            }

            let marker = self.map.create_marker(at, &icon);
            self.stats.markers_created += 1;
            self.state
                .overlay
                .insert(key, OverlayMarker { marker, at, icon });
        }
    }
}

/// Icon for a record's primary marker: avatar when present, else a pin
fn primary_icon(record: &PresenceRecord) -> Icon {
    match &record.avatar_ref {
        Some(avatar_ref) => Icon::Avatar(avatar_ref.clone()),
        None => Icon::Pin,
    }
}
