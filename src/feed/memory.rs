use crate::entity::{PresenceRecord, PresenceUpdate};
use crate::feed::{FeedError, FeedSubscription, LiveFeed, RecordStore, Snapshot};
use dashmap::DashMap;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 64;

/// In-process realtime store.
///
/// Documents live in a lock-free map; every mutation broadcasts a fresh
/// full snapshot to all live subscriptions, the same push semantics a
/// hosted realtime database provides. Safe to share across tasks.
pub struct MemoryFeed {
    documents: DashMap<String, Value>,
    snapshot_tx: broadcast::Sender<Snapshot>,

    /// Test hook: when set, all writes fail
    fail_writes: AtomicBool,
}

impl MemoryFeed {
    pub fn new(capacity: usize) -> Self {
        let (snapshot_tx, _) = broadcast::channel(capacity);
        Self {
            documents: DashMap::new(),
            snapshot_tx,
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Insert a record under a fresh time-ordered id and return the id
    pub fn add_record(&self, record: &PresenceRecord) -> Result<String, FeedError> {
        let id = Uuid::now_v7().to_string();
        let mut stamped = record.clone();
        stamped.id = id.clone();
        self.set_record(&id, &stamped)?;
        Ok(id)
    }

    /// Current full collection state
    pub fn current_snapshot(&self) -> Snapshot {
        self.documents
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.snapshot_tx.receiver_count()
    }

    /// Make every subsequent write fail (tests only)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn check_writable(&self) -> Result<(), FeedError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(FeedError::WriteFailed("store unavailable".to_string()));
        }
        Ok(())
    }

    fn broadcast(&self) {
        // No receivers is fine; send only fails when nobody listens
        let _ = self.snapshot_tx.send(self.current_snapshot());
    }
}

impl Default for MemoryFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LiveFeed for MemoryFeed {
    fn subscribe(&self) -> FeedSubscription {
        FeedSubscription::new(self.current_snapshot(), self.snapshot_tx.subscribe())
    }
}

impl RecordStore for MemoryFeed {
    fn set_record(&self, id: &str, record: &PresenceRecord) -> Result<(), FeedError> {
        self.check_writable()?;
        self.documents.insert(id.to_string(), record.to_value());
        debug!(entity_id = %id, "record set");
        self.broadcast();
        Ok(())
    }

    fn update_fields(&self, id: &str, update: &PresenceUpdate) -> Result<(), FeedError> {
        self.check_writable()?;

        let patch = match serde_json::to_value(update) {
            Ok(Value::Object(map)) => map,
            _ => return Err(FeedError::WriteFailed("unserializable update".to_string())),
        };

        {
            let mut entry = self
                .documents
                .entry(id.to_string())
                .or_insert_with(|| json!({ "id": id }));
            if let Some(doc) = entry.as_object_mut() {
                for (key, value) in patch {
                    doc.insert(key, value);
                }
            }
        }

        debug!(entity_id = %id, "record fields updated");
        self.broadcast();
        Ok(())
    }

    fn remove_record(&self, id: &str) -> Result<(), FeedError> {
        self.check_writable()?;
        if self.documents.remove(id).is_some() {
            debug!(entity_id = %id, "record removed");
            self.broadcast();
        }
        Ok(())
    }
}
