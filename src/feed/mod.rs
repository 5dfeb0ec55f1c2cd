use crate::entity::{PresenceRecord, PresenceUpdate};
use futures::StreamExt;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

mod memory;

pub use memory::MemoryFeed;

/// Complete point-in-time copy of all remote records, keyed by entity id.
///
/// The feed always delivers full state, never a diff; payload values are
/// opaque JSON documents.
pub type Snapshot = HashMap<String, Value>;

/// Failure of a best-effort store write
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// The store rejected or could not accept the write
    WriteFailed(String),
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::WriteFailed(reason) => write!(f, "write failed: {}", reason),
        }
    }
}

impl std::error::Error for FeedError {}

/// Inbound side of the realtime store: a push feed that delivers the
/// entire current collection once on subscribe and again whenever any
/// record changes.
pub trait LiveFeed {
    fn subscribe(&self) -> FeedSubscription;
}

/// Outbound side of the realtime store: best-effort writes keyed by entity
/// id. No transactional or conditional-write semantics.
pub trait RecordStore {
    /// Replace the full record for an id
    fn set_record(&self, id: &str, record: &PresenceRecord) -> Result<(), FeedError>;

    /// Shallow partial write: present fields overwrite, absent fields are
    /// left untouched. Creates the record when the id is unknown.
    fn update_fields(&self, id: &str, update: &PresenceUpdate) -> Result<(), FeedError>;

    /// Delete the record for an id
    fn remove_record(&self, id: &str) -> Result<(), FeedError>;
}

/// Cancellable handle to one active feed subscription.
///
/// Dropping the handle unsubscribes; [`cancel`](Self::cancel) does the same
/// explicitly. A holder sees every snapshot delivered after the handle was
/// created, starting with the collection state at subscribe time.
pub struct FeedSubscription {
    initial: Option<Snapshot>,
    stream: BroadcastStream<Snapshot>,
}

impl FeedSubscription {
    pub(crate) fn new(initial: Snapshot, rx: broadcast::Receiver<Snapshot>) -> Self {
        Self {
            initial: Some(initial),
            stream: BroadcastStream::new(rx),
        }
    }

    /// Await the next snapshot; `None` once the feed has shut down.
    ///
    /// A lagged delivery is skipped with a warning; the next snapshot is
    /// newer and authoritative, so nothing is lost but an intermediate
    /// frame.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if let Some(snapshot) = self.initial.take() {
            return Some(snapshot);
        }

        loop {
            match self.stream.next().await {
                Some(Ok(snapshot)) => return Some(snapshot),
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    warn!(skipped = skipped, "subscription lagged, skipping stale snapshots");
                }
                None => return None,
            }
        }
    }

    /// Explicitly unsubscribe
    pub fn cancel(self) {}
}
