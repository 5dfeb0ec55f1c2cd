use anyhow::Result;
use rand::Rng;
use snapmap::config::{self, SnapConfig};
use snapmap::entity::{PresenceRecord, PresenceUpdate};
use snapmap::feed::{LiveFeed, MemoryFeed, RecordStore};
use snapmap::map::TraceMap;
use snapmap::sync::Synchronizer;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapmap=info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => config::load_config(&path)?,
        None => SnapConfig::default(),
    };

    info!(
        self_id = %config.presence.self_id,
        center_lat = config.map.center_lat,
        center_lon = config.map.center_lon,
        zoom = config.map.zoom,
        "snapmap starting..."
    );

    let feed = Arc::new(MemoryFeed::new(config.feed.snapshot_capacity));
    let map = Arc::new(TraceMap::new());

    let mut sync = Synchronizer::new(Arc::clone(&map), config.initial_self_record());
    sync.set_interact_sink(Arc::new(|entity_id: &str| {
        info!(entity_id = %entity_id, "marker tapped, would open chat");
    }));
    sync.publish_self(feed.as_ref());
    sync.attach(feed.subscribe());

    // A few fake users random-walking through the store contract
    let peers = tokio::spawn(simulate_peers(Arc::clone(&feed)));

    tokio::select! {
        _ = sync.run() => warn!("feed closed"),
        _ = tokio::signal::ctrl_c() => info!("interrupted, logging out"),
    }

    peers.abort();
    sync.teardown();

    let stats = sync.stats();
    info!(
        snapshots = stats.snapshots_applied,
        created = stats.markers_created,
        disposed = stats.markers_disposed,
        "snapmap stopped"
    );

    Ok(())
}

/// Seed a few peers and walk them around so the synchronizer has live
/// traffic to mirror
async fn simulate_peers(feed: Arc<MemoryFeed>) {
    let names = ["Amara", "Bosco", "Chloe"];
    let mut positions: Vec<(String, f64, f64)> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            (
                format!("peer_{}", name.to_lowercase()),
                0.31 + i as f64 * 0.01,
                32.58 - i as f64 * 0.01,
            )
        })
        .collect();

    for ((id, lat, lon), name) in positions.iter().zip(names) {
        let record = PresenceRecord {
            id: id.clone(),
            lat: *lat,
            lon: *lon,
            name: Some(name.to_string()),
            avatar_ref: None,
            inventory: Vec::new(),
        };
        if let Err(error) = feed.set_record(id, &record) {
            warn!(entity_id = %id, error = %error, "peer seed failed");
        }
    }

    let mut timer = interval(Duration::from_secs(2));
    loop {
        timer.tick().await;

        for (id, lat, lon) in positions.iter_mut() {
            let (step_lat, step_lon) = {
                let mut rng = rand::thread_rng();
                (rng.gen_range(-0.005..0.005), rng.gen_range(-0.005..0.005))
            };
            *lat += step_lat;
            *lon += step_lon;

            if let Err(error) = feed.update_fields(id, &PresenceUpdate::position(*lat, *lon)) {
                warn!(entity_id = %id, error = %error, "peer walk write failed");
            }
        }
    }
}
