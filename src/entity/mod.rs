use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

mod catalog;
#[cfg(test)]
mod tests;

pub use catalog::{glyph_for_category, group_for_category, CategoryGroup, CATEGORIES, FALLBACK_GLYPH};

/// Geographic position of an entity or marker
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One inventory item offered by a user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Display name of the offered item
    #[serde(rename = "itemName")]
    pub item_name: String,

    /// Category name (see [`CATEGORIES`])
    pub category: String,

    /// Contact hint (phone, handle); optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    /// When the listing was posted
    #[serde(rename = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A remote actor or pin as persisted in the realtime store.
///
/// Identity is the sole key. The payload is replaced wholesale on every
/// update; there is no field-level merge for remote records.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Stable entity identifier
    pub id: String,

    #[serde(default)]
    pub lat: f64,

    #[serde(default)]
    pub lon: f64,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Avatar image reference
    #[serde(rename = "avatarRef", default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,

    /// Listings offered by this user
    #[serde(default)]
    pub inventory: Vec<Listing>,
}

impl PresenceRecord {
    /// Record with nothing but an id, positioned at (0, 0)
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    /// Decode a raw store document.
    ///
    /// Never fails: each field falls back to its default when missing or
    /// malformed, so a payload with no coordinate lands at (0, 0). Callers
    /// wanting stricter behavior must validate upstream.
    pub fn from_value(id: &str, value: &Value) -> Self {
        let obj = match value.as_object() {
            Some(map) => map,
            None => {
                debug!(entity_id = %id, "payload is not an object, using placeholder");
                return Self::placeholder(id);
            }
        };

        Self {
            id: id.to_string(),
            lat: obj.get("lat").and_then(Value::as_f64).unwrap_or_default(),
            lon: obj.get("lon").and_then(Value::as_f64).unwrap_or_default(),
            name: obj.get("name").and_then(Value::as_str).map(str::to_string),
            avatar_ref: obj
                .get("avatarRef")
                .and_then(Value::as_str)
                .map(str::to_string),
            inventory: obj
                .get("inventory")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| match serde_json::from_value(item.clone()) {
                            Ok(listing) => Some(listing),
                            Err(_) => {
                                debug!(entity_id = %id, "skipping malformed listing");
                                None
                            }
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Serialize to a store document
    pub fn to_value(&self) -> Value {
        // Serialization of these derives cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// Shallow merge: an incoming non-null field overwrites, an absent
    /// field is retained. The inventory replaces wholesale when present.
    pub fn merge(&mut self, update: &PresenceUpdate) {
        if let Some(lat) = update.lat {
            self.lat = lat;
        }
        if let Some(lon) = update.lon {
            self.lon = lon;
        }
        if let Some(name) = &update.name {
            self.name = Some(name.clone());
        }
        if let Some(avatar_ref) = &update.avatar_ref {
            self.avatar_ref = Some(avatar_ref.clone());
        }
        if let Some(inventory) = &update.inventory {
            self.inventory = inventory.clone();
        }
    }
}

/// Partial-field update for the self entity and for partial store writes
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PresenceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "avatarRef", skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<Listing>>,
}

impl PresenceUpdate {
    /// Position-only update
    pub fn position(lat: f64, lon: f64) -> Self {
        Self {
            lat: Some(lat),
            lon: Some(lon),
            ..Self::default()
        }
    }
}
