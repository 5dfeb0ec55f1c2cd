use super::*;
use serde_json::json;

#[test]
fn test_decode_full_record() {
    let value = json!({
        "id": "user_01",
        "lat": 0.3152,
        "lon": 32.5816,
        "name": "Alice",
        "avatarRef": "avatars/alice.png",
        "inventory": [
            {
                "itemName": "Rolex (replica)",
                "category": "Jewelry / Watches",
                "contact": "+256-700-000000",
                "createdAt": "2026-08-01T10:00:00Z"
            }
        ]
    });

    let record = PresenceRecord::from_value("user_01", &value);
    assert_eq!(record.id, "user_01");
    assert_eq!(record.lat, 0.3152);
    assert_eq!(record.lon, 32.5816);
    assert_eq!(record.name.as_deref(), Some("Alice"));
    assert_eq!(record.avatar_ref.as_deref(), Some("avatars/alice.png"));
    assert_eq!(record.inventory.len(), 1);
    assert_eq!(record.inventory[0].item_name, "Rolex (replica)");
}

#[test]
fn test_decode_missing_coordinate_defaults_to_origin() {
    let value = json!({ "id": "x", "name": "No Coords" });

    let record = PresenceRecord::from_value("x", &value);
    assert_eq!(record.coordinate(), Coordinate::new(0.0, 0.0));
    assert_eq!(record.name.as_deref(), Some("No Coords"));
}

#[test]
fn test_decode_non_object_payload_yields_placeholder() {
    let record = PresenceRecord::from_value("y", &json!("not an object"));
    assert_eq!(record, PresenceRecord::placeholder("y"));
    assert_eq!(record.coordinate(), Coordinate::default());
}

#[test]
fn test_decode_malformed_field_does_not_poison_others() {
    // lat is a string, one inventory entry is missing itemName; both
    // default away, the rest of the record still decodes
    let value = json!({
        "lat": "garbage",
        "lon": 7.5,
        "name": "Bob",
        "inventory": [ { "category": "Street Food" } ]
    });

    let record = PresenceRecord::from_value("z", &value);
    assert_eq!(record.lat, 0.0);
    assert_eq!(record.lon, 7.5);
    assert_eq!(record.name.as_deref(), Some("Bob"));
    assert!(record.inventory.is_empty());
}

#[test]
fn test_decode_malformed_listing_keeps_its_siblings() {
    let value = json!({
        "lat": 1.0,
        "lon": 2.0,
        "inventory": [
            { "category": "Street Food" },
            {
                "itemName": "Rolex (replica)",
                "category": "Jewelry / Watches",
                "createdAt": "2026-08-01T10:00:00Z"
            },
            "not even an object"
        ]
    });

    let record = PresenceRecord::from_value("z", &value);
    assert_eq!(record.inventory.len(), 1);
    assert_eq!(record.inventory[0].item_name, "Rolex (replica)");
}

#[test]
fn test_merge_incoming_field_wins_absent_retained() {
    let mut record = PresenceRecord {
        id: "me".to_string(),
        lat: 1.0,
        lon: 2.0,
        name: Some("Old Name".to_string()),
        avatar_ref: Some("avatars/old.png".to_string()),
        inventory: vec![],
    };

    record.merge(&PresenceUpdate {
        lat: Some(3.0),
        name: Some("New Name".to_string()),
        ..PresenceUpdate::default()
    });

    assert_eq!(record.lat, 3.0);
    assert_eq!(record.lon, 2.0); // retained
    assert_eq!(record.name.as_deref(), Some("New Name"));
    assert_eq!(record.avatar_ref.as_deref(), Some("avatars/old.png")); // retained
}

#[test]
fn test_merge_inventory_replaces_wholesale() {
    let mut record = PresenceRecord::placeholder("me");
    record.inventory = vec![Listing {
        item_name: "Chargers".to_string(),
        category: "Chargers, Cables, Adapters".to_string(),
        contact: None,
        created_at: Utc::now(),
    }];

    record.merge(&PresenceUpdate {
        inventory: Some(vec![]),
        ..PresenceUpdate::default()
    });

    assert!(record.inventory.is_empty());
}

#[test]
fn test_wire_shape_is_camel_case() {
    let record = PresenceRecord {
        id: "w".to_string(),
        lat: 1.0,
        lon: 2.0,
        name: None,
        avatar_ref: Some("avatars/w.png".to_string()),
        inventory: vec![Listing {
            item_name: "Sofa set".to_string(),
            category: "Art / Handmade Crafts".to_string(),
            contact: None,
            created_at: Utc::now(),
        }],
    };

    let value = record.to_value();
    assert!(value.get("avatarRef").is_some());
    assert!(value.get("avatar_ref").is_none());
    assert!(value["inventory"][0].get("itemName").is_some());
    assert!(value["inventory"][0].get("createdAt").is_some());
}

#[test]
fn test_catalog_group_lookup() {
    assert_eq!(
        group_for_category("Street Food"),
        Some(CategoryGroup::FoodAndDrinks)
    );
    assert_eq!(
        group_for_category("Boda Boda Delivery"),
        Some(CategoryGroup::Transport)
    );
    assert_eq!(group_for_category("Time Machines"), None);
}

#[test]
fn test_catalog_glyph_fallback() {
    assert_eq!(
        glyph_for_category("Street Food"),
        CategoryGroup::FoodAndDrinks.glyph()
    );
    assert_eq!(glyph_for_category("Time Machines"), FALLBACK_GLYPH);
}

#[test]
fn test_every_category_has_a_group() {
    for (name, _) in CATEGORIES {
        assert!(group_for_category(name).is_some(), "missing group: {name}");
    }
}
