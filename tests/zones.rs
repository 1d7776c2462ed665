use std::collections::HashMap;

use geofence::editor::{EditEvent, EditorEffect, ZoneEditor};
use geofence::{GeofenceEvaluator, GraceMargin, LatLng, Membership, ZoneKind, ZonePolygon, ZoneSet};

/// Roughly north-east Bogotá
fn zone_a() -> ZonePolygon {
    vec![
        (4.68, -74.07),
        (4.68, -74.02),
        (4.76, -74.02),
        (4.76, -74.07),
    ]
    .into()
}

/// Roughly south-west Bogotá
fn zone_b() -> ZonePolygon {
    vec![
        (4.55, -74.20),
        (4.55, -74.12),
        (4.62, -74.12),
        (4.62, -74.20),
    ]
    .into()
}

fn bogota() -> ZoneSet {
    ZoneSet::new()
        .with_zone(ZoneKind::Home, zone_a())
        .with_zone(ZoneKind::Institutional, zone_b())
}

#[test]
fn test_point_in_one_zone_only() {
    let evaluator = GeofenceEvaluator::default();
    let point = LatLng::new(4.72, -74.05);

    assert!(evaluator.is_inside(point, &zone_a()));
    assert!(!evaluator.is_inside(point, &zone_b()));

    let served = bogota().served_by(point, GraceMargin::default()).unwrap();
    assert_eq!(served, vec![ZoneKind::Home]);
}

#[test]
fn test_point_between_zones_is_unserved() {
    let point = LatLng::new(4.65, -74.10);
    let served = bogota().served_by(point, GraceMargin::default()).unwrap();
    assert!(served.is_empty());
}

#[test]
fn test_address_just_past_the_edge() {
    // ~110m east of zone A's eastern edge
    let point = LatLng::new(4.72, -74.019);
    let zones = bogota();

    assert_eq!(
        zones.check(ZoneKind::Home, point, GraceMargin::NONE).unwrap(),
        Membership::Outside
    );
    assert_eq!(
        zones.check(ZoneKind::Home, point, GraceMargin::default()).unwrap(),
        Membership::WithinMargin
    );
}

#[test]
fn test_settings_store_snapshot() {
    let mut store: HashMap<String, String> = bogota().to_settings().unwrap();
    let snapshot = ZoneSet::from_settings(&store).unwrap();

    // Later writes to the store do not reach an existing snapshot
    store.insert("delivery_zone_b2c".to_string(), "[]".to_string());
    let point = LatLng::new(4.72, -74.05);
    assert!(
        snapshot
            .check(ZoneKind::Home, point, GraceMargin::NONE)
            .unwrap()
            .is_served()
    );

    let refreshed = ZoneSet::from_settings(&store).unwrap();
    assert_eq!(
        refreshed.check(ZoneKind::Home, point, GraceMargin::default()).unwrap(),
        Membership::Outside
    );
}

#[test]
fn test_editor_save_feeds_settings_store() {
    let mut store: HashMap<String, String> = bogota().to_settings().unwrap();
    let zones = ZoneSet::from_settings(&store).unwrap();
    let mut editor = ZoneEditor::new(ZoneKind::Home, zones.zone(ZoneKind::Home).unwrap().clone());
    let changes = editor.subscribe();

    // Stretch the north-east corner further north
    editor.apply(EditEvent::Begin).unwrap();
    editor
        .apply(EditEvent::MoveVertex(2, LatLng::new(4.80, -74.02)))
        .unwrap();
    editor
        .apply(EditEvent::MoveVertex(3, LatLng::new(4.80, -74.07)))
        .unwrap();
    assert_eq!(changes.try_iter().count(), 2);

    let EditorEffect::Persist { key, value } = editor.apply(EditEvent::Save).unwrap() else {
        panic!("dirty editor should request persistence");
    };
    store.insert(key.to_string(), value);
    editor.apply(EditEvent::Saved).unwrap();

    let point = LatLng::new(4.79, -74.05);
    assert!(!zones.served_by(point, GraceMargin::NONE).unwrap().contains(&ZoneKind::Home));
    let updated = ZoneSet::from_settings(&store).unwrap();
    assert!(updated.served_by(point, GraceMargin::NONE).unwrap().contains(&ZoneKind::Home));
}
