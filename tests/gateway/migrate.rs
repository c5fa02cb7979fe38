//! Internal migration route: same rules as create, never any reply.

use availability_gateway::handlers::migrate;
use availability_gateway::HandlerError;
use serde_json::json;

use crate::support::Gateway;

#[test]
fn migrated_slot_is_stored_silently() {
    let gateway = Gateway::new();

    gateway.migrate("d1", 100, 200);

    assert_eq!(gateway.store().len(), 1);
    assert!(gateway.outbound().is_empty());
}

#[test]
fn duplicate_is_skipped_silently() {
    let gateway = Gateway::new();
    gateway.migrate("d1", 100, 200);

    let request = gateway.migrate("d1", 100, 200);

    assert_eq!(gateway.store().len(), 1);
    assert!(gateway.outbound().is_empty());
    assert!(matches!(
        gateway.service.dispatch(&request),
        Err(HandlerError::Conflict(_))
    ));
}

#[test]
fn reversed_range_is_skipped_silently() {
    let gateway = Gateway::new();

    gateway.migrate("d1", 300, 250);

    assert!(gateway.store().is_empty());
    assert!(gateway.outbound().is_empty());
}

#[test]
fn store_failure_is_silent() {
    let gateway = Gateway::scripted();
    gateway.store().fail("insert");

    gateway.migrate("d1", 1, 2);

    assert!(gateway.store().inner.is_empty());
    assert!(gateway.outbound().is_empty());
}

#[test]
fn malformed_payload_is_dropped_without_store_access() {
    let gateway = Gateway::scripted();

    gateway.send_raw(migrate::TOPIC, "not json at all");
    gateway.send(migrate::TOPIC, json!({ "dentist_id": "d1" }));
    gateway.send(
        migrate::TOPIC,
        json!({ "dentist_id": "d1", "start_time": "early", "end_time": 2 }),
    );

    assert!(gateway.store().calls().is_empty());
    assert!(gateway.outbound().is_empty());
}
