//! List-by-owner route.

use availability_gateway::handlers::list;
use availability_gateway::Response;
use serde_json::json;

use crate::support::Gateway;

#[test]
fn owner_without_slots_gets_empty_list() {
    let gateway = Gateway::new();

    let response = gateway.list("nobody");

    assert_eq!(response.status, 200);
    assert_eq!(response.message, list::RETRIEVED);
    assert_eq!(response.available_times, Some(vec![]));
}

#[test]
fn returns_only_the_owners_slots() {
    let gateway = Gateway::new();
    gateway.create("d1", 100, 200);
    gateway.create("d2", 100, 200);
    gateway.create("d1", 300, 400);

    let slots = gateway.slots_of("d1");

    assert_eq!(slots.len(), 2);
    assert!(slots.iter().all(|s| s.dentist_id == "d1"));
    let mut starts: Vec<i64> = slots.iter().map(|s| s.start_time).collect();
    starts.sort();
    assert_eq!(starts, vec![100, 300]);
    assert_ne!(slots[0].id, slots[1].id);
}

#[test]
fn reply_payload_uses_wire_field_names() {
    let gateway = Gateway::new();
    gateway.create("d1", 100, 200);

    let request = gateway.send(list::TOPIC, json!({ "dentist_id": "d1" }));
    let raw = gateway
        .queue
        .replies_to(&request.id)
        .into_iter()
        .next()
        .unwrap();
    let body: serde_json::Value = raw.decode().unwrap();

    assert_eq!(body["status"], 200);
    let slot = &body["available_times"][0];
    assert_eq!(slot["dentist_id"], "d1");
    assert_eq!(slot["start_time"], 100);
    assert_eq!(slot["end_time"], 200);
    assert!(slot["id"].is_string());
}

#[test]
fn one_undecodable_record_fails_the_whole_list() {
    let gateway = Gateway::new();
    gateway.create("d1", 100, 200);
    gateway
        .store()
        .insert_raw(json!({ "dentist_id": "d1", "start_time": "noon", "end_time": 5 }))
        .unwrap();

    let response = gateway.list("d1");

    assert_eq!(
        response,
        Response::new(500, "An error occurred while decoding results")
    );
    assert!(response.available_times.is_none());
}

#[test]
fn query_failure_replies_500() {
    let gateway = Gateway::scripted();
    gateway.store().fail("find");

    let response = gateway.list("d1");

    assert_eq!(response, Response::new(500, "An error occurred"));
}
