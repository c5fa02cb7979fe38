//! Create route: existence check, range check, insert, one reply per request.

use std::sync::Arc;
use std::thread;

use availability_gateway::bus::Message;
use availability_gateway::handlers::create;
use availability_gateway::slots::SlotStore;
use availability_gateway::{DedupPolicy, Response};
use serde_json::json;

use crate::support::Gateway;

#[test]
fn valid_create_inserts_once_and_replies_201() {
    let gateway = Gateway::new();

    let response = gateway.create("d1", 100, 200);

    assert_eq!(response, Response::created(create::CREATED));
    let stored = gateway.store().all().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].dentist_id, "d1");
    assert_eq!((stored[0].start_time, stored[0].end_time), (100, 200));
    assert!(!stored[0].id.is_empty());
}

#[test]
fn zero_length_slot_is_accepted() {
    let gateway = Gateway::new();
    assert_eq!(gateway.create("d1", 150, 150).status, 201);
}

#[test]
fn identical_triple_is_409_without_insert() {
    let gateway = Gateway::new();
    gateway.create("d1", 100, 200);

    let response = gateway.create("d1", 100, 200);

    assert_eq!(response, Response::new(409, create::ALREADY_EXISTS));
    assert_eq!(gateway.store().len(), 1);
}

#[test]
fn same_interval_for_another_dentist_is_not_a_duplicate() {
    let gateway = Gateway::new();
    gateway.create("d1", 100, 200);

    assert_eq!(gateway.create("d2", 100, 200).status, 201);
    assert_eq!(gateway.store().len(), 2);
}

#[test]
fn reversed_range_is_409_without_insert() {
    let gateway = Gateway::new();

    let response = gateway.create("d1", 300, 250);

    assert_eq!(response, Response::new(409, create::INVALID_RANGE));
    assert!(gateway.store().is_empty());
}

#[test]
fn reversed_range_is_409_even_when_duplicate() {
    let gateway = Gateway::new();
    // Legacy data skipped the range check.
    gateway
        .store()
        .insert_raw(json!({ "dentist_id": "d1", "start_time": 300, "end_time": 250 }))
        .unwrap();

    let response = gateway.create("d1", 300, 250);

    assert_eq!(response.status, 409);
    assert_eq!(gateway.store().len(), 1);
}

#[test]
fn insert_failure_replies_500_once() {
    let gateway = Gateway::scripted();
    gateway.store().fail("insert");

    let request = gateway.send(
        create::TOPIC,
        json!({ "dentist_id": "d1", "start_time": 1, "end_time": 2 }),
    );

    assert_eq!(gateway.reply(&request), Response::new(500, "An error occurred"));
    assert!(gateway.store().inner.is_empty());

    // The service keeps serving.
    gateway.store().heal("insert");
    assert_eq!(gateway.create("d1", 1, 2).status, 201);
}

#[test]
fn failed_existence_check_rejects_by_default() {
    let gateway = Gateway::scripted();
    gateway.store().fail("count");

    let response = gateway.create("d1", 1, 2);

    assert_eq!(response, Response::new(500, "Unable to validate uniqueness"));
    assert_eq!(gateway.store().calls(), vec!["count"]);
    assert!(gateway.store().inner.is_empty());
}

#[test]
fn failed_existence_check_proceeds_when_failing_open() {
    let gateway = Gateway::scripted_with_policy(DedupPolicy::FailOpen);
    gateway.store().fail("count");

    let response = gateway.create("d1", 1, 2);

    assert_eq!(response.status, 201);
    assert_eq!(gateway.store().calls(), vec!["count", "insert"]);
    assert_eq!(gateway.store().inner.len(), 1);
}

#[test]
fn store_uniqueness_catches_a_duplicate_the_check_missed() {
    let gateway = Gateway::scripted_with_policy(DedupPolicy::FailOpen);
    gateway.create("d1", 1, 2);

    // The existence check is blind, so only the insert can refuse.
    gateway.store().fail("count");
    let response = gateway.create("d1", 1, 2);

    assert_eq!(response, Response::new(409, create::ALREADY_EXISTS));
    assert_eq!(gateway.store().inner.len(), 1);
}

#[test]
fn concurrent_identical_creates_store_one_slot() {
    let gateway = Gateway::new();
    let payload = json!({ "dentist_id": "d1", "start_time": 100, "end_time": 200 }).to_string();

    let requests: Vec<Message> = (0..8)
        .map(|_| Message::with_string_payload(create::TOPIC, payload.clone()))
        .collect();

    let workers: Vec<_> = requests
        .iter()
        .cloned()
        .map(|request| {
            let service = Arc::clone(&gateway.service);
            thread::spawn(move || {
                let _ = service.handle(&request);
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let statuses: Vec<u16> = requests.iter().map(|r| gateway.reply(r).status).collect();
    assert_eq!(statuses.iter().filter(|s| **s == 201).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == 409).count(), 7);
    assert_eq!(
        gateway
            .store()
            .count_matching(&availability_gateway::NewSlot::new("d1", 100, 200).key())
            .unwrap(),
        1
    );
}
