//! Delete route and the compensating notice.

use availability_gateway::bus::CORRELATION_ID;
use availability_gateway::handlers::delete::{self, DeleteNotice};
use availability_gateway::slots::InMemorySlotStore;
use availability_gateway::Response;
use serde_json::json;

use crate::support::Gateway;

#[test]
fn deleting_existing_slot_replies_200() {
    let gateway = Gateway::new();
    gateway.create("d1", 100, 200);
    let id = gateway.slots_of("d1")[0].id.clone();

    let response = gateway.delete(&id);

    assert_eq!(response, Response::ok(delete::DELETED));
    assert!(gateway.slots_of("d1").is_empty());
    assert!(gateway.notices().is_empty());
}

#[test]
fn deleting_missing_slot_publishes_notice_and_no_200() {
    let gateway = Gateway::new();

    let request = gateway.send(delete::TOPIC, json!({ "id": "ghost" }));

    let replies = gateway.replies(&request);
    assert_eq!(replies, vec![Response::new(404, "Available time not found")]);
    assert_eq!(gateway.notices(), vec![DeleteNotice { id: "ghost".into() }]);
}

#[test]
fn notice_is_correlated_with_the_request() {
    let gateway = Gateway::new();

    let request = gateway.send(delete::TOPIC, json!({ "id": "ghost" }));

    let notice = gateway.queue.find_by_topic(delete::NOTICE_TOPIC).unwrap();
    assert_eq!(notice.metadata_value(CORRELATION_ID), Some(request.id.as_str()));
    assert_eq!(notice.payload_str(), Some(r#"{"id":"ghost"}"#));
}

#[test]
fn second_delete_of_same_id_is_compensated() {
    let gateway = Gateway::new();
    gateway.create("d1", 100, 200);
    let id = gateway.slots_of("d1")[0].id.clone();

    assert_eq!(gateway.delete(&id).status, 200);
    assert_eq!(gateway.delete(&id).status, 404);

    assert_eq!(gateway.notices(), vec![DeleteNotice { id }]);
}

#[test]
fn store_failure_is_reported_not_fatal() {
    let gateway = Gateway::scripted();
    gateway.create("d1", 100, 200);
    let id = gateway.slots_of("d1")[0].id.clone();
    gateway.store().fail("delete");

    assert_eq!(gateway.delete(&id), Response::new(500, "An error occurred"));
    assert!(gateway.notices().is_empty());

    gateway.store().heal("delete");
    assert_eq!(gateway.delete(&id).status, 200);
}

#[test]
fn failed_notice_still_replies_404() {
    let gateway = Gateway::rejecting(InMemorySlotStore::new(), delete::NOTICE_TOPIC);

    let request = gateway.send(delete::TOPIC, json!({ "id": "ghost" }));

    assert_eq!(
        gateway.replies(&request),
        vec![Response::new(404, "Available time not found")]
    );
    assert!(gateway.notices().is_empty());
    assert_eq!(gateway.outbound().len(), 1);
}
