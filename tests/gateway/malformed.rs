//! Malformed payloads on external topics: one 400, no store access.

use availability_gateway::handlers::{create, delete, list};
use availability_gateway::Response;

use crate::support::Gateway;

fn assert_bad_request(topic: &str, payload: &str) {
    let gateway = Gateway::scripted();

    let request = gateway.send_raw(topic, payload);

    assert_eq!(
        gateway.replies(&request),
        vec![Response::new(400, "Bad request")],
        "payload {:?} on {}",
        payload,
        topic
    );
    assert!(gateway.store().calls().is_empty(), "payload {:?} on {}", payload, topic);
    assert_eq!(gateway.outbound().len(), 1);
}

#[test]
fn create_rejects_malformed_payloads() {
    assert_bad_request(create::TOPIC, "{{{");
    assert_bad_request(create::TOPIC, "");
    assert_bad_request(create::TOPIC, r#"{"dentist_id":"d1","start_time":1}"#);
    assert_bad_request(
        create::TOPIC,
        r#"{"dentist_id":"d1","start_time":"one","end_time":2}"#,
    );
    assert_bad_request(
        create::TOPIC,
        r#"{"dentist_id":null,"start_time":1,"end_time":2}"#,
    );
}

#[test]
fn list_rejects_malformed_payloads() {
    assert_bad_request(list::TOPIC, "[]");
    assert_bad_request(list::TOPIC, r#"{"dentist":"d1"}"#);
    assert_bad_request(list::TOPIC, r#"{"dentist_id":42}"#);
}

#[test]
fn delete_rejects_malformed_payloads() {
    assert_bad_request(delete::TOPIC, "null");
    assert_bad_request(delete::TOPIC, r#"{}"#);
    assert_bad_request(delete::TOPIC, r#"{"id":{"$oid":1}}"#);
}

#[test]
fn extra_fields_are_ignored() {
    let gateway = Gateway::new();

    let request = gateway.send_raw(
        create::TOPIC,
        r#"{"dentist_id":"d1","start_time":1,"end_time":2,"message":"","status":0}"#,
    );

    assert_eq!(gateway.reply(&request).status, 201);
}
