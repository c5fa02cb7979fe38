//! Bus transport: the gateway consuming requests from a subscriber.

use std::thread;
use std::time::Duration;

use availability_gateway::bus::{Message, Publisher};
use availability_gateway::dispatch;
use availability_gateway::handlers::{self, create, list, migrate};
use availability_gateway::Response;
use serde_json::json;

use crate::support::Gateway;

#[test]
fn serves_requests_from_the_bus() {
    let gateway = Gateway::new();
    let handle = dispatch::subscribe(
        gateway.service.clone(),
        gateway.queue.subscribe_to(&handlers::SUBSCRIBED_TOPICS),
        Duration::from_millis(5),
    );

    let created = Message::encode(
        create::TOPIC,
        &json!({ "dentist_id": "d1", "start_time": 10, "end_time": 20 }),
    )
    .unwrap();
    let migrated = Message::encode(
        migrate::TOPIC,
        &json!({ "dentist_id": "d1", "start_time": 30, "end_time": 40 }),
    )
    .unwrap();
    gateway.queue.publish(created.clone()).unwrap();
    gateway.queue.publish(migrated).unwrap();

    thread::sleep(Duration::from_millis(300));

    let listed = Message::encode(list::TOPIC, &json!({ "dentist_id": "d1" })).unwrap();
    gateway.queue.publish(listed.clone()).unwrap();

    thread::sleep(Duration::from_millis(300));
    let stats = handle.stop();

    assert_eq!(stats.received, 3);
    assert_eq!(stats.handled, 3);
    assert_eq!(gateway.reply(&created).status, 201);

    let listing: Response = gateway.reply(&listed);
    assert_eq!(listing.available_times.map(|s| s.len()), Some(2));

    // Replies are not fed back into the gateway.
    assert_eq!(gateway.queue.len(), 5);
}

#[test]
fn stopping_ends_polling() {
    let gateway = Gateway::new();
    let handle = dispatch::subscribe(
        gateway.service.clone(),
        gateway.queue.subscribe_to(&handlers::SUBSCRIBED_TOPICS),
        Duration::from_millis(5),
    );

    let stats = handle.stop();
    gateway
        .queue
        .publish(Message::with_string_payload(create::TOPIC, "{}"))
        .unwrap();
    thread::sleep(Duration::from_millis(50));

    assert_eq!(stats.received, 0);
    assert!(gateway.queue.find_by_topic(create::REPLY_TOPIC.unwrap()).is_none());
}
