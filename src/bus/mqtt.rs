//! MQTT bus backed by the `rumqttc` synchronous client.
//!
//! All traffic uses QoS 0. Incoming publishes are forwarded from the
//! connection's event loop thread into a channel drained by `poll`.
//! Subscriptions are (re)issued on every ConnAck so they survive reconnects.

use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use rumqttc::{Client, Connection, Event, MqttOptions, Packet, QoS};
use tracing::{debug, info, warn};

use super::{Message, PublishError, Publisher, Subscriber};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Connection settings for [`MqttBus`].
#[derive(Debug, Clone)]
pub struct MqttSettings {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive: Duration,
    /// Capacity of the client's request channel.
    pub capacity: usize,
}

/// Publisher and subscriber over a single MQTT connection.
#[derive(Clone)]
pub struct MqttBus {
    client: Client,
    inbox: Arc<Mutex<mpsc::Receiver<Message>>>,
}

impl MqttBus {
    /// Open a connection and subscribe to `topics`.
    ///
    /// Returns as soon as the event loop thread is running; the broker
    /// connection itself is established (and retried) in the background.
    pub fn connect<T: AsRef<str>>(
        settings: &MqttSettings,
        topics: &[T],
    ) -> Result<Self, PublishError> {
        let mut options = MqttOptions::new(&settings.client_id, &settings.host, settings.port);
        options.set_keep_alive(settings.keep_alive);

        let (client, connection) = Client::new(options, settings.capacity);
        let (tx, rx) = mpsc::channel();
        let topics: Vec<String> = topics.iter().map(|t| t.as_ref().to_string()).collect();
        let loop_client = client.clone();

        thread::Builder::new()
            .name("mqtt-event-loop".into())
            .spawn(move || run_event_loop(connection, loop_client, topics, tx))
            .map_err(|e| PublishError::ConnectionFailed(e.to_string()))?;

        info!(host = %settings.host, port = settings.port, "mqtt client started");

        Ok(Self {
            client,
            inbox: Arc::new(Mutex::new(rx)),
        })
    }
}

fn run_event_loop(
    mut connection: Connection,
    client: Client,
    topics: Vec<String>,
    inbox: mpsc::Sender<Message>,
) {
    for notification in connection.iter() {
        match notification {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                for topic in &topics {
                    // try_subscribe: this thread is the one draining the request channel.
                    if let Err(e) = client.try_subscribe(topic.as_str(), QoS::AtMostOnce) {
                        warn!(topic = %topic, error = %e, "mqtt subscribe failed");
                    }
                }
                info!(topics = topics.len(), "mqtt connected");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let message = Message::new(publish.topic.clone(), publish.payload.to_vec());
                if inbox.send(message).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "mqtt connection error, reconnecting");
                thread::sleep(RECONNECT_DELAY);
            }
        }
    }
    debug!("mqtt event loop finished");
}

impl Publisher for MqttBus {
    fn publish(&self, message: Message) -> Result<(), PublishError> {
        self.client
            .publish(message.topic, QoS::AtMostOnce, false, message.payload)
            .map_err(|e| PublishError::ConnectionFailed(e.to_string()))
    }
}

impl Subscriber for MqttBus {
    fn poll(&self, timeout_ms: u64) -> Result<Option<Message>, PublishError> {
        let inbox = self
            .inbox
            .lock()
            .map_err(|_| PublishError::ConnectionFailed("lock poisoned".into()))?;

        match inbox.recv_timeout(Duration::from_millis(timeout_ms)) {
            Ok(message) => Ok(Some(message)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PublishError::Closed),
        }
    }
}
