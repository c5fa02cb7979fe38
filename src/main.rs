use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use availability_gateway::bus::{MqttBus, MqttSettings};
use availability_gateway::slots::{MongoSettings, MongoSlotStore};
use availability_gateway::{dispatch, handlers, telemetry, Config};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let store = MongoSlotStore::connect(&MongoSettings {
        uri: config.mongo.uri.clone(),
        database: config.mongo.database.clone(),
        collection: config.mongo.collection.clone(),
    })
    .context("Failed to connect to MongoDB")?;

    let bus = MqttBus::connect(
        &MqttSettings {
            host: config.mqtt.host.clone(),
            port: config.mqtt.port,
            client_id: config.mqtt.client_id.clone(),
            keep_alive: config.mqtt.keep_alive,
            capacity: 64,
        },
        &handlers::SUBSCRIBED_TOPICS,
    )
    .context("Failed to start MQTT client")?;

    let service = Arc::new(
        handlers::gateway(store, bus.clone()).with_dedup_policy(config.dedup_policy),
    );

    info!(
        dedup_policy = ?config.dedup_policy,
        topics = ?handlers::SUBSCRIBED_TOPICS,
        "availability gateway listening"
    );

    let stats = dispatch::subscribe(service, bus, config.poll_interval).join();

    info!(
        received = stats.received,
        handled = stats.handled,
        failed = stats.failed,
        "availability gateway stopped"
    );
    Err(anyhow!("message bus closed"))
}
