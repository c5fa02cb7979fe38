//! Process configuration read from the environment.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use uuid::Uuid;

use crate::dispatch::DedupPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub mongo: MongoConfig,
    pub mqtt: MqttConfig,
    pub dedup_policy: DedupPolicy,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = lookup("MONGO_URI")
            .filter(|v| !v.trim().is_empty())
            .context("MONGO_URI must be set")?;
        if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
            return Err(anyhow!(
                "MONGO_URI must start with mongodb:// or mongodb+srv://"
            ));
        }

        let mongo = MongoConfig {
            uri,
            database: lookup("MONGO_DATABASE").unwrap_or_else(|| "AppointmentService".to_string()),
            collection: lookup("MONGO_COLLECTION").unwrap_or_else(|| "AvailableTimes".to_string()),
        };

        let port = match lookup("MQTT_PORT") {
            Some(val) => val.parse::<u16>().context("Failed to parse MQTT_PORT")?,
            None => 1883,
        };
        let keep_alive = match lookup("MQTT_KEEP_ALIVE_SECS") {
            Some(val) => val
                .parse::<u64>()
                .context("Failed to parse MQTT_KEEP_ALIVE_SECS")?,
            None => 30,
        };

        let mqtt = MqttConfig {
            host: lookup("MQTT_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            client_id: lookup("MQTT_CLIENT_ID")
                .unwrap_or_else(|| format!("availability-gateway-{}", Uuid::new_v4().simple())),
            keep_alive: Duration::from_secs(keep_alive),
        };

        let dedup_policy = match lookup("DEDUP_POLICY") {
            Some(val) => val
                .parse::<DedupPolicy>()
                .map_err(|e| anyhow!("Failed to parse DEDUP_POLICY: {}", e))?,
            None => DedupPolicy::default(),
        };

        let poll_interval = match lookup("POLL_INTERVAL_MS") {
            Some(val) => Duration::from_millis(
                val.parse::<u64>()
                    .context("Failed to parse POLL_INTERVAL_MS")?,
            ),
            None => Duration::from_millis(50),
        };

        Ok(Self {
            mongo,
            mqtt,
            dedup_policy,
            poll_interval,
        })
    }
}
