use crate::game::constants::{
    HEARTBEAT_INTERVAL_MS, MAX_MESSAGE_BYTES, OUTBOUND_QUEUE_CAPACITY, SPAWN_POINT, WORLD_HEIGHT,
    WORLD_WIDTH,
};
use crate::game::types::{Position, WorldMap};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HEARTBEAT_INTERVAL_MS must be greater than zero")]
    ZeroHeartbeatInterval,
    #[error("OUTBOUND_QUEUE_CAPACITY must be greater than zero")]
    ZeroQueueCapacity,
    #[error("world dimensions must not be negative (got {width}x{height})")]
    NegativeWorld { width: i32, height: i32 },
    #[error("spawn point ({x}, {y}) lies outside the world")]
    SpawnOutOfBounds { x: i32, y: i32 },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub heartbeat_interval: Duration,
    pub world: WorldMap,
    pub max_message_bytes: usize,
    pub outbound_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            heartbeat_interval: Duration::from_millis(HEARTBEAT_INTERVAL_MS),
            world: WorldMap {
                width: WORLD_WIDTH,
                height: WORLD_HEIGHT,
                spawn: SPAWN_POINT,
            },
            max_message_bytes: MAX_MESSAGE_BYTES,
            outbound_queue_capacity: OUTBOUND_QUEUE_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("HOST")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.host);

        let config = Self {
            host,
            port: parse_or(&lookup, "PORT", defaults.port),
            heartbeat_interval: Duration::from_millis(parse_or(
                &lookup,
                "HEARTBEAT_INTERVAL_MS",
                HEARTBEAT_INTERVAL_MS,
            )),
            world: WorldMap {
                width: parse_or(&lookup, "WORLD_WIDTH", defaults.world.width),
                height: parse_or(&lookup, "WORLD_HEIGHT", defaults.world.height),
                spawn: Position::new(
                    parse_or(&lookup, "SPAWN_X", defaults.world.spawn.x),
                    parse_or(&lookup, "SPAWN_Y", defaults.world.spawn.y),
                ),
            },
            max_message_bytes: parse_or(&lookup, "MAX_MESSAGE_BYTES", defaults.max_message_bytes),
            outbound_queue_capacity: parse_or(
                &lookup,
                "OUTBOUND_QUEUE_CAPACITY",
                defaults.outbound_queue_capacity,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_interval.is_zero() {
            return Err(ConfigError::ZeroHeartbeatInterval);
        }
        if self.outbound_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        if self.world.width < 0 || self.world.height < 0 {
            return Err(ConfigError::NegativeWorld {
                width: self.world.width,
                height: self.world.height,
            });
        }
        if !self.world.contains(self.world.spawn) {
            return Err(ConfigError::SpawnOutOfBounds {
                x: self.world.spawn.x,
                y: self.world.spawn.y,
            });
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else { return default };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparseable setting");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).expect("config");
        assert_eq!(config.address(), "0.0.0.0:8787");
        assert_eq!(config.heartbeat_interval, Duration::from_millis(100));
        assert_eq!(config.world.width, 10);
        assert_eq!(config.world.height, 10);
        assert_eq!(config.world.spawn, Position::new(0, 0));
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("HEARTBEAT_INTERVAL_MS", "250"),
            ("WORLD_WIDTH", "20"),
            ("WORLD_HEIGHT", "5"),
            ("SPAWN_X", "20"),
            ("SPAWN_Y", "5"),
        ])
        .expect("config");
        assert_eq!(config.address(), "127.0.0.1:9000");
        assert_eq!(config.heartbeat_interval, Duration::from_millis(250));
        assert_eq!(config.world.spawn, Position::new(20, 5));
    }

    #[test]
    fn unparseable_values_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("WORLD_WIDTH", "")]).expect("config");
        assert_eq!(config.port, 8787);
        assert_eq!(config.world.width, 10);
    }

    #[test]
    fn rejects_invalid_worlds() {
        assert_eq!(
            config_from(&[("HEARTBEAT_INTERVAL_MS", "0")]).unwrap_err(),
            ConfigError::ZeroHeartbeatInterval
        );
        assert_eq!(
            config_from(&[("WORLD_WIDTH", "-1")]).unwrap_err(),
            ConfigError::NegativeWorld { width: -1, height: 10 }
        );
        assert_eq!(
            config_from(&[("SPAWN_X", "11")]).unwrap_err(),
            ConfigError::SpawnOutOfBounds { x: 11, y: 0 }
        );
        assert_eq!(
            config_from(&[("OUTBOUND_QUEUE_CAPACITY", "0")]).unwrap_err(),
            ConfigError::ZeroQueueCapacity
        );
    }
}
