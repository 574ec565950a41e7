//! Client configuration.

use std::time::Duration;

use gambit_connection::ReconnectPolicy;
use gambit_protocol::{
    DEFAULT_FIRST_MOVER_CLAIM, DEFAULT_PAIR_LITERAL, DEFAULT_SECOND_MOVER_CLAIM,
    LiteralCodec, ProtocolError,
};
use serde::{Deserialize, Serialize};

use crate::GambitError;

/// Settings for a [`GambitClient`](crate::GambitClient).
///
/// Every field has a default, so a config file only needs the fields it
/// changes:
///
/// ```rust
/// use gambit::ClientConfig;
///
/// let config = ClientConfig::from_json(r#"{
///     "address": "ws://relay.example:9000",
///     "reconnect": { "max_attempts": 3 }
/// }"#).unwrap();
///
/// assert_eq!(config.reconnect.max_attempts, 3);
/// assert_eq!(config.reconnect.base_interval_ms, 5_000);
/// assert_eq!(config.pair_literal, "PAIR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Relay URL. Default: `ws://localhost:8080`.
    pub address: String,

    /// WebSocket sub-protocols to offer. Default: none.
    pub protocols: Vec<String>,

    /// Reconnection behavior.
    pub reconnect: ReconnectPolicy,

    /// Capacity of the event channels. Default: 64.
    pub event_capacity: usize,

    /// How long shutdown waits for background tasks. Default: 1000 ms.
    pub shutdown_timeout_ms: u64,

    /// Pairing/rematch literal. Default: `PAIR`.
    pub pair_literal: String,

    /// Literal meaning "sender took first-mover". Default: `COLOR_B`.
    pub color_sentinel: String,

    /// Literal meaning "sender took second-mover". Default: `COLOR_W`.
    pub counter_color_sentinel: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "ws://localhost:8080".to_string(),
            protocols: Vec::new(),
            reconnect: ReconnectPolicy::default(),
            event_capacity: 64,
            shutdown_timeout_ms: 1_000,
            pair_literal: DEFAULT_PAIR_LITERAL.to_string(),
            color_sentinel: DEFAULT_FIRST_MOVER_CLAIM.to_string(),
            counter_color_sentinel: DEFAULT_SECOND_MOVER_CLAIM.to_string(),
        }
    }
}

impl ClientConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, GambitError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds the wire codec from the configured literals.
    ///
    /// # Errors
    /// Fails if a literal is empty, multi-line, or equal to another.
    pub fn codec(&self) -> Result<LiteralCodec, ProtocolError> {
        LiteralCodec::new(
            self.pair_literal.as_str(),
            self.color_sentinel.as_str(),
            self.counter_color_sentinel.as_str(),
        )
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.address, "ws://localhost:8080");
        assert_eq!(config.reconnect, ReconnectPolicy::default());
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_from_json_garbage_returns_config_error() {
        let result = ClientConfig::from_json("{ not json");
        assert!(matches!(result, Err(GambitError::Config(_))));
    }

    #[test]
    fn test_codec_rejects_colliding_literals() {
        let config = ClientConfig {
            color_sentinel: "PAIR".into(),
            ..ClientConfig::default()
        };
        assert!(config.codec().is_err());
    }

    #[test]
    fn test_codec_uses_configured_literals() {
        use gambit_protocol::{Codec, Frame};

        let config = ClientConfig {
            pair_literal: "MATCH".into(),
            ..ClientConfig::default()
        };
        let codec = config.codec().unwrap();
        assert_eq!(codec.encode(&Frame::Pair), "MATCH");
    }
}
