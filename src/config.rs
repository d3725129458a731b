use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub mqtt: MqttConfig,
    pub relay: RelayConfig,
}

#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: String,
    pub command_topic: String,
    pub keep_alive_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// BCM pin number driving the pump relay (active-high).
    pub gpio_pin: u8,
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Build the configuration from the environment. Every setting has a
    /// default, so the bridge runs with nothing set at all.
    pub fn from_env() -> Result<Self, String> {
        let config = Self {
            mqtt: MqttConfig {
                broker_host: env_or_default("MQTT_BROKER_HOST", "localhost".to_string()),
                broker_port: env_or_default("MQTT_BROKER_PORT", 1883),
                username: env_optional("MQTT_USERNAME"),
                password: env_optional("MQTT_PASSWORD"),
                client_id: env_or_default("MQTT_CLIENT_ID", "mqtt-pump-bridge".to_string()),
                command_topic: env_or_default(
                    "MQTT_COMMAND_TOPIC",
                    "esp32/control_command".to_string(),
                ),
                keep_alive_secs: env_or_default("MQTT_KEEP_ALIVE_SECS", 60),
            },
            relay: RelayConfig {
                gpio_pin: env_or_default("RELAY_GPIO", 5),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.mqtt.broker_host.is_empty() {
            return Err("MQTT_BROKER_HOST must not be empty".into());
        }
        if self.mqtt.command_topic.is_empty() {
            return Err("MQTT_COMMAND_TOPIC must not be empty".into());
        }
        // One subscription means one topic; wildcards would turn the filter
        // into a fan-in.
        if self.mqtt.command_topic.contains('#') || self.mqtt.command_topic.contains('+') {
            return Err("MQTT_COMMAND_TOPIC must not contain wildcards".into());
        }
        if self.mqtt.keep_alive_secs < 5 {
            return Err("MQTT_KEEP_ALIVE_SECS must be at least 5".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            mqtt: MqttConfig {
                broker_host: "localhost".to_string(),
                broker_port: 1883,
                username: None,
                password: None,
                client_id: "mqtt-pump-bridge".to_string(),
                command_topic: "esp32/control_command".to_string(),
                keep_alive_secs: 60,
            },
            relay: RelayConfig { gpio_pin: 5 },
        }
    }

    #[test]
    fn default_shape_validates() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn empty_host_rejected() {
        let mut config = base_config();
        config.mqtt.broker_host.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_topic_rejected() {
        let mut config = base_config();
        config.mqtt.command_topic.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn wildcard_topics_rejected() {
        for topic in ["esp32/#", "esp32/+/command", "#"] {
            let mut config = base_config();
            config.mqtt.command_topic = topic.to_string();
            assert!(config.validate().is_err(), "{topic} should be rejected");
        }
    }

    #[test]
    fn keep_alive_floor_enforced() {
        let mut config = base_config();
        config.mqtt.keep_alive_secs = 4;
        assert!(config.validate().is_err());
        config.mqtt.keep_alive_secs = 5;
        assert!(config.validate().is_ok());
    }
}
