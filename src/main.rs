mod config;
mod mqtt;
mod relay;
#[cfg(test)]
mod test_utils;

use std::process;

use rppal::gpio::Gpio;
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;

use crate::relay::driver::Relay;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_owned()))
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Starting mqtt-pump-bridge (mqtt={}:{}, topic={}, relay_gpio={})",
        config.mqtt.broker_host,
        config.mqtt.broker_port,
        config.mqtt.command_topic,
        config.relay.gpio_pin,
    );

    // The relay pin must sit at a defined LOW before the first message can
    // arrive.
    let pin = match Gpio::new().and_then(|gpio| gpio.get(config.relay.gpio_pin)) {
        Ok(pin) => pin.into_output_low(),
        Err(e) => {
            error!("GPIO init failed: {}", e);
            process::exit(1);
        }
    };
    let mut relay = match Relay::new(pin) {
        Ok(relay) => relay,
        Err(e) => {
            error!("Relay init failed: {}", e);
            process::exit(1);
        }
    };

    let client = mqtt::client::MqttClient::new(&config);

    tokio::select! {
        _ = client.run(&mut relay) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, shutting down");
        }
        _ = async {
            let mut sigterm = tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate()
            ).expect("Failed to register SIGTERM handler");
            sigterm.recv().await;
        } => {
            info!("Received SIGTERM, shutting down");
        }
    }

    // Fail-safe: the pump must not stay powered past process exit.
    if let Err(e) = relay.off() {
        error!("Failed to drive relay low on shutdown: {}", e);
    }
    // rppal resets the pin to its original mode on drop, releasing it.
    drop(relay);
    info!("mqtt-pump-bridge stopped");
}
