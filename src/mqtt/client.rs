use std::time::Duration;

use embedded_hal::digital::OutputPin;
use rumqttc::{AsyncClient, ConnAck, Event, EventLoop, Incoming, MqttOptions, Publish, QoS};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::relay::driver::{self, Relay};

pub struct MqttClient {
    client: AsyncClient,
    eventloop: EventLoop,
    command_topic: String,
}

impl MqttClient {
    pub fn new(config: &Config) -> Self {
        let mut mqttopts = MqttOptions::new(
            &config.mqtt.client_id,
            &config.mqtt.broker_host,
            config.mqtt.broker_port,
        );
        mqttopts.set_keep_alive(Duration::from_secs(config.mqtt.keep_alive_secs));

        if let (Some(user), Some(pass)) = (&config.mqtt.username, &config.mqtt.password) {
            mqttopts.set_credentials(user, pass);
        }

        let (client, eventloop) = AsyncClient::new(mqttopts, 10);

        Self {
            client,
            eventloop,
            command_topic: config.mqtt.command_topic.clone(),
        }
    }

    /// Run the MQTT event loop against the relay. (Re-)subscribes on every
    /// ConnAck, applies each incoming publish to the relay, and never
    /// returns; connection errors are logged and polling resumes after a
    /// short pause so the session can re-establish.
    pub async fn run<P: OutputPin>(mut self, relay: &mut Relay<P>) {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Incoming::ConnAck(ack))) => self.on_connect(&ack).await,
                Ok(Event::Incoming(Incoming::Publish(publish))) => {
                    Self::on_message(relay, &publish);
                }
                Ok(_) => {}
                Err(e) => {
                    error!("MQTT connection error: {}. Reconnecting...", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    /// Connect handler: logs the handshake result and issues the one
    /// subscription. A failed subscribe is logged and left to the next
    /// reconnect; there is nothing else to escalate to.
    async fn on_connect(&self, ack: &ConnAck) {
        info!(
            "Connected to MQTT broker (session_present={}, code={:?})",
            ack.session_present, ack.code,
        );
        if let Err(e) = self
            .client
            .subscribe(&self.command_topic, QoS::AtMostOnce)
            .await
        {
            error!("Failed to subscribe to {}: {}", self.command_topic, e);
        }
    }

    /// Message handler: applies the payload to the relay and logs the typed
    /// outcome. A bad message is contained here and never breaks the loop.
    fn on_message<P: OutputPin>(relay: &mut Relay<P>, publish: &Publish) {
        debug!("Message on {} ({} bytes)", publish.topic, publish.payload.len());
        match driver::apply_command(relay, &publish.payload) {
            Ok(outcome) => info!("{}", outcome),
            Err(e) => error!("Error handling MQTT message: {}", e),
        }
    }
}
