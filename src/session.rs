// src/session.rs - Board bring-up, pin-state sweep, table rendering, blink demo
use crate::client::{ClientError, ClientEvent, FirmataClient, FirmwareInfo, port_count};
use crate::config::SessionConfig;
use crate::pintable::{Board, MarkdownRenderer, PinMode, PinNamer, RenderError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, sleep, timeout, timeout_at};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Timed out after {elapsed:?} waiting for {what}: {received} of {expected} received")]
    Timeout { what: &'static str, received: usize, expected: usize, elapsed: Duration },
    #[error("Event stream closed")]
    EventsClosed,
    #[error("Client event stream was already taken")]
    EventsUnavailable,
    #[error("Board reports {0} pins, more than a Firmata pin id can address")]
    TooManyPins(usize),
}

/// Drives one connected board. Holds the client exclusively, so the pin
/// array cannot change underneath a render.
pub struct Session<C: FirmataClient> {
    client: C,
    events: mpsc::UnboundedReceiver<ClientEvent>,
    settings: SessionConfig,
    firmware: FirmwareInfo,
}

impl<C: FirmataClient> Session<C> {
    pub async fn connect(mut client: C, settings: SessionConfig) -> Result<Self, SessionError> {
        let events = client.take_events().ok_or(SessionError::EventsUnavailable)?;

        tracing::info!("Connecting to board");
        let started = Instant::now();
        let firmware = match timeout(settings.connect_timeout(), client.handshake()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SessionError::Timeout {
                    what: "handshake",
                    received: 0,
                    expected: 1,
                    elapsed: started.elapsed(),
                });
            }
        };

        let pins = client.pins();
        tracing::info!("Connected to board");
        tracing::info!("Protocol {}", firmware.protocol_version);
        tracing::info!("Firmware {} {}", firmware.firmware_name, firmware.firmware_version);
        tracing::info!("Pins total: {}", pins.len());
        tracing::info!("AnalogPins total: {}", pins.iter().filter(|p| p.has_analog_channel()).count());

        Ok(Self {
            client,
            events,
            settings,
            firmware,
        })
    }

    pub fn firmware(&self) -> &FirmwareInfo {
        &self.firmware
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn into_client(self) -> C {
        self.client
    }

    fn pin_ids(&self) -> Result<std::ops::Range<u8>, SessionError> {
        let total = self.client.pins().len();
        let end = u8::try_from(total).map_err(|_| SessionError::TooManyPins(total))?;
        Ok(0..end)
    }

    /// Queries every pin and waits until each has answered. Once this
    /// returns the pin array is settled and safe to render.
    pub async fn query_pin_states(&mut self) -> Result<(), SessionError> {
        let ids = self.pin_ids()?;
        let expected = ids.len();
        tracing::info!("Querying state of {} pins", expected);
        for pin in ids {
            self.client.query_pin_state(pin).await?;
        }
        self.await_events("pin state responses", expected, |event| {
            if let ClientEvent::PinState { pin } = event {
                tracing::debug!("Pin state response for pin {}", pin);
                true
            } else {
                false
            }
        })
        .await?;
        tracing::info!("Pin state query finished");
        Ok(())
    }

    /// Toggles digital reporting on each port and waits for the port
    /// messages the board sends back.
    pub async fn probe_digital_ports(&mut self) -> Result<(), SessionError> {
        let ports = match self.settings.digital_ports {
            Some(ports) => ports,
            None => {
                let total = port_count(self.client.pins().len());
                u8::try_from(total).map_err(|_| SessionError::TooManyPins(self.client.pins().len()))?
            }
        };
        tracing::info!("Probing {} digital ports", ports);
        for port in 0..ports {
            self.client.report_digital(port, true).await?;
            self.client.report_digital(port, false).await?;
        }
        self.await_events("digital port messages", ports as usize, |event| {
            if let ClientEvent::Digital { port, pins } = event {
                tracing::debug!("Digital message for port {}: pins {:?}", port, pins);
                true
            } else {
                false
            }
        })
        .await?;
        tracing::info!("Digital port probe finished");
        Ok(())
    }

    pub fn render(&self, board: &Board, names: &dyn PinNamer) -> Result<Vec<String>, SessionError> {
        let tables = MarkdownRenderer::new(board, names).render_all(self.client.pins())?;
        Ok(tables)
    }

    /// Drives `pins` as outputs with alternating levels, flipping every
    /// `interval`. Runs `cycles` times, or until the future is dropped.
    pub async fn blink(&mut self, pins: &[u8], interval: Duration, cycles: Option<u64>) -> Result<(), SessionError> {
        for &pin in pins {
            self.client.set_pin_mode(pin, PinMode::Output).await?;
        }
        tracing::info!("Blinking pins {:?} every {:?}", pins, interval);

        let mut level = false;
        let mut cycle = 0u64;
        while cycles.is_none_or(|limit| cycle < limit) {
            for (i, &pin) in pins.iter().enumerate() {
                self.client.set_digital_pin_value(pin, level ^ (i % 2 == 1)).await?;
            }
            tracing::debug!("Blink cycle {}: first pin {}", cycle, if level { "high" } else { "low" });
            level = !level;
            cycle += 1;
            self.drain_events();
            sleep(interval).await;
        }
        Ok(())
    }

    async fn await_events<F>(&mut self, what: &'static str, expected: usize, mut counts: F) -> Result<(), SessionError>
    where
        F: FnMut(&ClientEvent) -> bool,
    {
        let started = Instant::now();
        let deadline = started + self.settings.query_timeout();
        let mut received = 0;
        while received < expected {
            match timeout_at(deadline, self.events.recv()).await {
                Ok(Some(event)) => {
                    if counts(&event) {
                        received += 1;
                    } else {
                        log_event(&event);
                    }
                }
                Ok(None) => return Err(SessionError::EventsClosed),
                Err(_) => {
                    tracing::warn!("Timed out waiting for {} ({} of {})", what, received, expected);
                    return Err(SessionError::Timeout {
                        what,
                        received,
                        expected,
                        elapsed: started.elapsed(),
                    });
                }
            }
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            log_event(&event);
        }
    }
}

fn log_event(event: &ClientEvent) {
    match event {
        ClientEvent::Connected(info) => tracing::debug!("Connected event: {:?}", info),
        ClientEvent::PinState { pin } => tracing::debug!("Pin state response for pin {}", pin),
        ClientEvent::Analog { pin, value } => tracing::info!("Analog message: pin {} = {}", pin, value),
        ClientEvent::Digital { port, pins } => tracing::debug!("Digital message for port {}: pins {:?}", port, pins),
        ClientEvent::StringData(data) => tracing::info!("String data: {}", data),
        ClientEvent::Sysex(buf) => tracing::info!("Sysex response: {:02x?}", buf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::BoardModel;
    use crate::simulator::SimulatedBoard;

    fn settings() -> SessionConfig {
        SessionConfig {
            connect_timeout_ms: 1_000,
            query_timeout_ms: 200,
            digital_ports: None,
        }
    }

    async fn connected() -> Session<SimulatedBoard> {
        let sim = SimulatedBoard::from_layout(BoardModel::Stm32f407vet6.board());
        Session::connect(sim, settings()).await.unwrap()
    }

    #[tokio::test]
    async fn test_full_sweep_then_render() {
        let mut session = connected().await;
        session.query_pin_states().await.unwrap();
        session.probe_digital_ports().await.unwrap();
        let model = BoardModel::Stm32f407vet6;
        let tables = session.render(model.board(), model.names()).unwrap();
        assert_eq!(tables.len(), 2);
        assert!(tables[0].contains("| 0 | [I O A PULLUP] | I | 0 | 0 | 6 | PC0 |"));
    }

    #[tokio::test]
    async fn test_connect_without_events_fails() {
        let mut sim = SimulatedBoard::from_layout(BoardModel::Stm32f407vet6.board());
        sim.take_events();
        assert!(matches!(
            Session::connect(sim, settings()).await,
            Err(SessionError::EventsUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_probe_more_ports_than_board_has() {
        let mut session = connected().await;
        session.settings.digital_ports = Some(13);
        assert!(matches!(
            session.probe_digital_ports().await,
            Err(SessionError::Client(ClientError::InvalidPort(12)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_responses_time_out() {
        let mut session = connected().await;
        // Swallow the port replies so the wait cannot complete.
        session.client.report_digital(0, true).await.unwrap();
        session.client.report_digital(0, false).await.unwrap();
        while session.events.try_recv().is_ok() {}
        let result = session
            .await_events("digital port messages", 1, |e| matches!(e, ClientEvent::Digital { .. }))
            .await;
        assert!(matches!(
            result,
            Err(SessionError::Timeout { received: 0, expected: 1, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blink_alternates_levels() {
        let mut session = connected().await;
        session.blink(&[66, 67], Duration::from_millis(10), Some(3)).await.unwrap();
        // Three cycles: low/high, high/low, low/high.
        let pins = session.client().pins();
        assert_eq!(pins[66].mode, PinMode::Output);
        assert_eq!(pins[66].value, 0);
        assert_eq!(pins[67].value, 1);
    }

    #[tokio::test]
    async fn test_blink_unknown_pin_fails() {
        let mut session = connected().await;
        assert!(matches!(
            session.blink(&[120], Duration::from_millis(1), Some(1)).await,
            Err(SessionError::Client(ClientError::InvalidPin(120)))
        ));
    }
}
