// src/simulator/mod.rs - In-process stand-in for a Firmata board
pub mod snapshot;

use crate::client::{ClientError, ClientEvent, FirmataClient, FirmwareInfo, PORT_WIDTH, port_count, port_of};
use crate::pintable::{Board, NO_ANALOG_CHANNEL, Pin, PinMode};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::mpsc;

pub use snapshot::{BoardSnapshot, MAX_PINS, SnapshotError, load_snapshot};

/// Answers client requests from an in-memory pin array and reports changes
/// on the event stream the way a Firmata board would.
pub struct SimulatedBoard {
    firmware: FirmwareInfo,
    pins: Vec<Pin>,
    connected: bool,
    reporting: HashSet<u8>,
    events_tx: mpsc::UnboundedSender<ClientEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<ClientEvent>>,
}

impl SimulatedBoard {
    pub fn new(firmware: FirmwareInfo, mut pins: Vec<Pin>) -> Self {
        if pins.len() > MAX_PINS {
            tracing::warn!("Simulated board truncated from {} to {} pins", pins.len(), MAX_PINS);
            pins.truncate(MAX_PINS);
        }
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            firmware,
            pins,
            connected: false,
            reporting: HashSet::new(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Plain GPIO on every logical pin of `board`, with analog input on the
    /// board's analog pins.
    pub fn from_layout(board: &Board) -> Self {
        let pins = (0..board.pin_end)
            .map(|pid| {
                let mut modes = vec![PinMode::Input, PinMode::Output, PinMode::Pullup];
                let mut pin = Pin::new(PinMode::Input, []);
                pin.analog_channel = match board.analog_channel(pid) {
                    Some(channel) => {
                        modes.push(PinMode::Analog);
                        channel as u8
                    }
                    None => NO_ANALOG_CHANNEL,
                };
                pin.modes = modes;
                pin
            })
            .collect();
        let firmware = FirmwareInfo {
            protocol_version: "2.5".to_string(),
            firmware_name: format!("simulated-{}", board.name),
            firmware_version: env!("CARGO_PKG_VERSION").to_string(),
        };
        Self::new(firmware, pins)
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self::new(snapshot.firmware, snapshot.pins)
    }

    pub fn is_reporting(&self, port: u8) -> bool {
        self.reporting.contains(&port)
    }

    fn emit(&self, event: ClientEvent) {
        // Nobody listening is not an error for a board.
        if self.events_tx.send(event).is_err() {
            tracing::trace!("Simulated board event dropped, no receiver");
        }
    }

    fn ensure_connected(&self) -> Result<(), ClientError> {
        if self.connected {
            Ok(())
        } else {
            Err(ClientError::NotConnected)
        }
    }

    fn pin_mut(&mut self, pin: u8) -> Result<&mut Pin, ClientError> {
        self.pins.get_mut(pin as usize).ok_or(ClientError::InvalidPin(pin))
    }

    fn port_pins(&self, port: u8) -> Vec<u8> {
        let start = port as usize * PORT_WIDTH;
        let end = (start + PORT_WIDTH).min(self.pins.len());
        (start..end).map(|pid| pid as u8).collect()
    }
}

#[async_trait]
impl FirmataClient for SimulatedBoard {
    async fn handshake(&mut self) -> Result<FirmwareInfo, ClientError> {
        if self.pins.is_empty() {
            return Err(ClientError::Handshake("capability response listed no pins".to_string()));
        }
        self.connected = true;
        tracing::debug!("Simulated board {} connected", self.firmware.firmware_name);
        self.emit(ClientEvent::Connected(self.firmware.clone()));
        Ok(self.firmware.clone())
    }

    fn pins(&self) -> &[Pin] {
        &self.pins
    }

    fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ClientEvent>> {
        self.events_rx.take()
    }

    async fn query_pin_state(&mut self, pin: u8) -> Result<(), ClientError> {
        self.ensure_connected()?;
        self.pin_mut(pin)?;
        self.emit(ClientEvent::PinState { pin });
        Ok(())
    }

    async fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), ClientError> {
        self.ensure_connected()?;
        let target = self.pin_mut(pin)?;
        if !target.supports(mode) {
            return Err(ClientError::UnsupportedMode { pin, mode });
        }
        target.mode = mode;
        Ok(())
    }

    async fn set_digital_pin_value(&mut self, pin: u8, level: bool) -> Result<(), ClientError> {
        self.ensure_connected()?;
        let target = self.pin_mut(pin)?;
        if target.mode != PinMode::Output {
            return Err(ClientError::NotOutput(pin));
        }
        target.value = level as u32;
        target.state = level as u32;

        let port = port_of(pin);
        if self.is_reporting(port) {
            let pins = self.port_pins(port);
            self.emit(ClientEvent::Digital { port, pins });
        }
        Ok(())
    }

    async fn report_digital(&mut self, port: u8, enable: bool) -> Result<(), ClientError> {
        self.ensure_connected()?;
        if port as usize >= port_count(self.pins.len()) {
            return Err(ClientError::InvalidPort(port));
        }
        if enable {
            self.reporting.insert(port);
            // Firmata answers a report request with the port's current state.
            let pins = self.port_pins(port);
            self.emit(ClientEvent::Digital { port, pins });
        } else {
            self.reporting.remove(&port);
        }
        Ok(())
    }
}
