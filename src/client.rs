// src/client.rs - Interface to a Firmata protocol client
//
// The wire protocol lives behind this trait. Anything that can hand back a
// pin array and accept the handful of outbound requests below can drive a
// session: a real Firmata library adapter or the in-process simulator.
use crate::pintable::{Pin, PinMode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not connected to board")]
    NotConnected,
    #[error("Handshake failed: {0}")]
    Handshake(String),
    #[error("Pin {0} does not exist")]
    InvalidPin(u8),
    #[error("Digital port {0} does not exist")]
    InvalidPort(u8),
    #[error("Pin {pin} does not support mode {mode}")]
    UnsupportedMode { pin: u8, mode: PinMode },
    #[error("Pin {0} is not in output mode")]
    NotOutput(u8),
}

/// Identification reported by the firmware during the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareInfo {
    #[serde(default)]
    pub protocol_version: String,
    #[serde(default)]
    pub firmware_name: String,
    #[serde(default)]
    pub firmware_version: String,
}

/// Notifications delivered by a client as board messages arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Connected(FirmwareInfo),
    /// A pin-state response updated `pins()[pin]`.
    PinState { pin: u8 },
    Analog { pin: u8, value: u32 },
    /// A digital port message; `pins` are the logical ids in the port.
    Digital { port: u8, pins: Vec<u8> },
    StringData(String),
    Sysex(Vec<u8>),
}

/// Number of pins in one Firmata digital port.
pub const PORT_WIDTH: usize = 8;

pub fn port_of(pin: u8) -> u8 {
    pin / PORT_WIDTH as u8
}

pub fn port_count(pins: usize) -> usize {
    pins.div_ceil(PORT_WIDTH)
}

#[async_trait]
pub trait FirmataClient: Send {
    /// Waits until firmware and capability information is known.
    async fn handshake(&mut self) -> Result<FirmwareInfo, ClientError>;

    /// Pin array ordered by logical id.
    fn pins(&self) -> &[Pin];

    /// Event stream. Can be taken once.
    fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ClientEvent>>;

    async fn query_pin_state(&mut self, pin: u8) -> Result<(), ClientError>;

    async fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), ClientError>;

    async fn set_digital_pin_value(&mut self, pin: u8, level: bool) -> Result<(), ClientError>;

    async fn report_digital(&mut self, port: u8, enable: bool) -> Result<(), ClientError>;
}
