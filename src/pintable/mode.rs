// src/pintable/mode.rs - Firmata pin modes and their table labels
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinModeError {
    #[error("unknown pin mode code: {0:#04x}")]
    UnknownCode(u8),
    #[error("unknown pin mode name: {0}")]
    UnknownName(String),
}

/// Operating mode of a pin, as reported by a Firmata capability or
/// pin-state response. Codes follow the Firmata protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum PinMode {
    #[serde(rename = "I")]
    Input = 0x00,
    #[serde(rename = "O")]
    Output = 0x01,
    #[serde(rename = "A")]
    Analog = 0x02,
    #[serde(rename = "PWM")]
    Pwm = 0x03,
    #[serde(rename = "SERVO")]
    Servo = 0x04,
    #[serde(rename = "SHIFT")]
    Shift = 0x05,
    #[serde(rename = "I2C")]
    I2c = 0x06,
    #[serde(rename = "ONEWIRE")]
    OneWire = 0x07,
    #[serde(rename = "STEPPER")]
    Stepper = 0x08,
    #[serde(rename = "ENCODER")]
    Encoder = 0x09,
    #[serde(rename = "SERIAL")]
    Serial = 0x0A,
    #[serde(rename = "PULLUP")]
    Pullup = 0x0B,
    /// Ignored by digital writes and capability responses.
    #[default]
    #[serde(rename = "X")]
    Ignore = 0x7F,
}

impl PinMode {
    pub const ALL: [PinMode; 13] = [
        PinMode::Input,
        PinMode::Output,
        PinMode::Analog,
        PinMode::Pwm,
        PinMode::Servo,
        PinMode::Shift,
        PinMode::I2c,
        PinMode::OneWire,
        PinMode::Stepper,
        PinMode::Encoder,
        PinMode::Serial,
        PinMode::Pullup,
        PinMode::Ignore,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short label used in the Markdown tables.
    pub fn name(self) -> &'static str {
        match self {
            PinMode::Input => "I",
            PinMode::Output => "O",
            PinMode::Analog => "A",
            PinMode::Pwm => "PWM",
            PinMode::Servo => "SERVO",
            PinMode::Shift => "SHIFT",
            PinMode::I2c => "I2C",
            PinMode::OneWire => "ONEWIRE",
            PinMode::Stepper => "STEPPER",
            PinMode::Encoder => "ENCODER",
            PinMode::Serial => "SERIAL",
            PinMode::Pullup => "PULLUP",
            PinMode::Ignore => "X",
        }
    }
}

impl TryFrom<u8> for PinMode {
    type Error = PinModeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PinMode::ALL
            .into_iter()
            .find(|mode| mode.code() == code)
            .ok_or(PinModeError::UnknownCode(code))
    }
}

impl FromStr for PinMode {
    type Err = PinModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PinMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| PinModeError::UnknownName(s.to_string()))
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
