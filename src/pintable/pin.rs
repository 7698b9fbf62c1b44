// src/pintable/pin.rs - Live pin descriptor as populated by a Firmata client
use crate::pintable::mode::PinMode;
use serde::{Deserialize, Serialize};

/// Analog channel value Firmata reports for pins without an analog input.
pub const NO_ANALOG_CHANNEL: u8 = 0x7F;

/// State of one logical pin. The position in the client's pin array is the
/// logical id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(default)]
    pub mode: PinMode,
    /// Supported modes in the order the board reported them.
    #[serde(default)]
    pub modes: Vec<PinMode>,
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub state: u32,
    #[serde(default = "default_analog_channel")]
    pub analog_channel: u8,
}

impl Pin {
    pub fn new(mode: PinMode, modes: impl IntoIterator<Item = PinMode>) -> Self {
        Self {
            mode,
            modes: modes.into_iter().collect(),
            value: 0,
            state: 0,
            analog_channel: NO_ANALOG_CHANNEL,
        }
    }

    pub fn supports(&self, mode: PinMode) -> bool {
        self.modes.contains(&mode)
    }

    pub fn has_analog_channel(&self) -> bool {
        self.analog_channel != NO_ANALOG_CHANNEL
    }

    /// Supported modes ordered by mode code, without duplicates.
    pub fn sorted_modes(&self) -> Vec<PinMode> {
        let mut modes = self.modes.clone();
        modes.sort_by_key(|mode| mode.code());
        modes.dedup();
        modes
    }
}

impl Default for Pin {
    fn default() -> Self {
        Self::new(PinMode::default(), [])
    }
}

fn default_analog_channel() -> u8 {
    NO_ANALOG_CHANNEL
}
