// src/pintable/board.rs - Physical header layout of a board
use std::collections::HashMap;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("header {header}: total of {total} slots is odd, rows are rendered in pairs")]
    OddTotal { header: String, total: usize },
    #[error("header {header}: padding slot {slot} is outside 1..={total}")]
    PaddingOutOfRange { header: String, slot: usize, total: usize },
    #[error("header {header}: pins {start}..{end} run past the board's {pin_end} pins")]
    PinRangeExceedsBoard { header: String, start: usize, end: usize, pin_end: usize },
    #[error("header {header}: pin {pin} has no display name")]
    UnnamedPin { header: String, pin: usize },
    #[error("analog pin {0} is not on any header")]
    AnalogPinNotOnHeader(usize),
}

/// Resolves a logical pin id to the name printed in the tables.
pub trait PinNamer: Send + Sync {
    fn pin_name(&self, pin: usize) -> Option<String>;
}

impl<F> PinNamer for F
where
    F: Fn(usize) -> Option<String> + Send + Sync,
{
    fn pin_name(&self, pin: usize) -> Option<String> {
        self(pin)
    }
}

/// One physical connector. Slots are numbered from 1; every slot without a
/// padding label consumes the next logical pin id, starting at `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub total: usize,
    pub start: usize,
    pub padding: HashMap<usize, String>,
}

impl Header {
    pub fn new(name: &str, total: usize, start: usize) -> Self {
        Self {
            name: name.to_string(),
            total,
            start,
            padding: HashMap::new(),
        }
    }

    pub fn with_padding<'a>(mut self, padding: impl IntoIterator<Item = (usize, &'a str)>) -> Self {
        self.padding
            .extend(padding.into_iter().map(|(slot, label)| (slot, label.to_string())));
        self
    }

    pub fn padding_label(&self, slot: usize) -> Option<&str> {
        self.padding.get(&slot).map(String::as_str)
    }

    /// Number of slots carrying a logical pin.
    pub fn pin_count(&self) -> usize {
        (1..=self.total)
            .filter(|slot| !self.padding.contains_key(slot))
            .count()
    }

    /// Logical ids consumed by this header.
    pub fn pin_range(&self) -> Range<usize> {
        self.start..self.start + self.pin_count()
    }

    /// Checks the slot layout on its own, without reference to a board.
    pub fn check(&self) -> Result<(), LayoutError> {
        if self.total % 2 != 0 {
            return Err(LayoutError::OddTotal {
                header: self.name.clone(),
                total: self.total,
            });
        }
        let mut slots: Vec<_> = self.padding.keys().copied().collect();
        slots.sort_unstable();
        if let Some(&slot) = slots.iter().find(|&&slot| slot == 0 || slot > self.total) {
            return Err(LayoutError::PaddingOutOfRange {
                header: self.name.clone(),
                slot,
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Static pin layout of one board model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub name: String,
    pub headers: Vec<Header>,
    /// Logical ids of analog-capable pins; the index is the analog channel.
    pub analog_pins: Vec<usize>,
    /// Total number of logical pins the firmware exposes.
    pub pin_end: usize,
}

impl Board {
    pub fn analog_channel(&self, pin: usize) -> Option<usize> {
        self.analog_pins.iter().position(|&p| p == pin)
    }

    pub fn header(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|h| h.name == name)
    }

    pub fn validate(&self, names: &dyn PinNamer) -> Result<(), LayoutError> {
        for header in &self.headers {
            header.check()?;
            let range = header.pin_range();
            if range.end > self.pin_end {
                return Err(LayoutError::PinRangeExceedsBoard {
                    header: header.name.clone(),
                    start: range.start,
                    end: range.end,
                    pin_end: self.pin_end,
                });
            }
            if let Some(pin) = range.clone().find(|&pin| names.pin_name(pin).is_none()) {
                return Err(LayoutError::UnnamedPin {
                    header: header.name.clone(),
                    pin,
                });
            }
        }
        for &pin in &self.analog_pins {
            if !self.headers.iter().any(|h| h.pin_range().contains(&pin)) {
                return Err(LayoutError::AnalogPinNotOnHeader(pin));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(pin: usize) -> Option<String> {
        (pin < 16).then(|| format!("P{}", pin))
    }

    fn two_headers() -> Board {
        Board {
            name: "pair".to_string(),
            headers: vec![
                Header::new("L", 10, 0).with_padding([(1, "5V"), (2, "GND")]),
                Header::new("R", 10, 8).with_padding([(9, "3V3"), (10, "GND")]),
            ],
            analog_pins: vec![3, 12],
            pin_end: 16,
        }
    }

    #[test]
    fn test_pin_count_and_range() {
        let board = two_headers();
        assert_eq!(board.headers[0].pin_count(), 8);
        assert_eq!(board.headers[0].pin_range(), 0..8);
        assert_eq!(board.headers[1].pin_range(), 8..16);
        assert_eq!(board.headers[1].padding_label(9), Some("3V3"));
        assert_eq!(board.headers[1].padding_label(1), None);
    }

    #[test]
    fn test_valid_board() {
        assert_eq!(two_headers().validate(&numbered), Ok(()));
    }

    #[test]
    fn test_odd_total_rejected() {
        let header = Header::new("J1", 7, 0);
        assert!(matches!(header.check(), Err(LayoutError::OddTotal { total: 7, .. })));
    }

    #[test]
    fn test_padding_outside_header_rejected() {
        let header = Header::new("J1", 4, 0).with_padding([(0, "GND"), (5, "5V")]);
        assert!(matches!(header.check(), Err(LayoutError::PaddingOutOfRange { slot: 0, .. })));
        let header = Header::new("J1", 4, 0).with_padding([(5, "5V")]);
        assert!(matches!(header.check(), Err(LayoutError::PaddingOutOfRange { slot: 5, .. })));
    }

    #[test]
    fn test_range_past_pin_end_rejected() {
        let mut board = two_headers();
        board.pin_end = 15;
        assert!(matches!(
            board.validate(&numbered),
            Err(LayoutError::PinRangeExceedsBoard { end: 16, pin_end: 15, .. })
        ));
    }

    #[test]
    fn test_unnamed_pin_rejected() {
        let short = |pin: usize| (pin < 10).then(|| pin.to_string());
        assert!(matches!(
            two_headers().validate(&short),
            Err(LayoutError::UnnamedPin { pin: 10, .. })
        ));
    }

    #[test]
    fn test_analog_pin_must_be_on_a_header() {
        let mut board = two_headers();
        board.analog_pins.push(20);
        board.pin_end = 21;
        assert_eq!(board.validate(&numbered), Err(LayoutError::AnalogPinNotOnHeader(20)));
        assert_eq!(board.analog_channel(12), Some(1));
        assert_eq!(board.analog_channel(4), None);
    }
}
