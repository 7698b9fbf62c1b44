//! Black STM32F407VET6 board, as numbered by the STM32duino Firmata core.
//!
//! Logical ids D0..D77 follow the two 48-pin headers, J2 first (USB side)
//! then J3 (SDIO side). D78..D89 repeat the ADC-capable pins so that
//! A0..A11 line up with the core's ADC pin map.

use crate::pintable::{Board, Header, PinNamer};
use std::fmt;
use std::sync::LazyLock;

macro_rules! pin_names {
    ($($name:ident),+ $(,)?) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum PinName {
            $($name),+
        }

        impl PinName {
            pub const ALL: &'static [PinName] = &[$(PinName::$name),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(PinName::$name => stringify!($name)),+
                }
            }
        }
    };
}

pin_names! {
    // J2
    PE2,  // D0
    PE3,  // D1, button K1
    PE4,  // D2, button K0
    PE5, PE6, PC13, PC0, PC1,
    PC2,  // D8, SPI2
    PC3,  // D9, SPI2
    PA0,  // D10, button WK_UP
    PA1, PA2, PA3, PA4,
    PA5,  // D15, SPI1
    PA6,  // D16, LED D2
    PA7,  // D17, LED D3
    PC4, PC5,
    PB0,  // D20, flash CS
    PB1,  // D21, LCD backlight
    PE7, PE8, PE9, PE10, PE11, PE12, PE13, PE14, PE15,
    PB10, // D31, I2C2
    PB11, // D32, I2C2
    PB12, PB13, PB14,
    // J3
    PE1,  // D36
    PE0, PB9,
    PB8,  // D39, I2C1
    PB7,  // D40, I2C1
    PB6, PB5, PB3, PD7,
    PD6,  // D45, USART2
    PD5,  // D46, USART2
    PD4, PD3,
    PD2,  // D49, SDIO
    PD1, PD0, PC12, PC11, PC10, PA15,
    PA12, // D56, USB DM
    PA11, // D57, USB DP
    PA10, // D58, RX1
    PA9,  // D59, TX1
    PA8, PC9, PC8, PC7, PC6, PD15, PD14, PD13, PD12, PD11, PD10,
    PD9,  // D71, USART3
    PD8,  // D72, USART3
    PB15,
    // Off-header
    PA13, // D74, SWDIO
    PA14, // D75, SWCLK
    PB4,  // D76
    PB2,  // D77, BOOT1
    // ADC duplicates, D78/A0..D89/A11
    PC0_2, PC1_2, PC2_2, PC3_2, PA0_2, PA1_2, PA2_2, PA3_2, PC4_2, PC5_2, PB0_2, PB1_2,
}

/// Number of logical pins the firmware exposes.
pub const PIN_END: usize = PinName::ALL.len();

impl PinName {
    pub fn from_index(pin: usize) -> Option<Self> {
        Self::ALL.get(pin).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PinName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves logical ids to STM32 port pin names.
#[derive(Debug, Clone, Copy, Default)]
pub struct Names;

impl PinNamer for Names {
    fn pin_name(&self, pin: usize) -> Option<String> {
        PinName::from_index(pin).map(|name| name.to_string())
    }
}

pub static BOARD: LazyLock<Board> = LazyLock::new(layout);

fn layout() -> Board {
    use PinName::*;

    let headers = vec![
        Header::new("J2", 48, PE2.index()).with_padding([
            (1, "5V"),
            (2, "5V"),
            (3, "5V"),
            (4, "5V"),
            (5, "3V3"),
            (6, "3V3"),
            (7, "3V3"),
            (8, "3V3"),
            (9, "GND"),
            (10, "GND"),
            (21, "VREF-"),
            (22, "VREF+"),
        ]),
        Header::new("J3", 48, PE1.index()).with_padding([
            (1, "3V3"),
            (2, "3V3"),
            (3, "3V3"),
            (4, "3V3"),
            (5, "BOOT0"),
            (6, "BOOT1"),
            (7, "GND"),
            (8, "GND"),
            (9, "GND"),
            (10, "GND"),
        ]),
    ];

    let analog_pins = [PC0, PC1, PC2, PC3, PA0, PA1, PA2, PA3, PC4, PC5, PB0, PB1]
        .into_iter()
        .map(PinName::index)
        .collect();

    Board {
        name: "stm32f407vet6".to_string(),
        headers,
        analog_pins,
        pin_end: PIN_END,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pintable::{MarkdownRenderer, Pin, PinMode};

    #[test]
    fn test_pin_numbering() {
        assert_eq!(PIN_END, 90);
        assert_eq!(PinName::PE2.index(), 0);
        assert_eq!(PinName::PE1.index(), 36);
        assert_eq!(PinName::PD14.index(), 66);
        assert_eq!(PinName::PB2.index(), 77);
        assert_eq!(PinName::PB1_2.index(), 89);
        assert_eq!(PinName::from_index(90), None);
        assert_eq!(Names.pin_name(6).as_deref(), Some("PC0"));
        assert_eq!(Names.pin_name(78).as_deref(), Some("PC0_2"));
    }

    #[test]
    fn test_layout_is_consistent() {
        let board = &*BOARD;
        assert_eq!(board.validate(&Names), Ok(()));
        assert_eq!(board.headers[0].pin_range(), 0..36);
        assert_eq!(board.headers[1].pin_range(), 36..74);
        assert_eq!(board.analog_channel(PinName::PC0.index()), Some(0));
        assert_eq!(board.analog_channel(PinName::PB1.index()), Some(11));
    }

    #[test]
    fn test_full_render_has_one_row_per_slot_pair() {
        let pins = vec![Pin::new(PinMode::Input, [PinMode::Input, PinMode::Output]); PIN_END];
        let renderer = MarkdownRenderer::new(&BOARD, &Names);
        let tables = renderer.render_all(&pins).unwrap();
        assert_eq!(tables.len(), 2);
        for table in &tables {
            assert_eq!(table.lines().filter(|l| !l.is_empty()).count(), 2 + 24);
        }
        assert!(tables[0].contains("| 21 22 | VREF+ |"));
        assert!(tables[1].starts_with("|A|Modes|M|S|V|D|N|J3_ID|"));
        assert!(tables[1].contains("| PD8 | 47 48 | PB15 | 73 |"));
    }
}
