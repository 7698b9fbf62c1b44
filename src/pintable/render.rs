// src/pintable/render.rs - Markdown pin tables, one per physical header
//
// Each header becomes one two-sided table. Odd slots fill the left half,
// even slots the right half, so the rows read like the physical connector:
//
// |A|Modes|M|S|V|D|N|J2_ID|N|D|V|S|M|Modes|A|
// | | | | | | | 5V | 1 2 | 5V | | | | | | |
// | 127 | [I O PULLUP] | I | 0 | 0 | 0 | PE2 | 11 12 | PE3 | 1 | 0 | 0 | I | [I O PULLUP] | 127 |
use crate::pintable::board::{Board, Header, LayoutError, PinNamer};
use crate::pintable::mode::PinMode;
use crate::pintable::pin::Pin;
use std::fmt::{self, Write as _};
use std::io;
use thiserror::Error;

const SEPARATOR: &str = "|:--:|:--|:--|:--|:--|:--|:--|:--:|:--|:--|:--|:--|:--|:--|:--:|";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("header {header}: slot {slot} needs pin {pin} but only {available} pins were reported")]
    PinOutOfRange { header: String, slot: usize, pin: usize, available: usize },
    #[error("header {header}: pin {pin} has no display name")]
    UnnamedPin { header: String, pin: usize },
    #[error("format error: {0}")]
    Format(#[from] fmt::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One resolved table cell group. Lives for a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPin {
    Padding {
        slot: usize,
        label: String,
    },
    Live {
        slot: usize,
        name: String,
        modes: Vec<PinMode>,
        mode: PinMode,
        value: u32,
        state: u32,
        analog_channel: usize,
        digital: usize,
    },
}

impl HeaderPin {
    pub fn slot(&self) -> usize {
        match self {
            HeaderPin::Padding { slot, .. } | HeaderPin::Live { slot, .. } => *slot,
        }
    }

    /// Left half, used for odd slots. The slot id closes the row so it sits
    /// next to its even partner in the middle column.
    fn write_left(&self, out: &mut String) -> fmt::Result {
        match self {
            HeaderPin::Padding { slot, label } => write!(out, "| | | | | | | {} | {} ", label, slot),
            HeaderPin::Live { slot, name, modes, mode, value, state, analog_channel, digital } => write!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} ",
                analog_channel,
                ModeList(modes),
                mode,
                state,
                value,
                digital,
                name,
                slot
            ),
        }
    }

    /// Right half, used for even slots. Mirrors `write_left`.
    fn write_right(&self, out: &mut String) -> fmt::Result {
        match self {
            HeaderPin::Padding { slot, label } => write!(out, "{} | {} | | | | | | |", slot, label),
            HeaderPin::Live { slot, name, modes, mode, value, state, analog_channel, digital } => write!(
                out,
                "{} | {} | {} | {} | {} | {} | {} | {} |",
                slot,
                name,
                digital,
                value,
                state,
                mode,
                ModeList(modes),
                analog_channel
            ),
        }
    }
}

struct ModeList<'a>(&'a [PinMode]);

impl fmt::Display for ModeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, mode) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(mode.name())?;
        }
        f.write_str("]")
    }
}

/// Renders a board's headers against a live pin array.
pub struct MarkdownRenderer<'a> {
    board: &'a Board,
    names: &'a dyn PinNamer,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(board: &'a Board, names: &'a dyn PinNamer) -> Self {
        Self { board, names }
    }

    /// Renders every header in declared order, stopping at the first error.
    pub fn render_all(&self, pins: &[Pin]) -> Result<Vec<String>, RenderError> {
        self.board
            .headers
            .iter()
            .map(|header| self.render_header(pins, header))
            .collect()
    }

    /// Renders all tables and writes them to `sink`. Nothing is written if
    /// any header fails to render.
    pub fn write_all<W: io::Write>(&self, pins: &[Pin], mut sink: W) -> Result<(), RenderError> {
        let tables = self.render_all(pins)?;
        for table in &tables {
            sink.write_all(table.as_bytes())?;
        }
        sink.flush()?;
        Ok(())
    }

    pub fn render_header(&self, pins: &[Pin], header: &Header) -> Result<String, RenderError> {
        header.check()?;

        let mut out = String::new();
        writeln!(out, "|A|Modes|M|S|V|D|N|{}_ID|N|D|V|S|M|Modes|A|", header.name)?;
        writeln!(out, "{}", SEPARATOR)?;

        let mut pid = header.start;
        for slot in 1..=header.total {
            let row = match header.padding_label(slot) {
                Some(label) => HeaderPin::Padding {
                    slot,
                    label: label.to_string(),
                },
                None => {
                    let row = self.resolve(pins, header, slot, pid)?;
                    pid += 1;
                    row
                }
            };

            if slot % 2 == 1 {
                row.write_left(&mut out)?;
            } else {
                row.write_right(&mut out)?;
                out.push('\n');
            }
        }
        out.push('\n');

        tracing::debug!(
            "Rendered header {} ({} slots, pins {}..{})",
            header.name,
            header.total,
            header.start,
            pid
        );
        Ok(out)
    }

    fn resolve(&self, pins: &[Pin], header: &Header, slot: usize, pid: usize) -> Result<HeaderPin, RenderError> {
        let pin = pins.get(pid).ok_or_else(|| RenderError::PinOutOfRange {
            header: header.name.clone(),
            slot,
            pin: pid,
            available: pins.len(),
        })?;
        let name = self.names.pin_name(pid).ok_or_else(|| RenderError::UnnamedPin {
            header: header.name.clone(),
            pin: pid,
        })?;
        let analog_channel = self
            .board
            .analog_channel(pid)
            .unwrap_or(pin.analog_channel as usize);

        Ok(HeaderPin::Live {
            slot,
            name,
            modes: pin.sorted_modes(),
            mode: pin.mode,
            value: pin.value,
            state: pin.state,
            analog_channel,
            digital: pid,
        })
    }
}
