//! Pin layout registry types and the Markdown table renderer.

pub mod board;
pub mod mode;
pub mod pin;
pub mod render;

pub use board::{Board, Header, LayoutError, PinNamer};
pub use mode::{PinMode, PinModeError};
pub use pin::{NO_ANALOG_CHANNEL, Pin};
pub use render::{HeaderPin, MarkdownRenderer, RenderError};
