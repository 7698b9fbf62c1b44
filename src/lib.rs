// src/lib.rs - Firmata board pin tables rendered as Markdown
pub mod boards;
pub mod client;
pub mod config;
pub mod pintable;
pub mod session;
pub mod simulator;

pub use boards::BoardModel;
pub use client::{ClientError, ClientEvent, FirmataClient, FirmwareInfo};
pub use config::{Config, ConfigError, load_config};
pub use pintable::{Board, Header, MarkdownRenderer, Pin, PinMode, PinNamer, RenderError};
pub use session::{Session, SessionError};
pub use simulator::SimulatedBoard;
