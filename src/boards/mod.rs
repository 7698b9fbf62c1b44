//! Built-in board layouts.

pub mod stm32f407vet6;

use crate::pintable::{Board, PinNamer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board models with a compiled-in pin layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BoardModel {
    #[default]
    Stm32f407vet6,
}

impl BoardModel {
    pub const ALL: [BoardModel; 1] = [BoardModel::Stm32f407vet6];

    pub fn board(self) -> &'static Board {
        match self {
            BoardModel::Stm32f407vet6 => &*stm32f407vet6::BOARD,
        }
    }

    pub fn names(self) -> &'static dyn PinNamer {
        match self {
            BoardModel::Stm32f407vet6 => &stm32f407vet6::Names,
        }
    }
}

impl fmt::Display for BoardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.board().name)
    }
}
