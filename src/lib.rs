// src/lib.rs

pub mod config;
pub mod core;
pub mod emitter;
pub mod error;
pub mod guid;
pub mod persistence;
pub mod sources;

pub use crate::config::{CardOptions, DeckConfig, DeckSettings};
pub use crate::core::engine::DeckEngine;
pub use crate::core::types::Card;
pub use crate::emitter::{ApkgEmitter, DeckEmitter};
pub use crate::error::{DeckError, Result};
pub use crate::sources::SourceTables;
