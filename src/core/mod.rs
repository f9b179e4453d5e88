// src/core/mod.rs
pub mod converter;
pub mod decompose;
pub mod engine;
pub mod markup;
pub mod pronunciation;
pub mod types;
