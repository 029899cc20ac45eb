//! Core types and definitions for the RAMPART battle engine.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, entity enums, stat catalog, wire events, constants, and the
//! rejection taxonomy. No simulation or session logic lives here.

pub mod catalog;
pub mod components;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
