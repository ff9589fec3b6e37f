// src/core/mod.rs
mod engine;

// Analyzed code model
pub mod type_graph;

// Message flow extraction
pub mod interactions;

pub use engine::{CommandDiagram, Engine};
