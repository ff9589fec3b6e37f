//! msgflow extracts how handling one message ripples through a system of
//! services, as an ordered tree of sequence diagram fragments.
//!
//! The input is a [`TypeGraph`] built from a code analysis front end; the output
//! is an [`Extraction`] per message, ready for an external diagram renderer.

pub mod config;
pub mod core;
pub mod error;

pub use crate::config::Config;
pub use crate::core::interactions::{
    extract_interactions, Alt, AltSection, Arrow, Conventions, Extraction, Fragment, GroupType, InteractionTraverser,
    Interactions,
};
pub use crate::core::type_graph::{Statement, TypeDescription, TypeGraph};
pub use crate::core::{CommandDiagram, Engine};
pub use crate::error::{MsgflowError, Result};
