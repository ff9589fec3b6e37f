// src/core/interactions/mod.rs
//! Interaction extraction for msgflow
//!
//! Follows one message through its handlers, the messages they publish and the
//! handlers of those, and records the flow as sequence diagram fragments.

mod conventions;
mod consequence_flattener;
mod extraction;
mod fragment;
mod handler_resolver;
mod invocation_resolver;
mod service;
mod traverser;

#[cfg(test)]
mod fixtures;

pub use conventions::{Conventions, MessageKind};
pub use consequence_flattener::{ConsequenceFlattener, Expansion};
pub use extraction::{extract_interactions, repair_caller, Extraction};
pub use fragment::{Alt, AltSection, Arrow, Fragment, GroupType, Interactions};
pub use handler_resolver::HandlerResolver;
pub use invocation_resolver::{Implementation, InvocationResolver};
pub use service::ServiceNaming;
pub use traverser::InteractionTraverser;
