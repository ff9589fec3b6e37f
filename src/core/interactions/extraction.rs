// src/core/interactions/extraction.rs
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::type_graph::{TypeDescription, TypeGraph};
use super::{Conventions, InteractionTraverser, Interactions};

/// What a renderer needs for one diagram: participants in order and the fragment tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Full name of the originating message
    pub message: String,
    pub participants: Vec<String>,
    pub interactions: Interactions,
}

/// Runs a fresh traverser for `message` and repairs the missing caller.
pub fn extract_interactions<'g>(
    graph: &'g TypeGraph,
    conventions: &'g Conventions,
    message: &'g TypeDescription,
) -> Extraction {
    let mut participants = Vec::new();
    let mut traverser = InteractionTraverser::new(graph, conventions);
    let interactions = traverser.extract_consequences(message, &mut participants, None, None);

    let mut extraction = Extraction {
        message: message.full_name.clone(),
        participants,
        interactions,
    };
    repair_caller(graph, conventions, message, &mut extraction);
    extraction
}

/// Names the sender of the entry message when exactly one type originates it.
///
/// Applied once at the top level: the originating service becomes the first
/// participant and the source of the first arrow.
pub fn repair_caller(graph: &TypeGraph, conventions: &Conventions, message: &TypeDescription, extraction: &mut Extraction) {
    let origins = graph.message_origins(message);
    let [origin] = origins.as_slice() else {
        debug!("{} has {} origin(s), leaving the caller external", message.full_name, origins.len());
        return;
    };
    let Some(service) = conventions.services.service_of(origin) else {
        return;
    };
    let Some(entry) = extraction.interactions.first_arrow_mut() else {
        return;
    };

    entry.source = service.to_string();
    extraction.participants.retain(|p| p != service);
    extraction.participants.insert(0, service.to_string());
}
