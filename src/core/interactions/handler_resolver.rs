// src/core/interactions/handler_resolver.rs
use tracing::trace;

use crate::core::type_graph::{MethodDescription, TypeDescription, TypeGraph};
use super::{Conventions, MessageKind};

/// Finds the types and methods that handle a message.
pub struct HandlerResolver<'g> {
    graph: &'g TypeGraph,
    conventions: &'g Conventions,
}

impl<'g> HandlerResolver<'g> {
    pub fn new(graph: &'g TypeGraph, conventions: &'g Conventions) -> Self {
        Self { graph, conventions }
    }

    /// Event handlers first, then at most one command handler.
    pub fn handlers_for(&self, message: &TypeDescription) -> Vec<&'g TypeDescription> {
        let mut handlers = self.event_handlers_for(message);

        if let Some(command_handler) = self.command_handler_for(message) {
            handlers.push(command_handler);
        }

        trace!("{} handler(s) for {}", handlers.len(), message.full_name);
        handlers
    }

    /// Classes implementing the handler callback with a handle method for the message's simple name.
    pub fn event_handlers_for(&self, message: &TypeDescription) -> Vec<&'g TypeDescription> {
        let callback = self.conventions.handler_callback_type.as_str();
        let handle = self.conventions.event_handler_method.as_str();
        let name = message.name();

        self.graph
            .iter()
            .filter(|t| t.is_class() && t.implements_type(callback))
            .filter(|t| {
                t.methods
                    .iter()
                    .any(|m| m.name == handle && m.parameters.iter().any(|p| p.type_ends_with_name(name)))
            })
            .collect()
    }

    /// The first class taking the message as a body-bound parameter.
    ///
    /// Several candidates resolve to the first in graph order.
    pub fn command_handler_for(&self, message: &TypeDescription) -> Option<&'g TypeDescription> {
        self.graph.iter().find(|t| {
            t.is_class() && t.methods.iter().any(|m| self.binds_from_body(m, message))
        })
    }

    /// The method on `handler` that handles `message`, chosen by message kind.
    pub fn handling_method(&self, handler: &'g TypeDescription, message: &TypeDescription) -> Option<&'g MethodDescription> {
        let name = message.name();

        match self.conventions.message_kind(message) {
            MessageKind::Event => handler.methods.iter().find(|m| {
                m.name == self.conventions.event_handler_method
                    && m.parameters.iter().any(|p| p.type_ends_with_name(name))
            }),
            MessageKind::Command => handler.methods.iter().find(|m| {
                self.binds_from_body(m, message)
                    || (m.name == self.conventions.command_handler_method
                        && m.parameters.iter().any(|p| p.type_ends_with_name(name)))
            }),
            MessageKind::Other => None,
        }
    }

    fn binds_from_body(&self, method: &MethodDescription, message: &TypeDescription) -> bool {
        method
            .parameters
            .iter()
            .any(|p| p.type_name == message.full_name && p.has_attribute(&self.conventions.body_marker))
    }
}
