// src/core/interactions/traverser.rs
use std::ptr;
use tracing::{debug, trace, warn};

use crate::core::type_graph::{Invocation, MethodDescription, Statement, TypeDescription, TypeGraph};
use super::{
    Alt, AltSection, Arrow, ConsequenceFlattener, Conventions, GroupType, HandlerResolver, Interactions,
    InvocationResolver,
};

/// Walks handler bodies to build the fragment tree for one originating message.
///
/// Holds the activation stack, so use one traverser per top-level extraction.
pub struct InteractionTraverser<'g> {
    graph: &'g TypeGraph,
    conventions: &'g Conventions,
    handlers: HandlerResolver<'g>,
    flattener: ConsequenceFlattener<'g>,
    /// Services that currently hold control, innermost last
    activations: Vec<String>,
    /// (handler, message) pairs whose bodies are being traversed
    message_path: Vec<(&'g str, &'g str)>,
    /// Methods being inlined through plain invocations
    expansion_path: Vec<&'g MethodDescription>,
}

impl<'g> InteractionTraverser<'g> {
    pub fn new(graph: &'g TypeGraph, conventions: &'g Conventions) -> Self {
        Self {
            graph,
            conventions,
            handlers: HandlerResolver::new(graph, conventions),
            flattener: ConsequenceFlattener::new(InvocationResolver::new(graph), conventions),
            activations: Vec::new(),
            message_path: Vec::new(),
            expansion_path: Vec::new(),
        }
    }

    pub fn activations(&self) -> &[String] {
        &self.activations
    }

    /// Extracts everything that happens when `message` is handled.
    ///
    /// Every participant reached is appended to `services` in first-seen order.
    pub fn extract_consequences(
        &mut self,
        message: &'g TypeDescription,
        services: &mut Vec<String>,
        previous_service: Option<&str>,
        alt_flow_service: Option<&str>,
    ) -> Interactions {
        let mut result = Interactions::new();

        if self.message_path.len() >= self.conventions.max_depth {
            warn!(
                "Message nesting deeper than {} at {}, not following it",
                self.conventions.max_depth, message.full_name
            );
            return result;
        }

        let conventions = self.conventions;
        let kind = conventions.message_kind(message);

        for handler in self.handlers.handlers_for(message) {
            let level = conventions.services.service_of(handler);

            let source = previous_service.unwrap_or(conventions.external_actor.as_str());
            let target = level.unwrap_or(conventions.unknown_service.as_str());

            trace!("{} -> {}: {}", source, target, message.name());
            result.add_fragment(
                Arrow {
                    source: source.to_string(),
                    target: target.to_string(),
                    label: message.name().to_string(),
                    color: conventions.arrow_color(kind).to_string(),
                }
                .into(),
            );

            if let Some(level) = level {
                if !self.activations.iter().any(|a| a == level) {
                    self.activations.push(level.to_string());
                }
            }

            if !services.iter().any(|s| s == target) {
                services.push(target.to_string());
            }

            let key = (handler.full_name.as_str(), message.full_name.as_str());
            if self.message_path.contains(&key) {
                debug!("{} already handles {} further up, not re-entering", key.0, key.1);
            } else if let Some(method) = self.handlers.handling_method(handler, message) {
                self.message_path.push(key);
                // Helpers inlined by an outer handler may be called again by this one
                let outer_expansions = std::mem::take(&mut self.expansion_path);

                let current_service = previous_service.or(level);
                let alt_flow = alt_flow_service.or(level);
                for statement in &method.statements {
                    let interactions = self.traverse_body(services, handler, current_service, statement, alt_flow);
                    result.append(interactions);
                }

                self.expansion_path = outer_expansions;
                self.message_path.pop();
            } else {
                debug!("No handling method for {} on {}", message.full_name, handler.full_name);
            }

            let on_top = self.activations.last().map(String::as_str) == level;
            if level.is_some() && on_top && level != alt_flow_service {
                self.activations.pop();
            }
        }

        result
    }

    fn traverse_body(
        &mut self,
        services: &mut Vec<String>,
        handler: &'g TypeDescription,
        current_service: Option<&str>,
        statement: &Statement,
        alt_flow: Option<&str>,
    ) -> Interactions {
        match statement {
            Statement::Invocation(invocation) if self.conventions.is_message_creation(invocation) => {
                self.traverse_message_creation(services, handler, invocation, alt_flow)
            }
            Statement::Invocation(invocation) => {
                self.traverse_invocation(services, handler, current_service, invocation, alt_flow)
            }
            Statement::ForEach(for_each) => {
                let mut fragments = Interactions::new();
                for child in &for_each.statements {
                    fragments.append(self.traverse_body(services, handler, current_service, child, alt_flow));
                }

                let mut result = Interactions::new();
                if !fragments.is_empty() {
                    let mut alt = Alt::new();
                    alt.add_section(AltSection::new(
                        Some(GroupType::ForEach),
                        for_each.expression.clone(),
                        fragments.into_fragments(),
                    ));
                    result.add_fragment(alt.into());
                }
                result
            }
            Statement::Switch(switch) => {
                let sections = switch
                    .sections
                    .iter()
                    .map(|s| (s.labels.concat(), s.statements.as_slice()));
                self.traverse_sections(services, handler, current_service, sections, GroupType::Case, alt_flow)
            }
            Statement::If(if_statement) => {
                let sections = if_statement
                    .sections
                    .iter()
                    .map(|s| (s.condition.clone(), s.statements.as_slice()));
                self.traverse_sections(services, handler, current_service, sections, GroupType::If, alt_flow)
            }
            Statement::Block(_) => Interactions::new(),
        }
    }

    fn traverse_message_creation(
        &mut self,
        services: &mut Vec<String>,
        handler: &'g TypeDescription,
        invocation: &Invocation,
        alt_flow: Option<&str>,
    ) -> Interactions {
        let argument = self
            .conventions
            .publish_operation(invocation)
            .and_then(|op| invocation.arguments.get(op.argument));
        let Some(argument) = argument else {
            debug!("{} has no message argument", invocation.name);
            return Interactions::new();
        };

        let Some(message) = self.graph.get(&argument.type_name) else {
            debug!("Published message {} is not in the type graph", argument.type_name);
            return Interactions::new();
        };

        let handler_service = self.conventions.services.service_of(handler);
        self.extract_consequences(message, services, handler_service, alt_flow)
    }

    fn traverse_invocation(
        &mut self,
        services: &mut Vec<String>,
        handler: &'g TypeDescription,
        current_service: Option<&str>,
        invocation: &Invocation,
        alt_flow: Option<&str>,
    ) -> Interactions {
        let mut result = Interactions::new();

        let Some(expansion) = self.flattener.expand(invocation) else {
            trace!("{}.{} does not resolve", invocation.containing_type, invocation.name);
            return result;
        };

        if self.expansion_path.iter().any(|m| ptr::eq(*m, expansion.method)) {
            debug!("{}.{} is already being expanded", invocation.containing_type, invocation.name);
            return result;
        }

        self.expansion_path.push(expansion.method);
        for consequence in &expansion.statements {
            result.append(self.traverse_body(services, handler, current_service, consequence, alt_flow));
        }
        self.expansion_path.pop();

        result
    }

    /// Shared by If and Switch: one Alt with a section per branch that produced fragments.
    fn traverse_sections<'s>(
        &mut self,
        services: &mut Vec<String>,
        handler: &'g TypeDescription,
        current_service: Option<&str>,
        sections: impl Iterator<Item = (String, &'s [Statement])>,
        group_type: GroupType,
        alt_flow: Option<&str>,
    ) -> Interactions {
        let mut alt = Alt::new();

        for (label, statements) in sections {
            let mut fragments = Interactions::new();
            for statement in statements {
                fragments.append(self.traverse_body(services, handler, current_service, statement, alt_flow));
            }

            if !fragments.is_empty() {
                let tag = alt.is_empty().then_some(group_type);
                alt.add_section(AltSection::new(tag, label, fragments.into_fragments()));
            }
        }

        let mut result = Interactions::new();
        if !alt.is_empty() {
            result.add_fragment(alt.into());
        }
        result
    }
}
