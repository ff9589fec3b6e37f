// src/core/type_graph/graph.rs
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

use crate::error::{MsgflowError, Result};
use super::TypeDescription;

/// Read-only collection of analyzed types with resolved inheritance.
///
/// The only constructor is [`TypeGraph::populate`], so every graph handed to the
/// resolvers has transitive base types and inherited members in place.
#[derive(Debug, Clone)]
pub struct TypeGraph {
    types: Vec<TypeDescription>,
    index: HashMap<String, usize>,
}

impl TypeGraph {
    /// Runs both population phases: base types first, then inherited members.
    pub fn populate(types: Vec<TypeDescription>) -> Self {
        let mut index = HashMap::with_capacity(types.len());
        for (position, description) in types.iter().enumerate() {
            if index.contains_key(&description.full_name) {
                warn!("Duplicate type {}, keeping the first occurrence", description.full_name);
                continue;
            }
            index.insert(description.full_name.clone(), position);
        }

        let mut graph = Self { types, index };
        graph.populate_inherited_base_types();
        graph.populate_inherited_members();

        debug!("Populated type graph with {} types", graph.types.len());
        graph
    }

    fn populate_inherited_base_types(&mut self) {
        let declared: Vec<Vec<String>> = self.types.iter().map(|t| t.base_types.clone()).collect();

        for (position, own_bases) in declared.iter().enumerate() {
            let mut resolved = Vec::new();
            let mut seen = HashSet::new();
            let mut queue: VecDeque<&String> = own_bases.iter().collect();

            while let Some(base) = queue.pop_front() {
                if !seen.insert(base.as_str()) || base == &self.types[position].full_name {
                    continue;
                }
                resolved.push(base.clone());

                if let Some(&base_position) = self.index.get(base) {
                    queue.extend(declared[base_position].iter());
                }
            }

            self.types[position].base_types = resolved;
        }
    }

    fn populate_inherited_members(&mut self) {
        let declared = self.types.clone();

        for description in &mut self.types {
            for base in description.base_types.clone() {
                let Some(&base_position) = self.index.get(&base) else {
                    continue;
                };
                let base_type = &declared[base_position];
                if base_type.is_interface() {
                    continue;
                }

                for field in &base_type.fields {
                    if !description.fields.iter().any(|f| f.name == field.name) {
                        description.fields.push(field.clone());
                    }
                }
                for property in &base_type.properties {
                    if !description.properties.iter().any(|p| p.name == property.name) {
                        description.properties.push(property.clone());
                    }
                }
                for method in &base_type.methods {
                    if !description.methods.iter().any(|m| m.same_signature(method)) {
                        description.methods.push(method.clone());
                    }
                }
            }
        }
    }

    /// All types in graph order.
    pub fn types(&self) -> &[TypeDescription] {
        &self.types
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescription> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, full_name: &str) -> Option<&TypeDescription> {
        self.index.get(full_name).map(|&position| &self.types[position])
    }

    pub fn require(&self, full_name: &str) -> Result<&TypeDescription> {
        self.get(full_name)
            .ok_or_else(|| MsgflowError::TypeNotFound(full_name.to_string()))
    }

    /// Types deriving from `full_name`, excluding the type itself, in graph order.
    pub fn implementers_of(&self, full_name: &str) -> Vec<&TypeDescription> {
        self.types
            .iter()
            .filter(|t| t.full_name != full_name && t.implements_type(full_name))
            .collect()
    }

    /// Types that construct `message` somewhere in a method body, distinct, in graph order.
    ///
    /// A construction is an invocation named after the message whose containing type ends
    /// with that name, so per-service copies of a message resolve to the copy being built.
    pub fn message_origins(&self, message: &TypeDescription) -> Vec<&TypeDescription> {
        let name = message.name();
        let mut origins: Vec<&TypeDescription> = Vec::new();

        for description in &self.types {
            for method in &description.methods {
                let mut invocations = Vec::new();
                for statement in &method.statements {
                    statement.collect_invocations(&mut invocations);
                }

                for invocation in invocations {
                    if invocation.name != name || !invocation.containing_type.ends_with(name) {
                        continue;
                    }
                    if let Some(origin) = self.get(&invocation.containing_type) {
                        if !origins.iter().any(|o| o.full_name == origin.full_name) {
                            origins.push(origin);
                        }
                    }
                }
            }
        }

        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::type_graph::{Invocation, MethodDescription};

    #[test]
    fn test_base_types_resolve_transitively() {
        let graph = TypeGraph::populate(vec![
            TypeDescription::class("Shop.PlanJob").with_base("Shop.Command"),
            TypeDescription::class("Shop.Command").with_base("Shop.Message"),
            TypeDescription::class("Shop.Message"),
        ]);

        let plan = graph.get("Shop.PlanJob").unwrap();
        assert_eq!(plan.base_types, vec!["Shop.Command", "Shop.Message"]);
        assert!(plan.implements_type("Shop.Message"));
    }

    #[test]
    fn test_cyclic_base_types_terminate() {
        let graph = TypeGraph::populate(vec![
            TypeDescription::class("A").with_base("B"),
            TypeDescription::class("B").with_base("A"),
        ]);

        assert_eq!(graph.get("A").unwrap().base_types, vec!["B"]);
        assert_eq!(graph.get("B").unwrap().base_types, vec!["A"]);
    }

    #[test]
    fn test_inherited_members_skip_overrides() {
        let graph = TypeGraph::populate(vec![
            TypeDescription::class("Shop.Handler")
                .with_base("Shop.HandlerBase")
                .with_property("Name", "string")
                .with_method(MethodDescription::new("Handle").with_parameter("int", "x")),
            TypeDescription::class("Shop.HandlerBase")
                .with_field("bus", "Shop.IBus")
                .with_property("Name", "object")
                .with_property("Retries", "int")
                .with_method(MethodDescription::new("Handle").with_parameter("int", "y"))
                .with_method(MethodDescription::new("Log")),
            TypeDescription::interface("Shop.IHandler")
                .with_method(MethodDescription::new("Describe")),
        ]);

        let handler = graph.get("Shop.Handler").unwrap();
        let names: Vec<_> = handler.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Handle", "Log"]);
        assert_eq!(handler.methods[0].parameters[0].name, "x");
        assert_eq!(handler.fields.len(), 1);

        let properties: Vec<_> = handler.properties.iter().map(|p| (p.name.as_str(), p.type_name.as_str())).collect();
        assert_eq!(properties, vec![("Name", "string"), ("Retries", "int")]);
    }

    #[test]
    fn test_duplicate_full_names_keep_first() {
        let graph = TypeGraph::populate(vec![
            TypeDescription::class("Shop.Dup").with_field("first", "int"),
            TypeDescription::class("Shop.Dup").with_field("second", "int"),
        ]);

        assert_eq!(graph.get("Shop.Dup").unwrap().fields[0].name, "first");
        assert!(matches!(graph.require("Shop.Missing"), Err(MsgflowError::TypeNotFound(_))));
    }

    #[test]
    fn test_implementers_in_graph_order() {
        let graph = TypeGraph::populate(vec![
            TypeDescription::interface("Shop.IRepo"),
            TypeDescription::class("Shop.SqlRepo").with_base("Shop.IRepo"),
            TypeDescription::class("Shop.MemoryRepo").with_base("Shop.IRepo"),
        ]);

        let names: Vec<_> = graph.implementers_of("Shop.IRepo").iter().map(|t| t.full_name.as_str()).collect();
        assert_eq!(names, vec!["Shop.SqlRepo", "Shop.MemoryRepo"]);
    }

    #[test]
    fn test_message_origins_are_distinct_constructors() {
        let construct = || Invocation::new("Shop.WebApp.Commands.PlanJob", "PlanJob");
        let graph = TypeGraph::populate(vec![
            TypeDescription::class("Shop.WebApp.Commands.PlanJob"),
            TypeDescription::class("Shop.Workshop.Commands.PlanJob"),
            TypeDescription::class("Shop.WebApp.Controllers.JobController")
                .with_method(MethodDescription::new("Plan").with_statement(construct()))
                .with_method(MethodDescription::new("Replan").with_statement(construct())),
        ]);

        let message = graph.get("Shop.Workshop.Commands.PlanJob").unwrap();
        let origins = graph.message_origins(message);

        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].full_name, "Shop.WebApp.Commands.PlanJob");
    }
}
