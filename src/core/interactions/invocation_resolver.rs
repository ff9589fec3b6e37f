// src/core/interactions/invocation_resolver.rs
use std::borrow::Cow;
use tracing::warn;

use crate::core::type_graph::{Invocation, MethodDescription, Statement, TypeDescription, TypeGraph};

/// Outcome of looking for the class behind an interface.
#[derive(Debug, Clone)]
pub enum Implementation<'g> {
    /// Exactly one implementer.
    Resolved(&'g TypeDescription),
    /// Several implementers; `chosen` is the first in graph order.
    Ambiguous {
        chosen: &'g TypeDescription,
        candidates: Vec<&'g TypeDescription>,
    },
    Missing,
}

impl<'g> Implementation<'g> {
    /// The implementer calls are redirected to, if any.
    pub fn chosen(&self) -> Option<&'g TypeDescription> {
        match self {
            Implementation::Resolved(chosen) | Implementation::Ambiguous { chosen, .. } => Some(*chosen),
            Implementation::Missing => None,
        }
    }
}

/// Resolves invocations to the method bodies they execute.
#[derive(Clone, Copy)]
pub struct InvocationResolver<'g> {
    graph: &'g TypeGraph,
}

impl<'g> InvocationResolver<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Self { graph }
    }

    pub fn implementation_of(&self, interface: &str) -> Implementation<'g> {
        let candidates = self.graph.implementers_of(interface);

        match candidates.as_slice() {
            [] => Implementation::Missing,
            [only] => Implementation::Resolved(*only),
            [first, ..] => Implementation::Ambiguous {
                chosen: *first,
                candidates: candidates.clone(),
            },
        }
    }

    /// Redirects a call on an interface to its implementer, keeping the arguments.
    ///
    /// Calls on classes, unknown types and unimplemented interfaces come back unchanged.
    pub fn redirect<'a>(&self, invocation: &'a Invocation) -> Cow<'a, Invocation> {
        let is_interface = self
            .graph
            .get(&invocation.containing_type)
            .is_some_and(|t| t.is_interface());
        if !is_interface {
            return Cow::Borrowed(invocation);
        }

        let implementation = self.implementation_of(&invocation.containing_type);
        if let Implementation::Ambiguous { chosen, candidates } = &implementation {
            warn!(
                "{} has {} implementers, using {}",
                invocation.containing_type,
                candidates.len(),
                chosen.full_name
            );
        }

        match implementation.chosen() {
            Some(chosen) => Cow::Owned(invocation.retarget(&chosen.full_name)),
            None => Cow::Borrowed(invocation),
        }
    }

    /// The method an invocation lands on, preferring an overload whose arity matches.
    pub fn resolve(&self, invocation: &Invocation) -> Option<&'g MethodDescription> {
        let target = self.redirect(invocation);
        let declaring = self.graph.get(&target.containing_type)?;
        let mut by_name = declaring.methods.iter().filter(|m| m.name == invocation.name);

        let first = by_name.next()?;
        if first.parameters.len() == target.arguments.len() {
            return Some(first);
        }

        by_name
            .find(|m| m.parameters.len() == target.arguments.len())
            .or(Some(first))
    }

    /// Statements of the invoked method; empty when it cannot be resolved.
    pub fn body(&self, invocation: &Invocation) -> &'g [Statement] {
        self.resolve(invocation)
            .map(|m| m.statements.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::type_graph::MethodDescription;

    fn repositories(implementers: &[&str]) -> TypeGraph {
        let mut types = vec![TypeDescription::interface("Shop.IJobRepository")
            .with_method(MethodDescription::new("Save").with_parameter("Shop.Job", "job"))];
        for name in implementers {
            types.push(
                TypeDescription::class(*name).with_base("Shop.IJobRepository").with_method(
                    MethodDescription::new("Save")
                        .with_parameter("Shop.Job", "job")
                        .with_statement(Invocation::new(*name, "Write")),
                ),
            );
        }
        TypeGraph::populate(types)
    }

    fn save() -> Invocation {
        Invocation::new("Shop.IJobRepository", "Save").with_argument("Shop.Job", "job")
    }

    #[test]
    fn test_single_implementer_is_resolved() {
        let graph = repositories(&["Shop.SqlJobRepository"]);
        let resolver = InvocationResolver::new(&graph);

        assert!(matches!(
            resolver.implementation_of("Shop.IJobRepository"),
            Implementation::Resolved(t) if t.full_name == "Shop.SqlJobRepository"
        ));

        let saved = save();
        let redirected = resolver.redirect(&saved);
        assert_eq!(redirected.containing_type, "Shop.SqlJobRepository");
        assert_eq!(redirected.arguments, saved.arguments);

        let direct = Invocation::new("Shop.SqlJobRepository", "Save").with_argument("Shop.Job", "job");
        assert_eq!(resolver.body(&save()), resolver.body(&direct));
        assert_eq!(resolver.body(&save()).len(), 1);
    }

    #[test]
    fn test_multiple_implementers_pick_first_in_graph_order() {
        let graph = repositories(&["Shop.SqlJobRepository", "Shop.MemoryJobRepository"]);
        let resolver = InvocationResolver::new(&graph);

        match resolver.implementation_of("Shop.IJobRepository") {
            Implementation::Ambiguous { chosen, candidates } => {
                assert_eq!(chosen.full_name, "Shop.SqlJobRepository");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }

        assert_eq!(resolver.redirect(&save()).containing_type, "Shop.SqlJobRepository");
    }

    #[test]
    fn test_unimplemented_interface_and_unknown_method_yield_empty_body() {
        let graph = repositories(&[]);
        let resolver = InvocationResolver::new(&graph);

        assert!(matches!(resolver.implementation_of("Shop.IJobRepository"), Implementation::Missing));
        assert!(resolver.body(&save()).is_empty());
        assert!(resolver.body(&Invocation::new("Shop.Nowhere", "Run")).is_empty());
    }

    #[test]
    fn test_overload_with_matching_arity_wins() {
        let graph = TypeGraph::populate(vec![TypeDescription::class("Shop.Planner")
            .with_method(MethodDescription::new("Plan").with_statement(Invocation::new("Shop.Planner", "NoArgs")))
            .with_method(
                MethodDescription::new("Plan")
                    .with_parameter("int", "days")
                    .with_statement(Invocation::new("Shop.Planner", "OneArg")),
            )]);
        let resolver = InvocationResolver::new(&graph);

        let call = Invocation::new("Shop.Planner", "Plan").with_argument("int", "3");
        let method = resolver.resolve(&call).unwrap();
        assert_eq!(method.parameters.len(), 1);
    }
}
