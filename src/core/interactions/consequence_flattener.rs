// src/core/interactions/consequence_flattener.rs
use std::borrow::Cow;
use std::ptr;

use crate::core::type_graph::{
    ForEach, IfSection, IfStatement, Invocation, MethodDescription, Statement, SwitchSection, SwitchStatement,
};
use super::{Conventions, InvocationResolver};

/// The statements one invocation would execute.
#[derive(Debug)]
pub struct Expansion<'g> {
    /// The method the invocation resolved to
    pub method: &'g MethodDescription,
    pub statements: Vec<Cow<'g, Statement>>,
}

/// Expands an invocation into its consequences, one substitution level at a time.
///
/// Top-level leaves of the invoked body are returned as they are. If, Switch and
/// ForEach are rebuilt so their shape survives, and plain calls directly inside
/// them are replaced by the called method's body, copied verbatim. Publish calls
/// and calls that cannot be resolved stay in place.
pub struct ConsequenceFlattener<'g> {
    resolver: InvocationResolver<'g>,
    conventions: &'g Conventions,
}

impl<'g> ConsequenceFlattener<'g> {
    pub fn new(resolver: InvocationResolver<'g>, conventions: &'g Conventions) -> Self {
        Self { resolver, conventions }
    }

    /// Consequences of `origin`, never including `origin` itself.
    pub fn expand(&self, origin: &Invocation) -> Option<Expansion<'g>> {
        let method = self.resolver.resolve(origin)?;

        let statements = method
            .statements
            .iter()
            .filter(|s| !is_origin(s, origin))
            .map(|s| {
                if s.is_composite() {
                    Cow::Owned(self.rewrite(s, origin))
                } else {
                    Cow::Borrowed(s)
                }
            })
            .collect();

        Some(Expansion { method, statements })
    }

    fn rewrite(&self, statement: &Statement, origin: &Invocation) -> Statement {
        match statement {
            Statement::ForEach(for_each) => ForEach {
                expression: for_each.expression.clone(),
                statements: self.rewrite_children(&for_each.statements, origin),
            }
            .into(),
            Statement::Switch(switch) => SwitchStatement {
                expression: switch.expression.clone(),
                sections: switch
                    .sections
                    .iter()
                    .map(|section| SwitchSection {
                        labels: section.labels.clone(),
                        statements: self.rewrite_children(&section.statements, origin),
                    })
                    .collect(),
            }
            .into(),
            Statement::If(if_statement) => IfStatement {
                sections: if_statement
                    .sections
                    .iter()
                    .map(|section| IfSection {
                        condition: section.condition.clone(),
                        statements: self.rewrite_children(&section.statements, origin),
                    })
                    .collect(),
            }
            .into(),
            Statement::Invocation(_) | Statement::Block(_) => statement.clone(),
        }
    }

    fn rewrite_children(&self, statements: &[Statement], origin: &Invocation) -> Vec<Statement> {
        let mut rewritten = Vec::with_capacity(statements.len());

        for statement in statements {
            if is_origin(statement, origin) {
                continue;
            }

            match statement {
                Statement::Invocation(invocation) if !self.conventions.is_message_creation(invocation) => {
                    match self.resolver.resolve(invocation) {
                        Some(method) => rewritten.extend(
                            method
                                .statements
                                .iter()
                                .filter(|s| !is_origin(s, origin))
                                .cloned(),
                        ),
                        None => rewritten.push(statement.clone()),
                    }
                }
                _ if statement.is_composite() => rewritten.push(self.rewrite(statement, origin)),
                _ => rewritten.push(statement.clone()),
            }
        }

        rewritten
    }
}

/// Identity, not structural equality: only the very statement that was invoked.
fn is_origin(statement: &Statement, origin: &Invocation) -> bool {
    matches!(statement, Statement::Invocation(invocation) if ptr::eq(invocation, origin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactions::fixtures::*;
    use crate::core::type_graph::{Block, TypeDescription, TypeGraph};

    fn flatten(graph: &TypeGraph, origin: &Invocation) -> Vec<Statement> {
        let conventions = Conventions::default();
        let flattener = ConsequenceFlattener::new(InvocationResolver::new(graph), &conventions);
        flattener
            .expand(origin)
            .map(|e| e.statements.into_iter().map(Cow::into_owned).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_top_level_leaves_are_returned_as_is() {
        let graph = TypeGraph::populate(vec![TypeDescription::class("Shop.Service").with_method(
            MethodDescription::new("Run").with_statements(vec![
                call("Shop.Service", "Helper"),
                publish("Shop.Events.Done"),
                Block { statements: vec![publish("Shop.Events.Hidden")] }.into(),
            ]),
        )]);

        let statements = flatten(&graph, &Invocation::new("Shop.Service", "Run"));

        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0], call("Shop.Service", "Helper"));
        assert!(matches!(statements[2], Statement::Block(_)));
    }

    #[test]
    fn test_composites_keep_shape_and_substitute_nested_calls_once() {
        let graph = TypeGraph::populate(vec![TypeDescription::class("Shop.Service")
            .with_method(MethodDescription::new("Run").with_statement(
                IfStatement::new()
                    .with_section("job.IsFinished", vec![call("Shop.Service", "Notify"), publish("Shop.Events.A")])
                    .with_section("", vec![call("Shop.Service", "Unknown")]),
            ))
            .with_method(
                MethodDescription::new("Notify")
                    .with_statements(vec![publish("Shop.Events.B"), call("Shop.Service", "Deeper")]),
            )]);

        let statements = flatten(&graph, &Invocation::new("Shop.Service", "Run"));

        let expected: Statement = IfStatement::new()
            .with_section(
                "job.IsFinished",
                vec![publish("Shop.Events.B"), call("Shop.Service", "Deeper"), publish("Shop.Events.A")],
            )
            .with_section("", vec![call("Shop.Service", "Unknown")])
            .into();
        assert_eq!(statements, vec![expected]);
    }

    #[test]
    fn test_origin_statement_is_excluded_by_identity() {
        let graph = TypeGraph::populate(vec![TypeDescription::class("Shop.Service").with_method(
            MethodDescription::new("Retry")
                .with_statements(vec![call("Shop.Service", "Retry"), publish("Shop.Events.Retried")]),
        )]);

        let method = &graph.get("Shop.Service").unwrap().methods[0];
        let Statement::Invocation(origin) = &method.statements[0] else {
            panic!("fixture starts with an invocation");
        };

        // The very statement is dropped.
        let statements = flatten(&graph, origin);
        assert_eq!(statements, vec![publish("Shop.Events.Retried")]);

        // A structurally equal invocation from elsewhere is not the same statement.
        let lookalike = Invocation::new("Shop.Service", "Retry");
        let statements = flatten(&graph, &lookalike);
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_unresolved_invocation_expands_to_nothing() {
        let graph = TypeGraph::populate(vec![]);
        let conventions = Conventions::default();
        let flattener = ConsequenceFlattener::new(InvocationResolver::new(&graph), &conventions);

        assert!(flattener.expand(&Invocation::new("Shop.Nowhere", "Run")).is_none());
    }
}
