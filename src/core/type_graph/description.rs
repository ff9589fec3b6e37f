// src/core/type_graph/description.rs
use serde::{Deserialize, Serialize};

use super::Statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Other,
}

/// A type found by the analysis front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescription {
    pub kind: TypeKind,
    /// Dot-separated, unique within a graph
    pub full_name: String,
    /// Declared base types; transitive once the graph is populated
    #[serde(default)]
    pub base_types: Vec<String>,
    #[serde(default)]
    pub fields: Vec<MemberDescription>,
    #[serde(default)]
    pub properties: Vec<MemberDescription>,
    #[serde(default)]
    pub methods: Vec<MethodDescription>,
}

/// A field or property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDescription {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDescription>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    /// Full names of attributes attached to the parameter
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl TypeDescription {
    pub fn new(kind: TypeKind, full_name: impl Into<String>) -> Self {
        Self {
            kind,
            full_name: full_name.into(),
            base_types: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn class(full_name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, full_name)
    }

    pub fn interface(full_name: impl Into<String>) -> Self {
        Self::new(TypeKind::Interface, full_name)
    }

    pub fn with_base(mut self, base_type: impl Into<String>) -> Self {
        self.base_types.push(base_type.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.push(MemberDescription {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.properties.push(MemberDescription {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    pub fn with_method(mut self, method: MethodDescription) -> Self {
        self.methods.push(method);
        self
    }

    /// Simple name: the last segment of the full name, generic arguments included.
    pub fn name(&self) -> &str {
        match self.namespace_split() {
            Some(dot) => &self.full_name[dot + 1..],
            None => &self.full_name,
        }
    }

    /// Everything before the simple name; empty for types in the global namespace.
    pub fn namespace(&self) -> &str {
        match self.namespace_split() {
            Some(dot) => &self.full_name[..dot],
            None => "",
        }
    }

    // Dots inside generic arguments do not separate namespace segments.
    fn namespace_split(&self) -> Option<usize> {
        let end = self.full_name.find('<').unwrap_or(self.full_name.len());
        self.full_name[..end].rfind('.')
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// True if this type is, or derives from, `full_name`.
    pub fn implements_type(&self, full_name: &str) -> bool {
        self.full_name == full_name || self.base_types.iter().any(|b| b == full_name)
    }

    /// Like [`implements_type`](Self::implements_type) for open generics such as `AggregateRoot<`.
    pub fn implements_type_starting_with(&self, prefix: &str) -> bool {
        self.full_name.starts_with(prefix) || self.base_types.iter().any(|b| b.starts_with(prefix))
    }
}

impl MethodDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            statements: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, type_name: impl Into<String>, name: impl Into<String>) -> Self {
        self.parameters.push(ParameterDescription {
            type_name: type_name.into(),
            name: name.into(),
            attributes: Vec::new(),
        });
        self
    }

    /// Adds a parameter carrying one attribute.
    pub fn with_marked_parameter(
        mut self,
        type_name: impl Into<String>,
        name: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.parameters.push(ParameterDescription {
            type_name: type_name.into(),
            name: name.into(),
            attributes: vec![attribute.into()],
        });
        self
    }

    pub fn with_statement(mut self, statement: impl Into<Statement>) -> Self {
        self.statements.push(statement.into());
        self
    }

    pub fn with_statements(mut self, statements: Vec<Statement>) -> Self {
        self.statements.extend(statements);
        self
    }

    /// Same name and parameter types; used to tell overrides from inherited members.
    pub fn same_signature(&self, other: &MethodDescription) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.type_name == b.type_name)
    }
}

impl ParameterDescription {
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    /// True if the parameter type is `simple_name` in any namespace.
    pub fn type_ends_with_name(&self, simple_name: &str) -> bool {
        self.type_name
            .strip_suffix(simple_name)
            .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_namespace() {
        let t = TypeDescription::class("Pitstop.WorkshopManagementAPI.Commands.FinishMaintenanceJob");
        assert_eq!(t.name(), "FinishMaintenanceJob");
        assert_eq!(t.namespace(), "Pitstop.WorkshopManagementAPI.Commands");

        let generic = TypeDescription::class("Shop.Domain.AggregateRoot<Shop.Domain.JobId>");
        assert_eq!(generic.name(), "AggregateRoot<Shop.Domain.JobId>");
        assert_eq!(generic.namespace(), "Shop.Domain");

        let global = TypeDescription::class("Program");
        assert_eq!(global.name(), "Program");
        assert_eq!(global.namespace(), "");
    }

    #[test]
    fn test_implements_open_generic_base() {
        let job = TypeDescription::class("Shop.Domain.Job").with_base("Shop.Domain.AggregateRoot<Shop.Domain.JobId>");

        assert!(job.implements_type_starting_with("Shop.Domain.AggregateRoot<"));
        assert!(job.implements_type_starting_with("Shop.Domain.Job"));
        assert!(!job.implements_type_starting_with("Shop.Domain.Entity<"));
        assert!(!job.implements_type("Shop.Domain.AggregateRoot<"));
    }

    #[test]
    fn test_type_suffix_match_requires_namespace_boundary() {
        let method = MethodDescription::new("HandleAsync").with_parameter("Shop.Events.JobFinished", "e");
        let parameter = &method.parameters[0];

        assert!(parameter.type_ends_with_name("JobFinished"));
        assert!(!parameter.type_ends_with_name("Finished"));
    }

    #[test]
    fn test_same_signature_compares_parameter_types() {
        let a = MethodDescription::new("Plan").with_parameter("int", "x");
        let b = MethodDescription::new("Plan").with_parameter("int", "y");
        let c = MethodDescription::new("Plan").with_parameter("string", "x");

        assert!(a.same_signature(&b));
        assert!(!a.same_signature(&c));
    }
}
