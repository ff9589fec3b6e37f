// src/core/type_graph/statement.rs
use serde::{Deserialize, Serialize};

/// One node of a method body, as produced by the analysis front end.
///
/// Nested statement lists are ordered and may nest to any depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Statement {
    Invocation(Invocation),
    If(IfStatement),
    Switch(SwitchStatement),
    ForEach(ForEach),
    /// Any other statement that groups children (using, while, try, ...)
    Block(Block),
}

/// A call to a method or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Full name of the declaring type
    pub containing_type: String,
    /// Method name; for constructors the simple type name
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Resolved full name of the argument's type
    #[serde(rename = "type")]
    pub type_name: String,
    /// Source text of the argument expression
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IfStatement {
    pub sections: Vec<IfSection>,
}

/// One branch of an if/else-if/else chain. The final `else` has an empty condition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IfSection {
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwitchStatement {
    #[serde(default)]
    pub expression: String,
    pub sections: Vec<SwitchSection>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwitchSection {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForEach {
    /// Text of the iterated expression
    pub expression: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Invocation {
    pub fn new(containing_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            containing_type: containing_type.into(),
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, type_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.arguments.push(Argument {
            type_name: type_name.into(),
            text: text.into(),
        });
        self
    }

    /// The same call redirected to another declaring type.
    pub fn retarget(&self, containing_type: &str) -> Self {
        Self {
            containing_type: containing_type.to_string(),
            name: self.name.clone(),
            arguments: self.arguments.clone(),
        }
    }
}

impl IfStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_section(mut self, condition: impl Into<String>, statements: Vec<Statement>) -> Self {
        self.sections.push(IfSection {
            condition: condition.into(),
            statements,
        });
        self
    }
}

impl SwitchStatement {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, labels: &[&str], statements: Vec<Statement>) -> Self {
        self.sections.push(SwitchSection {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            statements,
        });
        self
    }
}

impl ForEach {
    pub fn new(expression: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            expression: expression.into(),
            statements,
        }
    }
}

impl Statement {
    /// Collects every invocation in this statement and everything nested below it, in source order.
    pub fn collect_invocations<'a>(&'a self, out: &mut Vec<&'a Invocation>) {
        match self {
            Statement::Invocation(invocation) => out.push(invocation),
            Statement::If(if_statement) => {
                for statement in if_statement.sections.iter().flat_map(|s| &s.statements) {
                    statement.collect_invocations(out);
                }
            }
            Statement::Switch(switch) => {
                for statement in switch.sections.iter().flat_map(|s| &s.statements) {
                    statement.collect_invocations(out);
                }
            }
            Statement::ForEach(for_each) => {
                for statement in &for_each.statements {
                    statement.collect_invocations(out);
                }
            }
            Statement::Block(block) => {
                for statement in &block.statements {
                    statement.collect_invocations(out);
                }
            }
        }
    }

    /// If, Switch and ForEach keep their shape through consequence expansion.
    pub fn is_composite(&self) -> bool {
        matches!(self, Statement::If(_) | Statement::Switch(_) | Statement::ForEach(_))
    }
}

impl From<Invocation> for Statement {
    fn from(invocation: Invocation) -> Self {
        Statement::Invocation(invocation)
    }
}

impl From<IfStatement> for Statement {
    fn from(statement: IfStatement) -> Self {
        Statement::If(statement)
    }
}

impl From<SwitchStatement> for Statement {
    fn from(statement: SwitchStatement) -> Self {
        Statement::Switch(statement)
    }
}

impl From<ForEach> for Statement {
    fn from(statement: ForEach) -> Self {
        Statement::ForEach(statement)
    }
}

impl From<Block> for Statement {
    fn from(statement: Block) -> Self {
        Statement::Block(statement)
    }
}
