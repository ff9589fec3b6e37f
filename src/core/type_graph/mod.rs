// src/core/type_graph/mod.rs
//! Intermediate representation of an analyzed codebase.
//!
//! The front end produces [`TypeDescription`]s with raw statement trees; a
//! [`TypeGraph`] resolves their inheritance once and is read-only afterwards.

mod description;
mod graph;
mod statement;

pub use description::{MemberDescription, MethodDescription, ParameterDescription, TypeDescription, TypeKind};
pub use graph::TypeGraph;
pub use statement::{
    Argument, Block, ForEach, IfSection, IfStatement, Invocation, Statement, SwitchSection, SwitchStatement,
};
