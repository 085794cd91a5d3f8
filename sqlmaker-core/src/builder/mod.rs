//! Statement builders
//!
//! The fragment compilers (`fields`, `table`, `predicate`, `clauses`) are
//! free functions over an [`AliasRegistry`](common::AliasRegistry); the
//! statement builders extend [`Maker`](crate::Maker) with one method each.

pub mod clauses;
pub mod common;
pub mod fields;
pub mod predicate;
pub mod table;

mod delete;
mod insert;
mod select;
mod update;

pub use clauses::{compile_group_by, compile_order_by, ClauseOptions};
pub use common::{quote, AliasRegistry, Logic, Statement, DEFAULT_ALIAS};
pub use predicate::PredicateCompiler;
