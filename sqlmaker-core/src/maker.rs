//! The statement compiler handle

use crate::builder::clauses::ClauseOptions;
use crate::builder::common::{AliasRegistry, Logic, Statement, DEFAULT_ALIAS};
use crate::builder::predicate::PredicateCompiler;
use crate::builder::{fields, table};
use crate::{Result, Value};
use tracing::{debug, trace};

/// Compiles query descriptions into [`Statement`]s.
///
/// A `Maker` holds configuration only. Every call builds its own alias
/// registry, so one instance can be shared freely between threads.
///
/// # Examples
/// ```
/// use sqlmaker_core::{Maker, Value};
///
/// let maker = Maker::new();
/// let stmt = maker.select(&Value::from("user"), None, None, None).unwrap();
/// assert_eq!(stmt.text(), "SELECT * FROM `user` `me`");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maker {
    default_alias: String,
}

impl Default for Maker {
    fn default() -> Self {
        Self {
            default_alias: DEFAULT_ALIAS.to_string(),
        }
    }
}

impl Maker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `alias` instead of `me` for the base table and bare columns
    pub fn with_default_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_alias = alias.into();
        self
    }

    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    pub(crate) fn registry(&self) -> AliasRegistry {
        AliasRegistry::new(&self.default_alias)
    }

    /// Compile a field spec on its own, e.g. for a hand-written statement
    pub fn compile_fields(&self, spec: &Value) -> Result<String> {
        fields::compile_fields(spec, &mut self.registry())
    }

    /// Compile a table spec (with optional joins) on its own
    pub fn compile_table(&self, spec: &Value) -> Result<String> {
        table::compile_table(spec, &self.registry())
    }

    /// Build a WHERE clause followed by the GROUP BY / ORDER BY / LIMIT /
    /// OFFSET modifiers.
    ///
    /// Predicate columns are prefixed with the default alias only when
    /// `alias_columns` is set; modifier columns always are.
    pub fn where_(
        &self,
        filter: &Value,
        options: Option<&ClauseOptions>,
        alias_columns: bool,
    ) -> Result<Statement> {
        let aliases = self.registry();
        finish(
            "where",
            self.where_tail(Some(filter), options, alias_columns, &aliases),
        )
    }

    pub(crate) fn where_tail(
        &self,
        filter: Option<&Value>,
        options: Option<&ClauseOptions>,
        alias_columns: bool,
        aliases: &AliasRegistry,
    ) -> Result<Statement> {
        let mut stmt = Statement::default();
        if let Some(filter) = filter {
            let predicate = PredicateCompiler::new(aliases, alias_columns).compile(filter, Logic::And)?;
            if !predicate.is_empty() {
                stmt.push_str(" WHERE ");
                stmt.push(predicate);
            }
        }
        if let Some(options) = options {
            stmt.push_str(&options.compile(aliases)?);
        }
        Ok(stmt)
    }
}

/// Log the outcome of a builder call and hand it back
pub(crate) fn finish(kind: &'static str, result: Result<Statement>) -> Result<Statement> {
    match &result {
        Ok(stmt) => debug!(
            target: "sqlmaker",
            kind,
            placeholders = stmt.placeholder_count(),
            params = stmt.params().len(),
            sql = %stmt.text(),
            "compiled statement"
        ),
        Err(err) => trace!(target: "sqlmaker", kind, error = %err, "rejected statement input"),
    }
    result
}
