//! SELECT statement builder

use super::clauses::ClauseOptions;
use super::common::Statement;
use super::{fields, table};
use crate::maker::{finish, Maker};
use crate::{Result, Value};

impl Maker {
    /// Build `SELECT fields FROM table` with an optional WHERE tail.
    ///
    /// `table` is a name, a `[name, alias]` pair or a single-entry map of
    /// joins. `fields` defaults to `*`. Aliases declared with `-as` in the
    /// field list are left unprefixed wherever they are referenced later in
    /// the same statement.
    pub fn select(
        &self,
        table: &Value,
        fields: Option<&Value>,
        filter: Option<&Value>,
        options: Option<&ClauseOptions>,
    ) -> Result<Statement> {
        finish("select", self.build_select(table, fields, filter, options))
    }

    fn build_select(
        &self,
        table_spec: &Value,
        field_spec: Option<&Value>,
        filter: Option<&Value>,
        options: Option<&ClauseOptions>,
    ) -> Result<Statement> {
        let mut aliases = self.registry();
        let from = table::compile_table(table_spec, &aliases)?;
        let columns = match field_spec {
            Some(spec) if !spec.is_empty() => fields::compile_fields(spec, &mut aliases)?,
            _ => "*".to_string(),
        };

        let mut stmt = Statement::new(format!("SELECT {} FROM {}", columns, from), Vec::new());
        stmt.push(self.where_tail(filter, options, true, &aliases)?);
        Ok(stmt)
    }
}
