//! DELETE statement builder

use super::clauses::ClauseOptions;
use super::common::{identifier, quote, Statement};
use crate::maker::{finish, Maker};
use crate::{Result, Value};

impl Maker {
    /// Build `DELETE FROM table` with an optional WHERE tail.
    ///
    /// Without a filter this deletes every row; nothing stops that here.
    pub fn delete(
        &self,
        table: &str,
        filter: Option<&Value>,
        options: Option<&ClauseOptions>,
    ) -> Result<Statement> {
        finish("delete", self.build_delete(table, filter, options))
    }

    fn build_delete(
        &self,
        table: &str,
        filter: Option<&Value>,
        options: Option<&ClauseOptions>,
    ) -> Result<Statement> {
        let table = identifier(table, "table")?;
        let mut stmt = Statement::new(format!("DELETE FROM {}", quote(table)), Vec::new());
        stmt.push(self.where_tail(filter, options, false, &self.registry())?);
        Ok(stmt)
    }
}
