//! UPDATE statement builder

use super::clauses::ClauseOptions;
use super::common::{identifier, quote, Statement};
use crate::maker::{finish, Maker};
use crate::{Result, Value};

impl Maker {
    /// Build `UPDATE ... SET col = ?,...` with an optional WHERE tail.
    ///
    /// Predicate columns are not aliased since UPDATE names no alias.
    ///
    /// # Examples
    /// ```
    /// use sqlmaker_core::{KeyedMap, Maker, Value};
    ///
    /// let mut row = KeyedMap::new();
    /// row.insert("name", "Jane");
    ///
    /// let mut filter = KeyedMap::new();
    /// filter.insert("id", 7);
    ///
    /// let stmt = Maker::new()
    ///     .update("user", &Value::from(row), Some(&Value::from(filter)), None)
    ///     .unwrap();
    /// assert_eq!(stmt.text(), "UPDATE `user` SET `name` = ? WHERE ( `id` = ? )");
    /// assert_eq!(stmt.params().len(), 2);
    /// ```
    pub fn update(
        &self,
        table: &str,
        row: &Value,
        filter: Option<&Value>,
        options: Option<&ClauseOptions>,
    ) -> Result<Statement> {
        finish("update", self.build_update(table, row, filter, options))
    }

    fn build_update(
        &self,
        table: &str,
        row: &Value,
        filter: Option<&Value>,
        options: Option<&ClauseOptions>,
    ) -> Result<Statement> {
        let table = identifier(table, "table")?;
        let map = row.expect_map("update row")?;

        let mut assignments = Vec::with_capacity(map.len());
        let mut params = Vec::with_capacity(map.len());
        for (column, value) in map.iter() {
            assignments.push(format!("{} = ?", quote(identifier(column, "column")?)));
            params.push(value.expect_scalar(column)?.clone());
        }

        let mut stmt = Statement::new(
            format!("UPDATE {} SET {}", quote(table), assignments.join(",")),
            params,
        );
        stmt.push(self.where_tail(filter, options, false, &self.registry())?);
        Ok(stmt)
    }
}
