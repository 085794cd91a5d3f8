//! INSERT, REPLACE and upsert statement builders

use super::common::{identifier, quote, Statement};
use crate::maker::{finish, Maker};
use crate::{Error, KeyedMap, Result, Scalar, Value};

impl Maker {
    /// Build `INSERT INTO ... ( cols ) VALUES ( ?,... )` from a row map
    ///
    /// # Examples
    /// ```
    /// use sqlmaker_core::{KeyedMap, Maker, Value};
    ///
    /// let mut row = KeyedMap::new();
    /// row.insert("id", 1);
    /// row.insert("name", "sample");
    ///
    /// let stmt = Maker::new().insert("user", &Value::from(row)).unwrap();
    /// assert_eq!(stmt.text(), "INSERT INTO `user` ( `id`,`name` ) VALUES ( ?,? )");
    /// ```
    pub fn insert(&self, table: &str, row: &Value) -> Result<Statement> {
        finish("insert", insert_into("INSERT INTO", table, row))
    }

    /// Same as [`Maker::insert`] with `REPLACE INTO`
    pub fn replace(&self, table: &str, row: &Value) -> Result<Statement> {
        finish("replace", insert_into("REPLACE INTO", table, row))
    }

    /// Insert many rows with one shared column list.
    ///
    /// Every row must be a map with the same columns, in the same order,
    /// as the first row.
    pub fn bulk_insert(&self, table: &str, rows: &Value) -> Result<Statement> {
        finish("bulk_insert", bulk_insert(table, rows))
    }

    /// Insert, or on a duplicate key overwrite every column with the new value
    pub fn upsert(&self, table: &str, row: &Value) -> Result<Statement> {
        finish("upsert", upsert(table, row))
    }

    /// Insert, or on a duplicate key apply a raw operation per column.
    ///
    /// `ops` maps a column to SQL appended after it, so `{"count": "+10"}`
    /// yields `` `count` = `count` +10 ``. The operations are emitted as
    /// written and never parameterised.
    pub fn upsert_with_op(&self, table: &str, row: &Value, ops: &Value) -> Result<Statement> {
        finish("upsert_with_op", upsert_with_op(table, row, ops))
    }
}

fn insert_into(verb: &str, table: &str, row: &Value) -> Result<Statement> {
    let table = identifier(table, "table")?;
    let (columns, params) = row_parts(row)?;
    let sql = format!(
        "{} {} {} VALUES {}",
        verb,
        quote(table),
        column_list(&columns),
        value_tuple(columns.len())
    );
    Ok(Statement::new(sql, params))
}

fn bulk_insert(table: &str, rows: &Value) -> Result<Statement> {
    let table = identifier(table, "table")?;
    let rows = match rows {
        Value::List(rows) if !rows.is_empty() => rows,
        Value::List(_) => return Err(Error::invalid_argument("bulk insert needs at least one row")),
        other => {
            return Err(Error::invalid_argument(format!(
                "bulk insert expects a list of rows, got {}",
                other.type_name()
            )))
        }
    };

    let (columns, mut params) = row_parts(&rows[0])?;
    for (index, row) in rows.iter().enumerate().skip(1) {
        let map = row.expect_map("bulk insert row")?;
        if map.len() != columns.len() {
            return Err(Error::invalid_argument(format!(
                "row {} has {} columns, expected {}",
                index,
                map.len(),
                columns.len()
            )));
        }
        if !map.keys().eq(columns.iter().copied()) {
            return Err(Error::invalid_argument(format!(
                "row {} columns differ from the first row",
                index
            )));
        }
        params.extend(scalars(map)?);
    }

    let tuple = value_tuple(columns.len());
    let sql = format!(
        "INSERT INTO {} {} VALUES {}",
        quote(table),
        column_list(&columns),
        vec![tuple.as_str(); rows.len()].join(",")
    );
    Ok(Statement::new(sql, params))
}

fn upsert(table: &str, row: &Value) -> Result<Statement> {
    let mut stmt = insert_into("INSERT INTO", table, row)?;
    let updates: Vec<String> = row
        .expect_map("row")?
        .keys()
        .map(|column| {
            let quoted = quote(column);
            format!("{} = VALUES({})", quoted, quoted)
        })
        .collect();
    stmt.push_str(&on_duplicate(&updates));
    Ok(stmt)
}

fn upsert_with_op(table: &str, row: &Value, ops: &Value) -> Result<Statement> {
    let mut stmt = insert_into("INSERT INTO", table, row)?;
    let updates = ops
        .expect_map("upsert operations")?
        .iter()
        .map(|(column, op)| {
            let quoted = quote(identifier(column, "column")?);
            Ok(format!("{} = {} {}", quoted, quoted, op.expect_str(column)?))
        })
        .collect::<Result<Vec<_>>>()?;
    stmt.push_str(&on_duplicate(&updates));
    Ok(stmt)
}

/// Column names and bound values of one row map.
///
/// An empty row classifies as a list and is rejected with the other
/// non-map shapes.
fn row_parts(row: &Value) -> Result<(Vec<&str>, Vec<Scalar>)> {
    let map = row.expect_map("row")?;
    let columns = map
        .keys()
        .map(|column| identifier(column, "column"))
        .collect::<Result<Vec<_>>>()?;
    Ok((columns, scalars(map)?))
}

fn scalars(map: &KeyedMap) -> Result<Vec<Scalar>> {
    map.iter()
        .map(|(column, value)| value.expect_scalar(column).cloned())
        .collect()
}

fn column_list(columns: &[&str]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| quote(c)).collect();
    format!("( {} )", quoted.join(","))
}

fn value_tuple(width: usize) -> String {
    format!("( {} )", vec!["?"; width].join(","))
}

fn on_duplicate(updates: &[String]) -> String {
    format!(" ON DUPLICATE KEY UPDATE {}", updates.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        Value::try_from(json).unwrap()
    }

    fn s(text: &str) -> Scalar {
        Scalar::String(text.to_string())
    }

    #[test]
    fn test_insert() {
        let stmt = Maker::new()
            .insert("user", &value(json!({ "id": 1, "name": "sample" })))
            .unwrap();
        assert_eq!(stmt.text(), "INSERT INTO `user` ( `id`,`name` ) VALUES ( ?,? )");
        assert_eq!(stmt.params(), &[Scalar::Int(1), s("sample")]);
    }

    #[test]
    fn test_insert_null_and_bool() {
        let stmt = Maker::new()
            .insert("flag", &value(json!({ "on": true, "note": null })))
            .unwrap();
        assert_eq!(stmt.params(), &[Scalar::Bool(true), Scalar::Null]);
    }

    #[test]
    fn test_replace() {
        let stmt = Maker::new()
            .replace("user", &value(json!({ "id": 1, "name": "sample" })))
            .unwrap();
        assert_eq!(stmt.text(), "REPLACE INTO `user` ( `id`,`name` ) VALUES ( ?,? )");
        assert_eq!(stmt.params(), &[Scalar::Int(1), s("sample")]);
    }

    #[test]
    fn test_insert_rejects_non_map_rows() {
        let maker = Maker::new();
        assert!(maker.insert("user", &value(json!(["id"]))).unwrap_err().is_unknown_type());
        assert!(maker.insert("user", &value(json!("id"))).unwrap_err().is_unknown_type());
        assert!(maker
            .insert("user", &value(json!({ "id": [1] })))
            .unwrap_err()
            .is_unknown_type());
        assert!(maker
            .insert("user", &Value::from(KeyedMap::new()))
            .unwrap_err()
            .is_unknown_type());
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let maker = Maker::new();
        assert!(maker
            .insert("", &value(json!({ "id": 1 })))
            .unwrap_err()
            .is_invalid_argument());
        assert!(maker
            .insert("user", &value(json!({ "": 1 })))
            .unwrap_err()
            .is_invalid_argument());
        assert!(maker
            .bulk_insert("", &value(json!([{ "id": 1 }])))
            .unwrap_err()
            .is_invalid_argument());
        assert!(maker
            .upsert_with_op("user", &value(json!({ "id": 1 })), &value(json!({ "": "+1" })))
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_bulk_insert() {
        let stmt = Maker::new()
            .bulk_insert(
                "user",
                &value(json!([
                    { "id": 1, "name": "sample1" },
                    { "id": 2, "name": "sample2" },
                    { "id": 3, "name": "sample3" }
                ])),
            )
            .unwrap();
        assert_eq!(
            stmt.text(),
            "INSERT INTO `user` ( `id`,`name` ) VALUES ( ?,? ),( ?,? ),( ?,? )"
        );
        assert_eq!(
            stmt.params(),
            &[
                Scalar::Int(1),
                s("sample1"),
                Scalar::Int(2),
                s("sample2"),
                Scalar::Int(3),
                s("sample3")
            ]
        );
        assert_eq!(stmt.placeholder_count(), 6);
    }

    #[test]
    fn test_bulk_insert_errors() {
        let maker = Maker::new();
        assert!(maker.bulk_insert("t", &value(json!("foo"))).unwrap_err().is_invalid_argument());
        assert!(maker.bulk_insert("t", &value(json!([]))).unwrap_err().is_invalid_argument());
        assert!(maker.bulk_insert("t", &value(json!(["foo"]))).unwrap_err().is_unknown_type());
        assert!(maker
            .bulk_insert("t", &value(json!([{ "col1": "val" }, "foo"])))
            .unwrap_err()
            .is_unknown_type());
        assert!(maker
            .bulk_insert(
                "t",
                &value(json!([{ "col1": "val" }, { "col1": "val", "col2": "val" }]))
            )
            .unwrap_err()
            .is_invalid_argument());
        assert!(maker
            .bulk_insert("t", &value(json!([{ "a": 1, "b": 2 }, { "b": 2, "a": 1 }])))
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_upsert() {
        let stmt = Maker::new()
            .upsert("user", &value(json!({ "id": 1, "name": "sample" })))
            .unwrap();
        assert_eq!(
            stmt.text(),
            "INSERT INTO `user` ( `id`,`name` ) VALUES ( ?,? ) \
             ON DUPLICATE KEY UPDATE `id` = VALUES(`id`), `name` = VALUES(`name`)"
        );
        assert_eq!(stmt.params(), &[Scalar::Int(1), s("sample")]);
    }

    #[test]
    fn test_upsert_with_op() {
        let stmt = Maker::new()
            .upsert_with_op(
                "user",
                &value(json!({ "id": 1, "count": "1", "pt": "2" })),
                &value(json!({ "count": "+10", "pt": "-2" })),
            )
            .unwrap();
        assert_eq!(
            stmt.text(),
            "INSERT INTO `user` ( `id`,`count`,`pt` ) VALUES ( ?,?,? ) \
             ON DUPLICATE KEY UPDATE `count` = `count` +10, `pt` = `pt` -2"
        );
        assert_eq!(stmt.params(), &[Scalar::Int(1), s("1"), s("2")]);
    }

    #[test]
    fn test_upsert_with_op_errors() {
        let maker = Maker::new();
        let row = value(json!({ "id": 1 }));
        assert!(maker
            .upsert_with_op("t", &row, &value(json!({ "count": 10 })))
            .unwrap_err()
            .is_unknown_type());
        assert!(maker
            .upsert_with_op("t", &row, &value(json!(["+1"])))
            .unwrap_err()
            .is_unknown_type());
        assert!(maker
            .upsert_with_op("t", &row, &value(json!({})))
            .unwrap_err()
            .is_unknown_type());
        assert!(maker
            .upsert_with_op("t", &value(json!([1])), &value(json!({ "id": "+1" })))
            .unwrap_err()
            .is_unknown_type());
    }
}
