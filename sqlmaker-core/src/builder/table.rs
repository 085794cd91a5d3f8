//! FROM clause compilation: base tables and joins

use super::common::{identifier, quote, AliasRegistry};
use crate::{Directive, Error, KeyedMap, Result, Value};

/// Compile a table spec into a FROM fragment.
///
/// - `"user"` → `` `user` `me` ``
/// - `["item", "i"]` → `` `item` `i` ``
/// - `{"user": join}` → the base table followed by its JOIN clauses
pub fn compile_table(spec: &Value, aliases: &AliasRegistry) -> Result<String> {
    match spec {
        Value::Scalar(_) => {
            let table = identifier(spec.expect_str("table")?, "table")?;
            Ok(format!("{} {}", quote(table), quote(aliases.default_alias())))
        }
        Value::List(items) => match items.as_slice() {
            [entity, alias] => Ok(format!(
                "{} {}",
                quote(identifier(entity.expect_str("table name")?, "table")?),
                quote(identifier(alias.expect_str("table alias")?, "table alias")?)
            )),
            _ => Err(Error::unknown_type(format!(
                "table list must be [name, alias], got {} elements",
                items.len()
            ))),
        },
        Value::Map(map) => {
            let (table, join) = map.single("table with joins")?;
            let base = compile_table(&Value::from(table), aliases)?;
            let joins = compile_join(join, aliases)?;
            Ok(format!("{}{}", base, joins))
        }
    }
}

/// Compile one join map or a list of them
pub fn compile_join(spec: &Value, aliases: &AliasRegistry) -> Result<String> {
    match spec {
        Value::List(items) => items
            .iter()
            .map(|item| compile_join_clause(item.expect_map("join")?, aliases))
            .collect(),
        Value::Map(map) => compile_join_clause(map, aliases),
        Value::Scalar(scalar) => Err(Error::unknown_type(format!(
            "join must be a map or a list of maps, got {}",
            scalar.type_name()
        ))),
    }
}

fn compile_join_clause(map: &KeyedMap, aliases: &AliasRegistry) -> Result<String> {
    let mut target = String::new();
    let mut condition = String::new();

    for (key, value) in map.iter() {
        match Directive::parse(key)? {
            Some(kind @ (Directive::Inner | Directive::Left)) => {
                target = format!(" {} JOIN {}", kind.keyword(), compile_table(value, aliases)?);
            }
            Some(Directive::On) => {
                let (left, right) = match value.expect_list("-on")? {
                    [left, right] => (
                        identifier(left.expect_str("-on column")?, "join column")?,
                        right.expect_str("-on target")?,
                    ),
                    other => {
                        return Err(Error::unknown_type(format!(
                            "-on must be [column, expression], got {} elements",
                            other.len()
                        )))
                    }
                };
                // The right-hand side is caller SQL, usually a qualified column.
                condition = format!("ON {} = {}", aliases.column(left, true), right);
            }
            Some(other) => return Err(other.misplaced("a join")),
            None => {
                return Err(Error::unknown_type(format!(
                    "unexpected key '{}' in a join",
                    key
                )))
            }
        }
    }

    Ok(format!("{} {}", target, condition))
}
