//! WHERE predicate compilation
//!
//! A predicate map turns each `column => condition` entry into one clause;
//! a predicate list combines its elements. Siblings are joined with the
//! active [`Logic`], which `-and` / `-or` switch for their own subtree.
//!
//! ```text
//! {"id": 1}                       `id` = ?
//! {"id": {"<": 100}}              `id` < ?
//! {"id": {"-in": [1, 2]}}         `id` IN ( ?,? )
//! {"id": {"-between": [1, 9]}}    `id` BETWEEN ? AND ?
//! {"-or": [{"a": 1}, {"b": 2}]}   ( ( `a` = ? ) OR ( `b` = ? ) )
//! ```

use super::common::{group, identifier, AliasRegistry, Logic, Statement};
use crate::{Directive, Error, KeyedMap, Operator, Result, Scalar, Value};

/// Compiles predicate trees against one statement's alias registry
pub struct PredicateCompiler<'a> {
    aliases: &'a AliasRegistry,
    alias_columns: bool,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(aliases: &'a AliasRegistry, alias_columns: bool) -> Self {
        Self {
            aliases,
            alias_columns,
        }
    }

    /// Compile a predicate spec under the given logic.
    ///
    /// The result is a parenthesised boolean expression, or an empty
    /// statement when the spec yields no clauses.
    pub fn compile(&self, spec: &Value, logic: Logic) -> Result<Statement> {
        match spec {
            Value::List(items) => self.compile_list(items, logic),
            Value::Map(map) => self.compile_map(map, logic),
            Value::Scalar(scalar) => Err(Error::unknown_type(format!(
                "predicate must be a list or a map, got {}",
                scalar.type_name()
            ))),
        }
    }

    // A bare string in a list is a column name whose value the caller binds
    // separately, so it adds a placeholder without a parameter.
    fn compile_list(&self, items: &[Value], logic: Logic) -> Result<Statement> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        for item in items {
            match item {
                Value::Scalar(_) => {
                    let column = identifier(item.expect_str("predicate column")?, "column")?;
                    clauses.push(format!("{} {} ?", self.column(column), Operator::EQ));
                }
                Value::Map(map) => {
                    let (sql, nested) = self.compile_map(map, logic)?.into_parts();
                    if !sql.is_empty() {
                        clauses.push(sql);
                    }
                    params.extend(nested);
                }
                Value::List(_) => {
                    return Err(Error::unknown_type(
                        "a predicate list cannot contain another list",
                    ))
                }
            }
        }

        Ok(Statement::new(group(&clauses, logic), params))
    }

    fn compile_map(&self, map: &KeyedMap, logic: Logic) -> Result<Statement> {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        for (key, value) in map.iter() {
            match Directive::parse(key)? {
                Some(directive @ (Directive::And | Directive::Or)) => {
                    let scoped = if directive == Directive::Or {
                        Logic::Or
                    } else {
                        Logic::And
                    };
                    let items = value.expect_list(key)?;
                    let (sql, nested) = self.compile_list(items, scoped)?.into_parts();
                    if !sql.is_empty() {
                        clauses.push(sql);
                    }
                    params.extend(nested);
                }
                Some(other) => return Err(other.misplaced("a predicate column position")),
                None => {
                    identifier(key, "column")?;
                    let (operator, placeholder, operands) = condition(key, value)?;
                    clauses.push(format!("{} {} {}", self.column(key), operator, placeholder));
                    params.extend(operands);
                }
            }
        }

        Ok(Statement::new(group(&clauses, logic), params))
    }

    fn column(&self, name: &str) -> String {
        self.aliases.column(name, self.alias_columns)
    }
}

/// Operator, placeholder and bound values for one column condition
fn condition(column: &str, value: &Value) -> Result<(Operator, String, Vec<Scalar>)> {
    match value {
        Value::Scalar(scalar) => Ok((
            Operator::EQ,
            Operator::EQ.placeholder(1),
            vec![comparable(column, scalar)?],
        )),
        Value::Map(map) => {
            let (op, operand) = map.single(column)?;
            match Directive::parse(op)? {
                Some(Directive::In) => {
                    let values = scalars(column, operand.expect_list("-in")?)?;
                    if values.is_empty() {
                        return Err(Error::invalid_argument(format!(
                            "-in list for '{}' is empty",
                            column
                        )));
                    }
                    Ok((Operator::IN, Operator::IN.placeholder(values.len()), values))
                }
                Some(Directive::Between) => {
                    let values = scalars(column, operand.expect_list("-between")?)?;
                    if values.len() != 2 {
                        return Err(Error::invalid_argument(format!(
                            "-between for '{}' needs exactly 2 values, got {}",
                            column,
                            values.len()
                        )));
                    }
                    Ok((Operator::BETWEEN, Operator::BETWEEN.placeholder(2), values))
                }
                Some(other) => Err(other.misplaced("a column condition")),
                None => {
                    let scalar = operand.expect_scalar(op)?;
                    let operator = Operator::raw(op);
                    let placeholder = operator.placeholder(1);
                    Ok((operator, placeholder, vec![comparable(column, scalar)?]))
                }
            }
        }
        Value::List(_) => Err(Error::unknown_type(format!(
            "condition for '{}' is a list; use {{\"-in\": [...]}}",
            column
        ))),
    }
}

/// Only integers and strings are compared against columns
fn comparable(column: &str, scalar: &Scalar) -> Result<Scalar> {
    match scalar {
        Scalar::Int(_) | Scalar::String(_) => Ok(scalar.clone()),
        other => Err(Error::unknown_type(format!(
            "cannot compare '{}' with a {} value",
            column,
            other.type_name()
        ))),
    }
}

fn scalars(column: &str, items: &[Value]) -> Result<Vec<Scalar>> {
    items
        .iter()
        .map(|item| comparable(column, item.expect_scalar(column)?))
        .collect()
}
