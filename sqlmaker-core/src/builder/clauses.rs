//! GROUP BY / ORDER BY / LIMIT / OFFSET modifiers

use super::common::{identifier, AliasRegistry};
use crate::{Directive, Error, Result, Scalar, Value};

/// Modifiers appended after the WHERE clause
///
/// # Examples
/// ```
/// use sqlmaker_core::ClauseOptions;
///
/// let options = ClauseOptions::new()
///     .order_by(vec!["id"])
///     .limit(10)
///     .offset(20);
/// assert!(!options.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClauseOptions {
    pub group_by: Option<Value>,
    pub order_by: Option<Value>,
    pub rows: Option<Value>,
    pub offset: Option<Value>,
}

impl ClauseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the GROUP BY columns (a name or a list of names)
    pub fn group_by(mut self, columns: impl Into<Value>) -> Self {
        self.group_by = Some(columns.into());
        self
    }

    /// Set the ORDER BY columns; `{"-desc": "name"}` sorts descending
    pub fn order_by(mut self, columns: impl Into<Value>) -> Self {
        self.order_by = Some(columns.into());
        self
    }

    /// Set the LIMIT row count
    pub fn limit(mut self, rows: impl Into<Value>) -> Self {
        self.rows = Some(rows.into());
        self
    }

    /// Set the OFFSET
    pub fn offset(mut self, offset: impl Into<Value>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.group_by.is_none()
            && self.order_by.is_none()
            && self.rows.is_none()
            && self.offset.is_none()
    }

    /// Render the modifiers in their fixed order
    pub(crate) fn compile(&self, aliases: &AliasRegistry) -> Result<String> {
        let mut sql = String::new();
        if let Some(group) = &self.group_by {
            sql.push_str(&compile_group_by(group, aliases)?);
        }
        if let Some(order) = &self.order_by {
            sql.push_str(&compile_order_by(order, aliases)?);
        }
        if let Some(rows) = &self.rows {
            sql.push_str(&format!(" LIMIT {}", count("LIMIT", rows)?));
        }
        if let Some(offset) = &self.offset {
            sql.push_str(&format!(" OFFSET {}", count("OFFSET", offset)?));
        }
        Ok(sql)
    }
}

/// Read options from a map with the keys `groupBy`, `orderBy`, `rows` and
/// `offset`. An empty list counts as no options.
impl TryFrom<&Value> for ClauseOptions {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        let mut options = ClauseOptions::new();
        if value.is_empty() {
            return Ok(options);
        }
        for (key, item) in value.expect_map("options")?.iter() {
            let slot = match key {
                "groupBy" => &mut options.group_by,
                "orderBy" => &mut options.order_by,
                "rows" => &mut options.rows,
                "offset" => &mut options.offset,
                other => {
                    return Err(Error::unknown_type(format!("unknown option '{}'", other)))
                }
            };
            *slot = Some(item.clone());
        }
        Ok(options)
    }
}

impl TryFrom<Value> for ClauseOptions {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        ClauseOptions::try_from(&value)
    }
}

pub fn compile_group_by(spec: &Value, aliases: &AliasRegistry) -> Result<String> {
    let mut columns = Vec::new();
    collect_columns(spec, aliases, false, &mut columns)?;
    render("GROUP BY", columns)
}

pub fn compile_order_by(spec: &Value, aliases: &AliasRegistry) -> Result<String> {
    let mut columns = Vec::new();
    collect_columns(spec, aliases, true, &mut columns)?;
    render("ORDER BY", columns)
}

fn render(keyword: &str, columns: Vec<String>) -> Result<String> {
    if columns.is_empty() {
        return Err(Error::invalid_argument(format!("{} needs at least one column", keyword)));
    }
    Ok(format!(" {} {}", keyword, columns.join(",")))
}

// Bare names are always aliased here, whatever the predicate flag says.
fn collect_columns(
    spec: &Value,
    aliases: &AliasRegistry,
    directions: bool,
    out: &mut Vec<String>,
) -> Result<()> {
    match spec {
        Value::Scalar(_) => {
            out.push(aliases.column(identifier(spec.expect_str("column")?, "column")?, true));
        }
        Value::List(items) => {
            for item in items {
                collect_columns(item, aliases, directions, out)?;
            }
        }
        Value::Map(map) if directions => {
            let (key, inner) = map.single("ORDER BY")?;
            let direction = match Directive::parse(key)? {
                Some(d @ (Directive::Asc | Directive::Desc)) => d,
                Some(other) => return Err(other.misplaced("ORDER BY")),
                None => {
                    return Err(Error::unknown_type(format!(
                        "ORDER BY expects -asc or -desc, got '{}'",
                        key
                    )))
                }
            };
            let mut nested = Vec::new();
            collect_columns(inner, aliases, directions, &mut nested)?;
            out.extend(
                nested
                    .into_iter()
                    .map(|column| format!("{} {}", column, direction.keyword())),
            );
        }
        Value::Map(_) => {
            return Err(Error::unknown_type("GROUP BY expects a column name or a list"));
        }
    }
    Ok(())
}

/// A LIMIT/OFFSET count: a non-negative integer or a numeric string
fn count(keyword: &str, value: &Value) -> Result<u64> {
    match value.expect_scalar(keyword)? {
        Scalar::Int(n) => u64::try_from(*n)
            .map_err(|_| Error::invalid_argument(format!("{} must not be negative, got {}", keyword, n))),
        Scalar::String(s) => s.trim().parse::<u64>().map_err(|_| {
            Error::invalid_argument(format!("{} must be numeric, got '{}'", keyword, s))
        }),
        other => Err(Error::unknown_type(format!(
            "{} expects an integer, got {}",
            keyword,
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::common::DEFAULT_ALIAS;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn compile(options: serde_json::Value) -> Result<String> {
        let options = ClauseOptions::try_from(Value::try_from(options)?)?;
        options.compile(&AliasRegistry::new(DEFAULT_ALIAS))
    }

    #[test]
    fn test_order_by_with_direction() {
        assert_eq!(
            compile(json!({ "orderBy": ["id", { "-desc": "name" }] })).unwrap(),
            " ORDER BY `me`.`id`,`me`.`name` DESC"
        );
    }

    #[test]
    fn test_order_by_qualified_columns() {
        assert_eq!(
            compile(json!({ "orderBy": ["`foreign`.`id`", { "-DESC": "`foreign`.`name`" }] }))
                .unwrap(),
            " ORDER BY `foreign`.`id`,`foreign`.`name` DESC"
        );
    }

    #[test]
    fn test_direction_applies_to_each_column() {
        assert_eq!(
            compile(json!({ "orderBy": { "-asc": ["a", "b"] } })).unwrap(),
            " ORDER BY `me`.`a` ASC,`me`.`b` ASC"
        );
    }

    #[test]
    fn test_group_by() {
        assert_eq!(
            compile(json!({ "groupBy": ["book", "chapter"] })).unwrap(),
            " GROUP BY `me`.`book`,`me`.`chapter`"
        );
    }

    #[test]
    fn test_registered_alias_in_order_by() {
        let mut aliases = AliasRegistry::new(DEFAULT_ALIAS);
        aliases.register("`total`".to_string());
        let sql = compile_order_by(&Value::from("total"), &aliases).unwrap();
        assert_eq!(sql, " ORDER BY `total`");
    }

    #[test]
    fn test_limit_and_offset() {
        assert_eq!(compile(json!({ "rows": 5 })).unwrap(), " LIMIT 5");
        assert_eq!(compile(json!({ "rows": 5, "offset": 10 })).unwrap(), " LIMIT 5 OFFSET 10");
        assert_eq!(compile(json!({ "rows": "7", "offset": " 3" })).unwrap(), " LIMIT 7 OFFSET 3");
    }

    #[test]
    fn test_fixed_modifier_order() {
        assert_eq!(
            compile(json!({ "offset": 2, "rows": 1, "orderBy": "id", "groupBy": "kind" })).unwrap(),
            " GROUP BY `me`.`kind` ORDER BY `me`.`id` LIMIT 1 OFFSET 2"
        );
    }

    #[test]
    fn test_bad_counts() {
        assert!(compile(json!({ "rows": "ten" })).unwrap_err().is_invalid_argument());
        assert!(compile(json!({ "rows": -1 })).unwrap_err().is_invalid_argument());
        assert!(compile(json!({ "offset": true })).unwrap_err().is_unknown_type());
        assert!(compile(json!({ "offset": [1] })).unwrap_err().is_unknown_type());
    }

    #[test]
    fn test_bad_column_specs() {
        assert!(compile(json!({ "groupBy": { "-desc": "a" } })).unwrap_err().is_unknown_type());
        assert!(compile(json!({ "orderBy": { "-desc": "a", "-asc": "b" } }))
            .unwrap_err()
            .is_unknown_type());
        assert!(compile(json!({ "orderBy": { "name": "a" } })).unwrap_err().is_unknown_type());
        assert!(compile(json!({ "orderBy": [] })).unwrap_err().is_invalid_argument());
        assert!(compile(json!({ "groupBy": ["book", ""] })).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_options_from_value() {
        assert!(compile(json!({ "having": 1 })).unwrap_err().is_unknown_type());
        assert_eq!(compile(json!([])).unwrap(), "");
        assert!(ClauseOptions::try_from(Value::from("rows")).unwrap_err().is_unknown_type());
    }
}
