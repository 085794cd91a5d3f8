//! SELECT column-list compilation
//!
//! A field spec is one of:
//! - a string: a column name (`"id"` → `` `me`.`id` ``) or a raw expression
//!   when it contains `(`, `)`, `*` or `.`
//! - a list of field specs, joined with `,`
//! - a map, where `-as` sets an alias and every other key names a function
//!   applied to its compiled value (`{"count": "id"}` → `` COUNT( `me`.`id` ) ``)

use super::common::{identifier, is_expression, quote, AliasRegistry};
use crate::{Directive, Error, KeyedMap, Result, Value};

const AS_PREFIX: &str = " AS ";

/// Compile a field spec into a column-list fragment
pub fn compile_fields(spec: &Value, aliases: &mut AliasRegistry) -> Result<String> {
    match spec {
        Value::Scalar(scalar) => {
            let name = scalar.as_str().ok_or_else(|| {
                Error::unknown_type(format!("field must be a string, got {}", scalar.type_name()))
            })?;
            let name = identifier(name, "field")?;
            if is_expression(name) {
                Ok(name.to_string())
            } else {
                Ok(aliases.add_alias(&quote(name)))
            }
        }
        Value::List(items) => {
            let fields = items
                .iter()
                .map(|item| compile_fields(item, aliases))
                .collect::<Result<Vec<_>>>()?;
            Ok(fields.join(","))
        }
        Value::Map(map) => compile_field_map(map, aliases),
    }
}

// Later entries overwrite earlier ones: a map yields one function and at
// most one alias.
fn compile_field_map(map: &KeyedMap, aliases: &mut AliasRegistry) -> Result<String> {
    let mut func = String::new();
    let mut alias = String::new();

    for (key, value) in map.iter() {
        match Directive::parse(key)? {
            Some(Directive::As) => {
                let quoted = quote(identifier(value.expect_str("-as")?, "alias")?);
                aliases.register(quoted.clone());
                alias = format!("{}{}", AS_PREFIX, quoted);
            }
            Some(other) => return Err(other.misplaced("a field list")),
            None => {
                identifier(key, "function")?;
                let inner = compile_fields(value, aliases)?;
                if inner.starts_with(AS_PREFIX) {
                    alias = inner;
                    func = if is_expression(key) {
                        key.to_string()
                    } else {
                        aliases.add_alias(&quote(key))
                    };
                } else {
                    func = format!("{}( {} )", key.to_uppercase(), inner);
                }
            }
        }
    }

    Ok(format!("{}{}", func, alias))
}
