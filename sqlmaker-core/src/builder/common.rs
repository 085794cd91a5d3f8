//! Common types shared across all statement builders

use crate::{Error, Result, Scalar};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{self, Display};

/// Identifier delimiter
pub const QUOTE: char = '`';

/// Alias applied to the base table and to unqualified columns
pub const DEFAULT_ALIAS: &str = "me";

/// Wrap a bare name in identifier delimiters.
///
/// The name is used verbatim: an embedded backtick is not escaped, so
/// names must come from trusted code, never from end users.
pub fn quote(name: &str) -> String {
    format!("{}{}{}", QUOTE, name, QUOTE)
}

/// Reject an empty name before it reaches [`quote`]
pub(crate) fn identifier<'a>(name: &'a str, context: &str) -> Result<&'a str> {
    if name.is_empty() {
        return Err(Error::invalid_argument(format!("{} name must not be empty", context)));
    }
    Ok(name)
}

/// A column reference that is already quoted or qualified
pub fn is_qualified(name: &str) -> bool {
    name.contains(QUOTE) || name.contains('.')
}

/// A field that is a raw SQL expression (function call, wildcard, qualified name)
pub fn is_expression(name: &str) -> bool {
    name.contains(&['(', ')', '*', '.'][..])
}

/// How sibling predicates are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Logic {
    #[default]
    And,
    Or,
}

impl Logic {
    /// Separator placed between sibling clauses
    pub fn separator(&self) -> &'static str {
        match self {
            Logic::And => " AND ",
            Logic::Or => " OR ",
        }
    }
}

impl Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
        }
    }
}

/// Identifiers introduced as aliases while compiling one statement.
///
/// A registry lives for a single builder call and is never shared, so a
/// compiler can be used from many threads at once.
#[derive(Debug, Clone, Default)]
pub struct AliasRegistry {
    default_alias: String,
    aliases: HashSet<String>,
}

impl AliasRegistry {
    pub fn new(default_alias: &str) -> Self {
        Self {
            default_alias: default_alias.to_string(),
            aliases: HashSet::new(),
        }
    }

    pub fn default_alias(&self) -> &str {
        &self.default_alias
    }

    /// Record a quoted alias created by `-as`
    pub fn register(&mut self, quoted: String) {
        self.aliases.insert(quoted);
    }

    pub fn contains(&self, quoted: &str) -> bool {
        self.aliases.contains(quoted)
    }

    /// Prefix a quoted column with the default alias.
    ///
    /// Registered aliases and references that are already qualified come
    /// back unchanged, which makes the operation idempotent.
    pub fn add_alias(&self, quoted: &str) -> String {
        if self.contains(quoted) || quoted.contains('.') {
            return quoted.to_string();
        }
        format!("{}.{}", quote(&self.default_alias), quoted)
    }

    /// Render a column name: raw references pass through, bare names are
    /// quoted and, when `alias` is set, prefixed with the default alias.
    pub fn column(&self, name: &str, alias: bool) -> String {
        if is_qualified(name) {
            return name.to_string();
        }
        let quoted = quote(name);
        if alias {
            self.add_alias(&quoted)
        } else {
            quoted
        }
    }
}

/// A compiled statement: SQL text plus positional parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statement {
    text: String,
    params: Vec<Scalar>,
}

impl Statement {
    pub fn new(text: impl Into<String>, params: Vec<Scalar>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// Get the SQL text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the parameters in placeholder order
    pub fn params(&self) -> &[Scalar] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Scalar>) {
        (self.text, self.params)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of `?` markers in the text
    pub fn placeholder_count(&self) -> usize {
        self.text.matches('?').count()
    }

    /// Append another fragment's text and parameters
    pub fn push(&mut self, other: Statement) {
        self.text.push_str(&other.text);
        self.params.extend(other.params);
    }

    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Join sibling clauses and wrap a non-empty group in parentheses
pub(crate) fn group(clauses: &[String], logic: Logic) -> String {
    let sql = clauses.join(logic.separator());
    if sql.is_empty() {
        sql
    } else {
        format!("( {} )", sql)
    }
}
