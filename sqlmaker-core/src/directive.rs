//! Directive keys recognised inside keyed maps
//!
//! A map key starting with `-` is a directive rather than a column, table
//! or function name. Keys are resolved here once; the compilers match on
//! the resulting enum.

use crate::{Error, Result};
use std::fmt::{self, Display};

/// A `-xxx` directive key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `-as`: column alias in a field map
    As,
    /// `-and`: group predicates with AND
    And,
    /// `-or`: group predicates with OR
    Or,
    /// `-in`: membership test in a predicate
    In,
    /// `-between`: inclusive range in a predicate
    Between,
    /// `-inner`: INNER JOIN target
    Inner,
    /// `-left`: LEFT JOIN target
    Left,
    /// `-on`: join condition
    On,
    /// `-asc`: ascending sort
    Asc,
    /// `-desc`: descending sort
    Desc,
}

impl Directive {
    const ALL: [Directive; 10] = [
        Directive::As,
        Directive::And,
        Directive::Or,
        Directive::In,
        Directive::Between,
        Directive::Inner,
        Directive::Left,
        Directive::On,
        Directive::Asc,
        Directive::Desc,
    ];

    /// The canonical key, including the leading dash
    pub fn key(&self) -> &'static str {
        match self {
            Directive::As => "-as",
            Directive::And => "-and",
            Directive::Or => "-or",
            Directive::In => "-in",
            Directive::Between => "-between",
            Directive::Inner => "-inner",
            Directive::Left => "-left",
            Directive::On => "-on",
            Directive::Asc => "-asc",
            Directive::Desc => "-desc",
        }
    }

    /// The SQL keyword the directive renders as
    pub fn keyword(&self) -> &'static str {
        match self {
            Directive::As => "AS",
            Directive::And => "AND",
            Directive::Or => "OR",
            Directive::In => "IN",
            Directive::Between => "BETWEEN",
            Directive::Inner => "INNER",
            Directive::Left => "LEFT",
            Directive::On => "ON",
            Directive::Asc => "ASC",
            Directive::Desc => "DESC",
        }
    }

    /// Resolve a map key.
    ///
    /// Returns `Ok(None)` for keys that do not start with `-` (ordinary
    /// names), and an error for dash-prefixed keys that name no directive.
    ///
    /// # Examples
    /// ```
    /// use sqlmaker_core::Directive;
    ///
    /// assert_eq!(Directive::parse("-DESC").unwrap(), Some(Directive::Desc));
    /// assert_eq!(Directive::parse("name").unwrap(), None);
    /// assert!(Directive::parse("-nope").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Option<Directive>> {
        if !key.starts_with('-') {
            return Ok(None);
        }
        Self::ALL
            .iter()
            .find(|d| d.key().eq_ignore_ascii_case(key))
            .copied()
            .map(Some)
            .ok_or_else(|| Error::unknown_type(format!("unknown directive '{}'", key)))
    }

    /// Error for a directive used where it has no meaning
    pub(crate) fn misplaced(&self, context: &str) -> Error {
        Error::unknown_type(format!("directive '{}' is not allowed in {}", self.key(), context))
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
