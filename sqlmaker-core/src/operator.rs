//! Comparison operators emitted by the predicate compiler

use std::borrow::Cow;
use std::fmt::{self, Display};

/// SQL comparison operator
///
/// The built-in operators come from directives (`-in`, `-between`) or the
/// scalar shorthand (`=`). Any other operator key in a predicate map is
/// emitted verbatim through [`Operator::raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator(Cow<'static, str>);

impl Operator {
    pub const EQ: Self = Operator(Cow::Borrowed("="));
    pub const IN: Self = Operator(Cow::Borrowed("IN"));
    pub const BETWEEN: Self = Operator(Cow::Borrowed("BETWEEN"));

    /// Wrap a caller-supplied operator such as `<`, `>=` or `LIKE`
    ///
    /// # Examples
    /// ```
    /// use sqlmaker_core::Operator;
    ///
    /// let lt = Operator::raw("<");
    /// assert_eq!(lt.as_str(), "<");
    /// ```
    pub fn raw(op: impl Into<String>) -> Self {
        Operator(Cow::Owned(op.into()))
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder text for an operand of `count` values
    pub fn placeholder(&self, count: usize) -> String {
        if *self == Operator::IN {
            format!("( {} )", vec!["?"; count].join(","))
        } else if *self == Operator::BETWEEN {
            "? AND ?".to_string()
        } else {
            "?".to_string()
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
