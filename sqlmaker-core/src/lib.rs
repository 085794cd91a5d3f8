//! SQLMaker Core - compiles loosely structured query descriptions into
//! parameterized MySQL statements
//!
//! Callers describe a statement with plain data (usually decoded from JSON)
//! and get back SQL text with `?` placeholders plus the values to bind, in
//! order. Identifiers are quoted with backticks; values never appear in
//! the text.
//!
//! ```
//! use sqlmaker_core::{ClauseOptions, Maker, Value};
//! use serde_json::json;
//!
//! let maker = Maker::new();
//! let filter = Value::try_from(json!({ "id": { "<": 100 }, "name": "dummy" })).unwrap();
//! let options = ClauseOptions::new().order_by(vec!["id"]).limit(5);
//!
//! let stmt = maker
//!     .select(&Value::from("user"), None, Some(&filter), Some(&options))
//!     .unwrap();
//! assert_eq!(
//!     stmt.text(),
//!     "SELECT * FROM `user` `me` WHERE ( `me`.`id` < ? AND `me`.`name` = ? ) ORDER BY `me`.`id` LIMIT 5"
//! );
//! assert_eq!(stmt.params().len(), 2);
//! ```

pub mod builder;
pub mod directive;
pub mod error;
pub mod maker;
pub mod operator;
pub mod value;

#[cfg(feature = "mysql")]
mod binding;

// Re-export main types
pub use builder::{quote, AliasRegistry, ClauseOptions, Logic, Statement};
pub use directive::Directive;
pub use error::{Error, Result};
pub use maker::Maker;
pub use operator::Operator;
pub use value::{KeyedMap, Scalar, Shape, Value};
