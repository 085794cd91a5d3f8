//! Hand-off of compiled statements to sqlx (feature `mysql`)

use crate::{Scalar, Statement};
use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;

impl Statement {
    /// Turn the statement into a sqlx query with every parameter bound in
    /// placeholder order. Executing it is up to the caller.
    pub fn to_query(&self) -> Query<'_, MySql, MySqlArguments> {
        bind_scalars(sqlx::query(self.text()), self.params())
    }
}

fn bind_scalars<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Scalar],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            Scalar::Null => query.bind(None::<String>),
            Scalar::Bool(b) => query.bind(*b),
            Scalar::Int(i) => query.bind(*i),
            Scalar::String(s) => query.bind(s.as_str()),
        };
    }
    query
}
