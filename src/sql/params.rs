//! Typed query parameters and binding onto sqlx queries.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{Query, QueryAs};
use uuid::Uuid;

/// A value bound to a roster query. Each variant binds with its native PostgreSQL type
/// so `uuid` columns compare against `uuid` parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Bool(bool),
    Text(String),
    Uuid(Uuid),
}

impl From<bool> for BindValue {
    fn from(b: bool) -> Self {
        BindValue::Bool(b)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::Text(s.to_string())
    }
}

impl From<Uuid> for BindValue {
    fn from(u: Uuid) -> Self {
        BindValue::Uuid(u)
    }
}

pub fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = match p {
            BindValue::Bool(b) => query.bind(*b),
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Uuid(u) => query.bind(*u),
        };
    }
    query
}

pub fn bind_all_as<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for p in params {
        query = match p {
            BindValue::Bool(b) => query.bind(*b),
            BindValue::Text(s) => query.bind(s.as_str()),
            BindValue::Uuid(u) => query.bind(*u),
        };
    }
    query
}
