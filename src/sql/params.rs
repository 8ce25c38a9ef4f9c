//! Bind values for builder-produced queries.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a `$n` placeholder. Each variant reports its own PostgreSQL type,
/// and the builder adds an explicit cast to the target column type.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i32> for SqlParam {
    fn from(n: i32) -> Self {
        SqlParam::Int(n as i64)
    }
}

impl From<f64> for SqlParam {
    fn from(n: f64) -> Self {
        SqlParam::Float(n)
    }
}

impl From<&str> for SqlParam {
    fn from(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }
}

impl From<Option<String>> for SqlParam {
    fn from(s: Option<String>) -> Self {
        s.map(SqlParam::Text).unwrap_or(SqlParam::Null)
    }
}

impl<'q> Encode<'q, Postgres> for SqlParam {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            SqlParam::Null => Ok(IsNull::Yes),
            SqlParam::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            SqlParam::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf),
            SqlParam::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlParam::Null | SqlParam::Text(_) => <String as Type<Postgres>>::type_info(),
            SqlParam::Int(_) => <i64 as Type<Postgres>>::type_info(),
            SqlParam::Float(_) => <f64 as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for SqlParam {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }
}
