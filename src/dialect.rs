use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Database dialect a Drizzle schema file is written against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Best-effort classification of a schema source buffer.
    ///
    /// Detection is advisory: it feeds the conversion report but never gates
    /// rule application, so running the converter over already-converted
    /// output still exercises every rule.
    pub fn detect(source: &str) -> Option<Dialect> {
        if source.contains("drizzle-orm/pg-core") || source.contains("pgTable") {
            return Some(Dialect::Postgres);
        }
        if source.contains("drizzle-orm/sqlite-core") || source.contains("sqliteTable") {
            return Some(Dialect::Sqlite);
        }
        None
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Postgres => write!(f, "postgresql"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Dialect::Postgres),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(DialectError::UnknownDialect(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum DialectError {
    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),
}
