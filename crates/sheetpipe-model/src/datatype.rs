//! Declared column types and their cast representations.
//!
//! A [`DeclaredType`] is what a user writes in configuration. A [`CastType`]
//! is what the transform and warehouse layers actually operate on; the two
//! differ only for `numeric`, which is pinned to a fixed precision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Precision used for every `numeric` column.
pub const NUMERIC_PRECISION: u8 = 38;
/// Scale used for every `numeric` column.
pub const NUMERIC_SCALE: u8 = 18;

/// Abstract column type accepted in sheet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredType {
    Int,
    Varchar,
    Numeric,
    Boolean,
    TimestampNtz,
    Date,
}

impl DeclaredType {
    pub const ALL: [DeclaredType; 6] = [
        DeclaredType::Int,
        DeclaredType::Varchar,
        DeclaredType::Numeric,
        DeclaredType::Boolean,
        DeclaredType::TimestampNtz,
        DeclaredType::Date,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeclaredType::Int => "int",
            DeclaredType::Varchar => "varchar",
            DeclaredType::Numeric => "numeric",
            DeclaredType::Boolean => "boolean",
            DeclaredType::TimestampNtz => "timestamp_ntz",
            DeclaredType::Date => "date",
        }
    }

    /// Recode into the representation handed to the caster.
    pub fn cast_type(self) -> CastType {
        match self {
            DeclaredType::Int => CastType::Int,
            DeclaredType::Varchar => CastType::Varchar,
            DeclaredType::Numeric => CastType::Decimal {
                precision: NUMERIC_PRECISION,
                scale: NUMERIC_SCALE,
            },
            DeclaredType::Boolean => CastType::Boolean,
            DeclaredType::TimestampNtz => CastType::TimestampNtz,
            DeclaredType::Date => CastType::Date,
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclaredType {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        DeclaredType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::UnsupportedDataType(vec![value.to_string()]))
    }
}

/// Concrete type a column is cast to before load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastType {
    /// Integers travel as text so nulls and mixed input survive the trip.
    Int,
    Varchar,
    Decimal { precision: u8, scale: u8 },
    Boolean,
    TimestampNtz,
    /// Stored as a timestamp at midnight.
    Date,
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastType::Int => f.write_str("int"),
            CastType::Varchar => f.write_str("varchar"),
            CastType::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            CastType::Boolean => f.write_str("boolean"),
            CastType::TimestampNtz => f.write_str("timestamp_ntz"),
            CastType::Date => f.write_str("date"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_declared_type() {
        for kind in DeclaredType::ALL {
            assert_eq!(kind.as_str().parse::<DeclaredType>(), Ok(kind));
        }
        assert_eq!(" Boolean ".parse::<DeclaredType>(), Ok(DeclaredType::Boolean));
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "money".parse::<DeclaredType>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported datatype(s): money");
    }

    #[test]
    fn numeric_is_recoded_to_fixed_precision() {
        assert_eq!(
            DeclaredType::Numeric.cast_type(),
            CastType::Decimal {
                precision: 38,
                scale: 18
            }
        );
        assert_eq!(DeclaredType::Int.cast_type(), CastType::Int);
    }
}
