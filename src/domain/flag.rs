//! Boolean column flag.
//!
//! Task and todo flags (`archived`, `checked`, `pinned`) are stored as
//! `TINYINT`/`INTEGER` columns and exchanged with clients as `0`/`1`.
//! Incoming values may be JSON numbers, JSON booleans, or the raw string
//! segments taken from a request path.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A string that is not one of `0`, `1`, `true` or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("flag must be 0, 1, true or false, got '{0}'")]
pub struct ParseFlagError(String);

/// A `0`/`1` flag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flag(bool);

impl Flag {
    /// The unset flag (`0`). New rows start with every flag unset.
    pub const UNSET: Self = Self(false);

    /// The set flag (`1`).
    pub const SET: Self = Self(true);

    #[must_use]
    pub const fn new(value: bool) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0
    }

    /// Returns the value bound into SQL statements.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        i64::from(self.0)
    }

    /// Reads a flag from a string-only source such as a path segment.
    ///
    /// # Errors
    ///
    /// Fails unless the text parses with [`Flag::from_str`].
    pub fn deserialize_segment<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let segment = String::deserialize(deserializer)?;
        segment.parse().map_err(de::Error::custom)
    }
}

impl FromStr for Flag {
    type Err = ParseFlagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "0" | "false" => Ok(Self::UNSET),
            "1" | "true" => Ok(Self::SET),
            other => Err(ParseFlagError(other.to_string())),
        }
    }
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

/// Any non-zero column value reads as set.
impl From<i64> for Flag {
    fn from(value: i64) -> Self {
        Self(value != 0)
    }
}

impl From<Flag> for i64 {
    fn from(flag: Flag) -> Self {
        flag.as_i64()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.as_i64())
    }
}

impl Serialize for Flag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlagVisitor)
    }
}

struct FlagVisitor;

impl FlagVisitor {
    fn from_integer<E: de::Error>(value: i128) -> Result<Flag, E> {
        match value {
            0 => Ok(Flag::UNSET),
            1 => Ok(Flag::SET),
            other => Err(E::custom(format!("flag must be 0 or 1, got {other}"))),
        }
    }
}

impl Visitor<'_> for FlagVisitor {
    type Value = Flag;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("0, 1, true or false")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Flag, E> {
        Ok(Flag(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Flag, E> {
        Self::from_integer(i128::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Flag, E> {
        Self::from_integer(i128::from(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Flag, E> {
        value
            .parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
    }
}
