use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "completado")]
    Completed,
    #[serde(rename = "fallo")]
    Failed,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Cannot parse '{input}' as {kind}")]
pub struct UnitParseError {
    input: String,
    kind: &'static str,
}

/// A whole-number percentage, serialized as `"30%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Percent(pub u32);

impl Percent {
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Percent {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_end_matches('%')
            .trim()
            .parse()
            .map(Percent)
            .map_err(|_| UnitParseError {
                input: s.to_string(),
                kind: "percentage",
            })
    }
}

impl TryFrom<String> for Percent {
    type Error = UnitParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Percent> for String {
    fn from(p: Percent) -> Self {
        p.to_string()
    }
}

/// A whole-degree temperature, serialized as `"65°C"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Celsius(pub u32);

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.0)
    }
}

impl FromStr for Celsius {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_end_matches("°C")
            .trim()
            .parse()
            .map(Celsius)
            .map_err(|_| UnitParseError {
                input: s.to_string(),
                kind: "temperature",
            })
    }
}

impl TryFrom<String> for Celsius {
    type Error = UnitParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Celsius> for String {
    fn from(c: Celsius) -> Self {
        c.to_string()
    }
}
