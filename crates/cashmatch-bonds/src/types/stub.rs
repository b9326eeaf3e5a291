//! First-period stub hints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BondError;

/// How an irregular first coupon period should be shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StubHint {
    /// First period is shorter than a regular period.
    #[serde(rename = "Short First")]
    ShortFirst,
    /// First period absorbs the short stub and the following regular period.
    #[serde(rename = "Long First")]
    LongFirst,
}

impl StubHint {
    /// Label used in cashflow notes.
    pub fn label(self) -> &'static str {
        match self {
            StubHint::ShortFirst => "Short First",
            StubHint::LongFirst => "Long First",
        }
    }
}

impl fmt::Display for StubHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StubHint {
    type Err = BondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "shortfirst" => Ok(StubHint::ShortFirst),
            "longfirst" => Ok(StubHint::LongFirst),
            _ => Err(BondError::invalid_bounds(format!("unknown stub hint '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!("Short First".parse::<StubHint>().unwrap(), StubHint::ShortFirst);
        assert_eq!("long_first".parse::<StubHint>().unwrap(), StubHint::LongFirst);
        assert!("Middle".parse::<StubHint>().is_err());
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&StubHint::LongFirst).unwrap();
        assert_eq!(json, "\"Long First\"");
        let back: StubHint = serde_json::from_str("\"Short First\"").unwrap();
        assert_eq!(back, StubHint::ShortFirst);
    }
}
