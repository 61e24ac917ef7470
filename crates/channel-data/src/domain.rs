//! Unit Domain (primary / secondary side of the instrument transformer)

use crate::error::ChannelDataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of the CT/VT a value is expressed on.
///
/// Used both for the flag a recorder stores with each channel and for the
/// domain a caller asks the pipeline to return. Parsing is case-insensitive
/// and accepts the recorder letters (`P`, `S`) as well as the long aliases
/// (`primary`/`prim`, `secondary`/`sec`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UnitDomain {
    /// High-voltage / high-current side
    #[default]
    Primary,
    /// Instrument / meter side
    Secondary,
}

impl UnitDomain {
    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitDomain::Primary => "primary",
            UnitDomain::Secondary => "secondary",
        }
    }

    /// The other side of the transformer
    pub fn opposite(&self) -> Self {
        match self {
            UnitDomain::Primary => UnitDomain::Secondary,
            UnitDomain::Secondary => UnitDomain::Primary,
        }
    }
}

impl FromStr for UnitDomain {
    type Err = ChannelDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "p" | "prim" | "primary" => Ok(UnitDomain::Primary),
            "s" | "sec" | "secondary" => Ok(UnitDomain::Secondary),
            _ => Err(ChannelDataError::InvalidDomainFlag(s.to_string())),
        }
    }
}

impl TryFrom<String> for UnitDomain {
    type Error = ChannelDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UnitDomain> for String {
    fn from(domain: UnitDomain) -> Self {
        domain.as_str().to_string()
    }
}

impl fmt::Display for UnitDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        for flag in ["P", "p", "prim", "PRIMARY", " Primary "] {
            assert_eq!(flag.parse::<UnitDomain>().unwrap(), UnitDomain::Primary);
        }
        for flag in ["S", "s", "sec", "SEC", "Secondary"] {
            assert_eq!(flag.parse::<UnitDomain>().unwrap(), UnitDomain::Secondary);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        for flag in ["", "x", "prime", "second", "ps"] {
            let err = flag.parse::<UnitDomain>().unwrap_err();
            assert_eq!(err, ChannelDataError::InvalidDomainFlag(flag.to_string()));
        }
    }

    #[test]
    fn test_display_round_trips() {
        for domain in [UnitDomain::Primary, UnitDomain::Secondary] {
            assert_eq!(domain.to_string().parse::<UnitDomain>().unwrap(), domain);
            assert_eq!(domain.opposite().opposite(), domain);
        }
    }
}
