//! Bombsite identifiers

use std::fmt;
use std::str::FromStr;

/// One of the two bombsites on a defuse map
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bombsite {
    A = 0,
    B = 1,
}

impl Bombsite {
    /// Both sites, in index order
    pub const ALL: [Bombsite; 2] = [Bombsite::A, Bombsite::B];

    /// Single-letter token used in commands and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// Site from the engine's event index (A=0, B=1)
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::A),
            1 => Some(Self::B),
            _ => None,
        }
    }
}

impl fmt::Display for Bombsite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token is neither `A` nor `B`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBombsiteError(pub String);

impl fmt::Display for ParseBombsiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid bombsite '{}', expected A or B", self.0)
    }
}

impl std::error::Error for ParseBombsiteError {}

impl FromStr for Bombsite {
    type Err = ParseBombsiteError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(ParseBombsiteError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("a".parse::<Bombsite>(), Ok(Bombsite::A));
        assert_eq!("B".parse::<Bombsite>(), Ok(Bombsite::B));
        assert_eq!(" b ".parse::<Bombsite>(), Ok(Bombsite::B));
        assert!("C".parse::<Bombsite>().is_err());
        assert!("".parse::<Bombsite>().is_err());
        assert!("AB".parse::<Bombsite>().is_err());
    }

    #[test]
    fn test_from_index() {
        assert_eq!(Bombsite::from_index(0), Some(Bombsite::A));
        assert_eq!(Bombsite::from_index(1), Some(Bombsite::B));
        assert_eq!(Bombsite::from_index(2), None);
    }
}
