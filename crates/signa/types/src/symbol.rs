use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SymbolError;

/// One member of the closed gesture alphabet.
///
/// "No gesture" is never a `Symbol`; it is modelled as `Option::<Symbol>::None`
/// wherever a raw classification may be absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    A,
    B,
    C,
    D,
}

impl Symbol {
    /// Every symbol, in alphabet order.
    pub const ALL: [Symbol; 4] = [Symbol::A, Symbol::B, Symbol::C, Symbol::D];

    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    /// Map a letter to a symbol. Case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    /// Parse a literal such as `"ACACAC"` into a symbol sequence.
    ///
    /// Whitespace is ignored; any other non-alphabet character is rejected.
    pub fn parse_sequence(literal: &str) -> Result<Vec<Self>, SymbolError> {
        let symbols = literal
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Self::from_char(c).ok_or(SymbolError::Unknown(c)))
            .collect::<Result<Vec<_>, _>>()?;
        if symbols.is_empty() {
            return Err(SymbolError::EmptySequence);
        }
        Ok(symbols)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or(SymbolError::Unknown(c)),
            (None, _) => Err(SymbolError::EmptySequence),
            (Some(_), Some(c)) => Err(SymbolError::Unknown(c)),
        }
    }
}

/// Render a symbol sequence as its compact literal (`[A, B, C]` -> `"ABC"`).
pub fn render_sequence(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.as_char()).collect()
}

/// Serde adapter storing a symbol sequence as its literal string.
pub mod literal {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{render_sequence, Symbol};

    pub fn serialize<S: Serializer>(symbols: &[Symbol], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&render_sequence(symbols))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Symbol>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Symbol::parse_sequence(&raw).map_err(de::Error::custom)
    }
}
