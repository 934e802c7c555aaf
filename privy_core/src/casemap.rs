//! IRC casemapping, the rules a network uses to decide whether two nicknames
//! or channel names are the same.
//!
//! Every key stored in the privilege table goes through
//! [Casemapping::normalize] first.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Casemapping {
    /// only `A-Z` fold to `a-z`
    Ascii,
    /// `A-Z` plus `[]\~` fold to `a-z` and `{}|^`, the default of most networks
    #[default]
    Rfc1459,
    /// like [Rfc1459](Self::Rfc1459) but `~` and `^` stay distinct
    StrictRfc1459,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown casemapping \"{0}\"")]
pub struct CasemappingError(pub String);

impl Casemapping {
    pub const fn lower_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => c.to_ascii_lowercase(),
            (Self::Rfc1459 | Self::StrictRfc1459, '[') => '{',
            (Self::Rfc1459 | Self::StrictRfc1459, ']') => '}',
            (Self::Rfc1459 | Self::StrictRfc1459, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// the key a nickname or channel is stored under
    pub fn normalize(self, name: &str) -> String {
        name.chars().map(|c| self.lower_char(c)).collect()
    }

    pub fn eq(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && a.chars()
                .zip(b.chars())
                .all(|(ca, cb)| self.lower_char(ca) == self.lower_char(cb))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Rfc1459 => "rfc1459",
            Self::StrictRfc1459 => "strict-rfc1459",
        }
    }
}

impl FromStr for Casemapping {
    type Err = CasemappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "rfc1459" => Ok(Self::Rfc1459),
            "strict-rfc1459" => Ok(Self::StrictRfc1459),
            _ => Err(CasemappingError(s.to_owned())),
        }
    }
}

impl Display for Casemapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
