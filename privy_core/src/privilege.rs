#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

bitflags::bitflags! {
    /// A user's privileges inside a single channel.
    ///
    /// Every level is an independent bit, so a user can be both voiced and
    /// owner at the same time without holding halfop, op or admin. The bits
    /// are laid out in rank order, which means comparing two values with
    /// `<`/`>` compares the rank of their highest flag first.
    ///
    /// Prefer the named comparisons ([has_flag](Self::has_flag),
    /// [at_least](Self::at_least), [equals](Self::equals)) over raw operators
    /// to make it obvious which of the two semantics a check relies on.
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct PrivilegeLevel: u8 {
        const VOICE = 1;
        const HALFOP = 1 << 1;
        const OP = 1 << 2;
        const ADMIN = 1 << 3;
        const OWNER = 1 << 4;
    }
}

/// every named flag, lowest rank first
static LEVELS: [(PrivilegeLevel, char, char, &str); 5] = [
    (PrivilegeLevel::VOICE, 'v', '+', "voice"),
    (PrivilegeLevel::HALFOP, 'h', '%', "halfop"),
    (PrivilegeLevel::OP, 'o', '@', "op"),
    (PrivilegeLevel::ADMIN, 'a', '&', "admin"),
    (PrivilegeLevel::OWNER, 'q', '~', "owner"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a privilege level, expected one of none, voice, halfop, op, admin or owner")]
pub struct ParsePrivilegeError(pub String);

impl PrivilegeLevel {
    /// no privileges at all, the state of every user the table has never
    /// seen a grant for
    pub const NONE: PrivilegeLevel = PrivilegeLevel::empty();

    /// returns `self` with `flag` set
    #[must_use]
    pub const fn grant(self, flag: PrivilegeLevel) -> Self {
        self.union(flag)
    }

    /// returns `self` with `flag` cleared
    #[must_use]
    pub const fn revoke(self, flag: PrivilegeLevel) -> Self {
        self.difference(flag)
    }

    /// whether any bit of `flag` is set in `self`, regardless of rank.
    ///
    /// An operator that was never voiced returns `false` for
    /// `has_flag(VOICE)`, use [at_least](Self::at_least) for "voice or
    /// above" checks.
    pub const fn has_flag(self, flag: PrivilegeLevel) -> bool {
        self.intersects(flag)
    }

    /// whether the highest flag of `self` ranks at or above the highest flag
    /// of `flag`
    pub const fn at_least(self, flag: PrivilegeLevel) -> bool {
        self.rank() >= flag.rank()
    }

    /// whether both values hold exactly the same set of flags
    pub const fn equals(self, other: PrivilegeLevel) -> bool {
        self.bits() == other.bits()
    }

    /// 0 for [NONE](Self::NONE), 1 for voice up to 5 for owner
    pub const fn rank(self) -> u8 {
        (u8::BITS - (self.bits() & Self::all().bits()).leading_zeros()) as u8
    }

    /// only the highest flag of `self`
    pub const fn highest(self) -> Self {
        match self.rank() {
            0 => Self::NONE,
            rank => Self::from_bits_truncate(1 << (rank - 1)),
        }
    }

    /// the channel mode letter of this level, for combined levels the one
    /// of the highest flag
    pub fn mode_char(self) -> Option<char> {
        let highest = self.highest();
        LEVELS
            .iter()
            .find(|(level, ..)| *level == highest)
            .map(|(_, mode, ..)| *mode)
    }

    /// the nickname prefix symbol of this level, for combined levels the one
    /// of the highest flag
    pub fn prefix_symbol(self) -> Option<char> {
        let highest = self.highest();
        LEVELS
            .iter()
            .find(|(level, ..)| *level == highest)
            .map(|(_, _, symbol, _)| *symbol)
    }

    /// maps a channel mode letter (`v`, `h`, `o`, `a`, `q`) to its flag
    pub fn from_mode_char(mode: char) -> Option<Self> {
        LEVELS
            .iter()
            .find(|(_, c, ..)| *c == mode)
            .map(|(level, ..)| *level)
    }

    /// maps a nickname prefix symbol (`+`, `%`, `@`, `&`, `~`) to its flag
    pub fn from_prefix_symbol(symbol: char) -> Option<Self> {
        LEVELS
            .iter()
            .find(|(_, _, s, _)| *s == symbol)
            .map(|(level, ..)| *level)
    }

    /// the flags held, highest rank first
    pub fn flags_descending(self) -> impl Iterator<Item = PrivilegeLevel> {
        LEVELS
            .iter()
            .rev()
            .map(|(level, ..)| *level)
            .filter(move |level| self.has_flag(*level))
    }

    /// lowercase name of the highest flag, `"none"` when empty
    pub fn name(self) -> &'static str {
        let highest = self.highest();
        LEVELS
            .iter()
            .find(|(level, ..)| *level == highest)
            .map(|(.., name)| *name)
            .unwrap_or("none")
    }
}

/// prefix symbols of every held flag, highest first, so `OWNER | VOICE`
/// displays as `~+`
impl Display for PrivilegeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for flag in self.flags_descending() {
            if let Some(symbol) = flag.prefix_symbol() {
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for PrivilegeLevel {
    type Err = ParsePrivilegeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "none" | "" => Ok(Self::NONE),
            "voice" | "voiced" | "v" => Ok(Self::VOICE),
            "halfop" | "h" => Ok(Self::HALFOP),
            "op" | "oper" | "o" => Ok(Self::OP),
            "admin" | "a" => Ok(Self::ADMIN),
            "owner" | "founder" | "q" => Ok(Self::OWNER),
            _ => Err(ParsePrivilegeError(s.to_owned())),
        }
    }
}
