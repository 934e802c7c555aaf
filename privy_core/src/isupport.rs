//! The parts of `RPL_ISUPPORT` (numeric 005) that privilege tracking depends
//! on: `PREFIX`, `CHANMODES`, `CHANTYPES` and `CASEMAPPING`.

use std::fmt::Display;

use smallvec::SmallVec;

use crate::{casemap::Casemapping, mode::ModeSign, privilege::PrivilegeLevel};

pub const DEFAULT_PREFIX: &str = "(qaohv)~&@%+";
pub const DEFAULT_CHANMODES: &str = "beI,k,l,imnpst";
pub const DEFAULT_CHANTYPES: &str = "#&";

/// a single 005 token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ISupportToken<'a> {
    /// `KEY` or `KEY=VALUE`
    Set { key: &'a str, value: Option<&'a str> },
    /// `-KEY`
    Unset { key: &'a str },
}

impl<'a> ISupportToken<'a> {
    pub fn parse(token: &'a str) -> Option<Self> {
        if let Some(key) = token.strip_prefix('-') {
            return (!key.is_empty()).then_some(Self::Unset { key });
        }
        match token.split_once('=') {
            Some(("", _)) => None,
            Some((key, value)) => Some(Self::Set {
                key,
                value: Some(value),
            }),
            None if token.is_empty() => None,
            None => Some(Self::Set { key: token, value: None }),
        }
    }
}

/// Maps prefix mode letters to the symbols shown in front of nicknames, in
/// the server's order (highest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMap {
    modes: SmallVec<[(char, char); 8]>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        // the default is well formed
        Self::parse(DEFAULT_PREFIX).unwrap_or(Self {
            modes: SmallVec::new(),
        })
    }
}

impl PrefixMap {
    /// parses a `PREFIX` value such as `(ov)@+`, an empty value means the
    /// network has no prefix modes at all
    pub fn parse(value: &str) -> Option<Self> {
        if value.is_empty() {
            return Some(Self {
                modes: SmallVec::new(),
            });
        }
        let (letters, symbols) = value.strip_prefix('(')?.split_once(')')?;
        if letters.chars().count() != symbols.chars().count() {
            return None;
        }
        Some(Self {
            modes: letters.chars().zip(symbols.chars()).collect(),
        })
    }

    pub fn is_prefix_mode(&self, mode: char) -> bool {
        self.modes.iter().any(|(m, _)| *m == mode)
    }

    pub fn symbol_for_mode(&self, mode: char) -> Option<char> {
        self.modes.iter().find(|(m, _)| *m == mode).map(|(_, s)| *s)
    }

    pub fn mode_for_symbol(&self, symbol: char) -> Option<char> {
        self.modes.iter().find(|(_, s)| *s == symbol).map(|(m, _)| *m)
    }

    /// the privilege flag behind a prefix symbol, `None` for symbols the
    /// network doesn't advertise or whose letter has no privilege level
    pub fn level_for_symbol(&self, symbol: char) -> Option<PrivilegeLevel> {
        self.mode_for_symbol(symbol)
            .and_then(PrivilegeLevel::from_mode_char)
    }

    /// splits a `NAMES` entry like `@+alice` into its privileges and the
    /// nickname, every leading advertised symbol is consumed
    pub fn split_nick<'a>(&self, entry: &'a str) -> (PrivilegeLevel, &'a str) {
        let mut level = PrivilegeLevel::NONE;
        let mut rest = entry;
        while let Some(c) = rest.chars().next() {
            if self.mode_for_symbol(c).is_none() {
                break;
            }
            if let Some(flag) = self.level_for_symbol(c) {
                level = level.grant(flag);
            }
            rest = &rest[c.len_utf8()..];
        }
        (level, rest)
    }
}

impl Display for PrefixMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modes.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (mode, _) in &self.modes {
            write!(f, "{mode}")?;
        }
        f.write_str(")")?;
        for (_, symbol) in &self.modes {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

/// The four `CHANMODES` groups, which decide whether a mode letter consumes
/// an argument from a MODE line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelModes {
    /// type A, list modes like bans, always take an argument
    pub list: String,
    /// type B, always take an argument
    pub always: String,
    /// type C, only take an argument when set
    pub on_set: String,
    /// type D, never take an argument
    pub never: String,
}

impl Default for ChannelModes {
    fn default() -> Self {
        Self::parse(DEFAULT_CHANMODES)
    }
}

impl ChannelModes {
    /// parses a `CHANMODES` value, missing groups are empty and groups past
    /// the fourth are ignored
    pub fn parse(value: &str) -> Self {
        let mut groups = value.split(',').map(String::from);
        Self {
            list: groups.next().unwrap_or_default(),
            always: groups.next().unwrap_or_default(),
            on_set: groups.next().unwrap_or_default(),
            never: groups.next().unwrap_or_default(),
        }
    }

    /// whether `mode` consumes an argument; prefix modes always do and
    /// letters the network never advertised are treated as type D
    pub fn takes_arg(&self, mode: char, sign: ModeSign, prefixes: &PrefixMap) -> bool {
        prefixes.is_prefix_mode(mode)
            || self.list.contains(mode)
            || self.always.contains(mode)
            || (sign == ModeSign::Grant && self.on_set.contains(mode))
    }
}

impl Display for ChannelModes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.list, self.always, self.on_set, self.never)
    }
}

/// what the tracker knows about the network it is connected to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkFeatures {
    pub prefixes: PrefixMap,
    pub chanmodes: ChannelModes,
    pub chantypes: String,
    pub casemapping: Casemapping,
}

impl Default for NetworkFeatures {
    fn default() -> Self {
        Self {
            prefixes: PrefixMap::default(),
            chanmodes: ChannelModes::default(),
            chantypes: DEFAULT_CHANTYPES.to_owned(),
            casemapping: Casemapping::default(),
        }
    }
}

impl NetworkFeatures {
    pub fn is_channel(&self, target: &str) -> bool {
        target
            .chars()
            .next()
            .is_some_and(|c| self.chantypes.contains(c))
    }

    pub fn takes_arg(&self, mode: char, sign: ModeSign) -> bool {
        self.chanmodes.takes_arg(mode, sign, &self.prefixes)
    }

    /// updates the known features from a single 005 token, returns whether
    /// anything changed. Malformed values are ignored.
    pub fn apply_token(&mut self, token: ISupportToken<'_>) -> bool {
        match token {
            ISupportToken::Set {
                key: "PREFIX",
                value,
            } => match PrefixMap::parse(value.unwrap_or_default()) {
                Some(prefixes) => {
                    let changed = prefixes != self.prefixes;
                    self.prefixes = prefixes;
                    changed
                }
                None => {
                    log::warn!("ignoring malformed PREFIX token: {value:?}");
                    false
                }
            },
            ISupportToken::Set {
                key: "CHANMODES",
                value: Some(value),
            } => {
                let chanmodes = ChannelModes::parse(value);
                let changed = chanmodes != self.chanmodes;
                self.chanmodes = chanmodes;
                changed
            }
            ISupportToken::Set {
                key: "CHANTYPES",
                value,
            } => {
                let chantypes = value.unwrap_or_default().to_owned();
                let changed = chantypes != self.chantypes;
                self.chantypes = chantypes;
                changed
            }
            ISupportToken::Set {
                key: "CASEMAPPING",
                value: Some(value),
            } => match value.parse::<Casemapping>() {
                Ok(casemapping) => {
                    let changed = casemapping != self.casemapping;
                    self.casemapping = casemapping;
                    changed
                }
                Err(e) => {
                    log::debug!("{e}, keeping {}", self.casemapping);
                    false
                }
            },
            ISupportToken::Unset { key: "PREFIX" } => {
                let changed = self.prefixes != PrefixMap::default();
                self.prefixes = PrefixMap::default();
                changed
            }
            ISupportToken::Unset { key: "CHANMODES" } => {
                let changed = self.chanmodes != ChannelModes::default();
                self.chanmodes = ChannelModes::default();
                changed
            }
            _ => false,
        }
    }
}
