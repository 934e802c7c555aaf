//! Channel MODE changes as an ordered list of `(sign, letter, target)`
//! triples.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::isupport::NetworkFeatures;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeSign {
    /// `+`
    Grant,
    /// `-`
    Revoke,
}

impl ModeSign {
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Grant),
            '-' => Some(Self::Revoke),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Grant => '+',
            Self::Revoke => '-',
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub sign: ModeSign,
    pub mode: char,
    /// the argument paired with this letter, `None` when the letter takes
    /// none or the line ran out of arguments
    pub target: Option<String>,
}

impl ModeChange {
    pub fn new(sign: ModeSign, mode: char, target: Option<impl Into<String>>) -> Self {
        Self {
            sign,
            mode,
            target: target.map(Into::into),
        }
    }
}

impl Display for ModeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.sign.as_char(), self.mode)?;
        if let Some(target) = &self.target {
            write!(f, " {target}")?;
        }
        Ok(())
    }
}

/// every change carried by one MODE line, in the order the server sent them
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeEvent {
    pub channel: String,
    pub changes: Vec<ModeChange>,
}

impl ModeEvent {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            changes: Vec::new(),
        }
    }

    pub fn with_change(mut self, sign: ModeSign, mode: char, target: Option<&str>) -> Self {
        self.changes.push(ModeChange::new(sign, mode, target));
        self
    }

    /// Pairs the letters of `modestring` with `args` positionally.
    ///
    /// Only letters that consume an argument on this network (see
    /// [ChannelModes::takes_arg](crate::isupport::ChannelModes::takes_arg))
    /// take one from `args`, so `+bo *!*@spam alice` gives the op to alice.
    /// When the arguments run out the remaining argument-taking letters get
    /// no target, and leftover arguments are dropped.
    pub fn parse<'a>(
        channel: impl Into<String>,
        modestring: &str,
        args: impl IntoIterator<Item = &'a str>,
        features: &NetworkFeatures,
    ) -> Self {
        let mut event = Self::new(channel);
        let mut args = args.into_iter();
        let mut sign = ModeSign::Grant;

        for c in modestring.chars() {
            if let Some(new_sign) = ModeSign::from_char(c) {
                sign = new_sign;
                continue;
            }
            let target = if features.takes_arg(c, sign) {
                let arg = args.next();
                if arg.is_none() {
                    log::debug!(
                        "{}: mode {}{c} is missing its argument",
                        event.channel,
                        sign.as_char()
                    );
                }
                arg
            } else {
                None
            };
            event.changes.push(ModeChange::new(sign, c, target));
        }

        let leftover = args.count();
        if leftover > 0 {
            log::debug!("{}: dropped {leftover} unused mode arguments", event.channel);
        }

        event
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
