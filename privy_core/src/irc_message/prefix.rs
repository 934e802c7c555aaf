use std::{fmt::Display, ops::Range};

/// byte ranges of a message's source, pointing into the raw line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPrefix {
    /// a server name, e.g. `irc.example.net`
    Server { host: Range<usize> },
    /// `nick`, `nick@host` or `nick!user@host`
    User {
        nickname: Range<usize>,
        username: Option<Range<usize>>,
        host: Option<Range<usize>>,
    },
}

impl RawPrefix {
    /// `start` is the first byte after the `:`, `end` the position of the
    /// space after the prefix
    pub fn parse(src: &str, start: usize, end: usize) -> Option<Self> {
        let prefix = src.get(start..end)?;
        if prefix.is_empty() {
            return None;
        }
        let bytes = prefix.as_bytes();

        let bang = memchr::memchr(b'!', bytes);
        let at = memchr::memchr(b'@', bytes);

        match (bang, at) {
            (None, None) if prefix.contains('.') => Some(Self::Server {
                host: start..end,
            }),
            (None, None) => Some(Self::User {
                nickname: start..end,
                username: None,
                host: None,
            }),
            (Some(bang), Some(at)) if bang < at => Some(Self::User {
                nickname: start..start + bang,
                username: Some(start + bang + 1..start + at),
                host: Some(start + at + 1..end),
            }),
            (Some(bang), None) => Some(Self::User {
                nickname: start..start + bang,
                username: Some(start + bang + 1..end),
                host: None,
            }),
            (_, Some(at)) => Some(Self::User {
                nickname: start..start + at,
                username: None,
                host: Some(start + at + 1..end),
            }),
        }
    }
}

/// an owned message source, used when building messages
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedPrefix {
    Server(String),
    User {
        nickname: String,
        username: Option<String>,
        host: Option<String>,
    },
}

impl OwnedPrefix {
    /// shorthand for a full `nick!user@host` prefix
    pub fn user(nickname: impl Into<String>, username: impl Into<String>, host: impl Into<String>) -> Self {
        Self::User {
            nickname: nickname.into(),
            username: Some(username.into()),
            host: Some(host.into()),
        }
    }
}

impl Display for OwnedPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server(host) => write!(f, ":{host}"),
            Self::User {
                nickname,
                username,
                host,
            } => {
                write!(f, ":{nickname}")?;
                if let Some(username) = username {
                    write!(f, "!{username}")?;
                }
                if let Some(host) = host {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_prefix() {
        let src = ":alice!al@example.com MODE";
        assert_eq!(
            RawPrefix::parse(src, 1, 21),
            Some(RawPrefix::User {
                nickname: 1..6,
                username: Some(7..9),
                host: Some(10..21),
            })
        );
    }

    #[test]
    fn server_and_bare_nick() {
        let server = ":irc.example.net 001";
        assert_eq!(
            RawPrefix::parse(server, 1, 16),
            Some(RawPrefix::Server { host: 1..16 })
        );

        let bare = ":alice MODE";
        assert_eq!(
            RawPrefix::parse(bare, 1, 6),
            Some(RawPrefix::User {
                nickname: 1..6,
                username: None,
                host: None,
            })
        );
    }

    #[test]
    fn owned_display() {
        assert_eq!(
            OwnedPrefix::user("alice", "al", "example.com").to_string(),
            ":alice!al@example.com"
        );
        assert_eq!(OwnedPrefix::Server("irc.example.net".into()).to_string(), ":irc.example.net");
    }
}
