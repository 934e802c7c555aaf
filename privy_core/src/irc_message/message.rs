use std::{borrow::Cow, fmt::Display, ops::Range, slice::Iter, str::FromStr};

use smallvec::SmallVec;

use crate::irc_message::{error::IrcMessageStructureError, prefix::RawPrefix};

use super::{ToIrcMessage, command::IrcCommand, error::IrcMessageParseError};

/// A single parsed IRC line.
///
/// Parsing only records byte ranges, every accessor slices into the raw
/// line, so parsing a borrowed `&str` never allocates unless the line has
/// more than a handful of parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage<'a> {
    raw: Cow<'a, str>,
    tags: Option<Range<usize>>,
    prefix: Option<RawPrefix>,
    command: IrcCommand,
    command_range: Range<usize>,
    params: SmallVec<[Range<usize>; 5]>,
}

impl<'a> IrcMessage<'a> {
    pub fn new(val: Cow<'a, str>) -> Result<Self, IrcMessageParseError> {
        Self::try_from(val)
    }

    pub fn to_owned(self) -> IrcMessage<'static> {
        IrcMessage::<'static> {
            raw: Cow::Owned(self.raw.into_owned()),
            tags: self.tags,
            prefix: self.prefix,
            command: self.command,
            command_range: self.command_range,
            params: self.params,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn into_inner(self) -> Cow<'a, str> {
        self.raw
    }

    /// value of an [IRCv3 tag](https://ircv3.net/specs/extensions/message-tags.html),
    /// escape sequences are left as they are. Tags without a value return
    /// `Some("")`.
    pub fn get_tag(&self, key: &str) -> Option<&str> {
        self.tags().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .as_ref()
            .and_then(|t| self.raw.get(t.clone()))
            .into_iter()
            .flat_map(|t| t.split(';'))
            .filter(|t| !t.is_empty())
            .map(|t| t.split_once('=').unwrap_or((t, "")))
    }

    pub fn get_host(&self) -> Option<&str> {
        match &self.prefix {
            Some(RawPrefix::Server { host }) => self.raw.get(host.clone()),
            Some(RawPrefix::User { host, .. }) => self.raw.get(host.clone()?),
            None => None,
        }
    }

    pub fn get_nickname(&self) -> Option<&str> {
        match &self.prefix {
            Some(RawPrefix::User { nickname, .. }) => self.raw.get(nickname.clone()),
            _ => None,
        }
    }

    pub fn get_username(&self) -> Option<&str> {
        match &self.prefix {
            Some(RawPrefix::User { username, .. }) => self.raw.get(username.clone()?),
            _ => None,
        }
    }

    /// parameters never include the `:` that introduces a trailing parameter
    pub fn get_param(&self, idx: usize) -> Option<&str> {
        self.raw.get(self.params.get(idx)?.clone())
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn params(&self) -> Params<'_> {
        Params {
            src: &self.raw,
            iter: self.params.iter(),
        }
    }

    pub fn get_command(&self) -> IrcCommand {
        self.command
    }

    /// the command exactly as it was sent, useful for [IrcCommand::Unknown]
    pub fn command_str(&self) -> &str {
        &self.raw[self.command_range.clone()]
    }
}

impl FromStr for IrcMessage<'static> {
    type Err = IrcMessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl<'a> TryFrom<Cow<'a, str>> for IrcMessage<'a> {
    type Error = IrcMessageParseError;

    #[inline]
    fn try_from(value: Cow<'a, str>) -> Result<Self, Self::Error> {
        use IrcMessageParseError as E;

        let raw = value;
        let bytes = raw.as_bytes();

        // everything from the first CR or LF on is line terminator
        let end = memchr::memchr2(b'\r', b'\n', bytes).unwrap_or(bytes.len());
        if raw[..end].trim_matches(' ').is_empty() {
            return Err(E::Empty);
        }

        let mut pos: usize = 0;

        // tag section, `pos` ends up right after the space that follows it
        let tags = if raw.starts_with('@') {
            let tag_end = memchr::memchr(b' ', &bytes[..end])
                .ok_or(IrcMessageStructureError::MissingTagSeparator)?;
            pos = tag_end + 1;
            Some(1..tag_end)
        } else {
            None
        };
        pos = skip_spaces(bytes, pos, end);

        // the prefix, if there is one, `pos` ends up on the command
        let prefix = if bytes.get(pos) == Some(&b':') {
            let prefix_end = memchr::memchr(b' ', &bytes[pos..end])
                .ok_or(IrcMessageStructureError::MissingPrefixSeparator)?
                + pos;
            let out = RawPrefix::parse(&raw, pos + 1, prefix_end);
            pos = skip_spaces(bytes, prefix_end, end);
            out
        } else {
            None
        };

        if pos >= end {
            return Err(E::NoCommand);
        }

        let command_end = memchr::memchr(b' ', &bytes[pos..end]).map_or(end, |s| s + pos);
        let command_range = pos..command_end;
        let command = IrcCommand::from(&raw[command_range.clone()]);
        pos = command_end;

        let mut params = SmallVec::new();
        loop {
            pos = skip_spaces(bytes, pos, end);
            if pos >= end {
                break;
            }
            if bytes[pos] == b':' {
                params.push(pos + 1..end);
                break;
            }
            let param_end = memchr::memchr(b' ', &bytes[pos..end]).map_or(end, |s| s + pos);
            params.push(pos..param_end);
            pos = param_end;
        }

        Ok(Self {
            raw,
            tags,
            prefix,
            command,
            command_range,
            params,
        })
    }
}

#[inline]
fn skip_spaces(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && bytes[pos] == b' ' {
        pos += 1;
    }
    pos
}

impl<'a> TryFrom<&'a str> for IrcMessage<'a> {
    type Error = IrcMessageParseError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::try_from(Cow::Borrowed(value))
    }
}

impl TryFrom<String> for IrcMessage<'static> {
    type Error = IrcMessageParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(Cow::Owned(value))
    }
}

impl Display for IrcMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &*self.raw)
    }
}

impl ToIrcMessage for IrcMessage<'_> {
    fn to_message(self) -> String {
        match self.raw {
            Cow::Borrowed(b) => b.to_string(),
            Cow::Owned(o) => o,
        }
    }

    fn get_command(&self) -> IrcCommand {
        self.command
    }
}

pub struct Params<'a> {
    src: &'a str,
    iter: Iter<'a, Range<usize>>,
}

impl<'a> Iterator for Params<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        Some(&self.src[self.iter.next()?.clone()])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Params<'_> {}
