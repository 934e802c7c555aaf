use memchr::memchr;

use crate::IrcMessage;

use super::error::IrcMessageParseError;

/// Parses a buffer holding several `\n` terminated lines, a final line
/// without a terminator is parsed as well. Blank lines are skipped.
pub struct IrcMessageParseIter<'a> {
    pos: usize,
    inner: &'a str,
}

impl<'a> IrcMessageParseIter<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            inner: text,
            pos: 0,
        }
    }
}

impl<'a> Iterator for IrcMessageParseIter<'a> {
    type Item = Result<IrcMessage<'a>, IrcMessageParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.inner.len() {
                return None;
            }
            let rest = &self.inner[self.pos..];
            let line_len = memchr(b'\n', rest.as_bytes()).map_or(rest.len(), |n| n + 1);
            let line = &rest[..line_len];
            self.pos += line_len;
            if line.trim_end_matches(['\r', '\n']).trim().is_empty() {
                continue;
            }
            return Some(IrcMessage::try_from(line));
        }
    }
}

#[test]
fn parse_iter() {
    const LINES: &str = ":irc.example.net 001 privy :Welcome\r\n\r\n:alice!a@h JOIN #test\r\n:alice!a@h MODE #test +o bob";
    let parsed: Vec<_> = IrcMessageParseIter::new(LINES)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[2].get_param(2), Some("bob"));
}
