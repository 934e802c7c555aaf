use std::{borrow::Cow, fmt::Display};

use super::{ToIrcMessage, command::IrcCommand, prefix::OwnedPrefix};

#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageBuilder<'a> {
    pub prefix: Option<OwnedPrefix>,
    pub command: IrcCommand,
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub params: Vec<Cow<'a, str>>,
}

impl std::fmt::Debug for MessageBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("prefix", &self.prefix)
            .field("command", &self.command)
            .field(
                "params",
                if self.command == IrcCommand::Pass {
                    &"[PASSWORD REDACTED]"
                } else {
                    &self.params
                },
            )
            .finish()
    }
}

impl<'a> MessageBuilder<'a> {
    pub fn new(command: IrcCommand) -> Self {
        Self {
            prefix: None,
            command,
            params: vec![],
        }
    }

    /// the line, including the trailing CRLF
    pub fn build(self) -> String {
        let mut out = self.to_string();
        out.push_str("\r\n");
        out
    }

    pub fn add_param(mut self, param: impl Into<Cow<'a, str>>) -> Self {
        self.params.push(param.into());
        self
    }

    /// adds a final parameter that may contain spaces
    pub fn add_trailing(self, param: &str) -> Self {
        self.add_param(Cow::Owned(format!(":{param}")))
    }

    pub fn prefix(mut self, prefix: OwnedPrefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn privmsg(target: &'a str, message: &str) -> Self {
        Self::new(IrcCommand::PrivMsg)
            .add_param(target)
            .add_trailing(message)
    }

    pub fn notice(target: &'a str, message: &str) -> Self {
        Self::new(IrcCommand::Notice)
            .add_param(target)
            .add_trailing(message)
    }

    pub fn pong(data: &str) -> Self {
        Self::new(IrcCommand::Pong).add_trailing(data)
    }

    pub fn join(channels: impl IntoIterator<Item = impl std::fmt::Display>) -> Self {
        let mut channel_list = String::new();
        for (idx, chan) in channels.into_iter().enumerate() {
            if idx > 0 {
                channel_list.push(',');
            }
            channel_list.push_str(&chan.to_string());
        }
        Self::new(IrcCommand::Join).add_param(channel_list)
    }

    pub fn to_owned(self) -> MessageBuilder<'static> {
        let mut new = MessageBuilder::<'static>::new(self.command);
        new.params = self
            .params
            .into_iter()
            .map(|p| p.into_owned().into())
            .collect();
        new.prefix = self.prefix;
        new
    }
}

impl Display for MessageBuilder<'_> {
    /// the line without its CRLF
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix} ")?;
        }
        write!(f, "{}", self.command)?;
        for param in &self.params {
            write!(f, " {param}")?;
        }
        Ok(())
    }
}

impl ToIrcMessage for MessageBuilder<'_> {
    fn get_command(&self) -> IrcCommand {
        self.command
    }

    fn to_message(self) -> String {
        self.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_lines() {
        assert_eq!(
            MessageBuilder::privmsg("#rust", "you need to be op").build(),
            "PRIVMSG #rust :you need to be op\r\n"
        );
        assert_eq!(MessageBuilder::join(["#a", "#b"]).build(), "JOIN #a,#b\r\n");
        assert_eq!(
            MessageBuilder::pong("irc.example.net")
                .prefix(OwnedPrefix::user("privy", "p", "h"))
                .build(),
            ":privy!p@h PONG :irc.example.net\r\n"
        );
    }

    #[test]
    fn display_has_no_line_ending() {
        let builder = MessageBuilder::new(IrcCommand::Join).add_param("#rust");
        assert_eq!(builder.to_string(), "JOIN #rust");
    }
}
