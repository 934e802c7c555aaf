use crate::MessageBuilder;

use super::{PrivMsg, util::is_ctcp};

impl PrivMsg<'_> {
    pub fn target(&self) -> Option<&str> {
        self.get_param(0)
    }

    pub fn message_text(&self) -> &str {
        self.get_param(1).unwrap_or_default()
    }

    pub fn sender(&self) -> Option<&str> {
        self.get_nickname()
    }

    /// the services account of the sender, when the server sends
    /// `account-tag`
    pub fn account(&self) -> Option<&str> {
        self.get_tag("account").filter(|a| !a.is_empty() && *a != "*")
    }

    pub fn is_ctcp(&self) -> bool {
        is_ctcp(self.message_text())
    }

    /// where a reply should go: the channel for channel messages, the
    /// sender for private ones
    pub fn reply_target<'s>(&'s self, is_channel: impl Fn(&str) -> bool) -> Option<&'s str> {
        let target = self.target()?;
        if is_channel(target) {
            Some(target)
        } else {
            self.sender()
        }
    }

    pub fn reply<'s>(&'s self, is_channel: impl Fn(&str) -> bool, msg: &str) -> Option<MessageBuilder<'s>> {
        self.reply_target(is_channel)
            .map(|target| MessageBuilder::privmsg(target, msg))
    }
}

#[cfg(test)]
mod tests {
    use crate::{IrcMessage, irc_message::PrivMsg, irc_message::SemanticIrcMessage};

    fn privmsg(raw: &str) -> PrivMsg<'_> {
        PrivMsg::from_message(IrcMessage::try_from(raw).unwrap()).unwrap()
    }

    #[test]
    fn channel_and_private_replies() {
        let in_channel = privmsg("@account=alice :Alice!a@h PRIVMSG #test :!privs bob");
        assert_eq!(in_channel.message_text(), "!privs bob");
        assert_eq!(in_channel.account(), Some("alice"));
        assert_eq!(in_channel.reply_target(|t| t.starts_with('#')), Some("#test"));

        let private = privmsg(":Alice!a@h PRIVMSG privy :hello");
        assert_eq!(private.account(), None);
        assert_eq!(private.reply_target(|t| t.starts_with('#')), Some("Alice"));
        assert_eq!(
            private.reply(|t| t.starts_with('#'), "hi").map(|b| b.build()),
            Some("PRIVMSG Alice :hi\r\n".to_owned())
        );
    }
}
