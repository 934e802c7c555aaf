use privy_core::{NetworkFeatures, PrivilegeLevel, PrivilegeTable, irc_message::PrivMsg};

/// Everything a guard gets to look at: the message and the privilege state
/// at the time it arrived.
#[derive(Clone, Copy)]
pub struct GuardContext<'a> {
    message: &'a PrivMsg<'a>,
    privileges: &'a PrivilegeTable,
    features: &'a NetworkFeatures,
    bot_nick: &'a str,
}

impl<'a> GuardContext<'a> {
    pub fn new(
        message: &'a PrivMsg<'a>,
        privileges: &'a PrivilegeTable,
        features: &'a NetworkFeatures,
        bot_nick: &'a str,
    ) -> Self {
        Self {
            message,
            privileges,
            features,
            bot_nick,
        }
    }

    pub fn message(&self) -> &'a PrivMsg<'a> {
        self.message
    }

    pub fn privileges(&self) -> &'a PrivilegeTable {
        self.privileges
    }

    pub fn features(&self) -> &'a NetworkFeatures {
        self.features
    }

    pub fn bot_nick(&self) -> &'a str {
        self.bot_nick
    }

    pub fn sender(&self) -> Option<&'a str> {
        self.message.sender()
    }

    /// the channel the message was sent to, `None` for private messages
    pub fn channel(&self) -> Option<&'a str> {
        self.message
            .target()
            .filter(|target| self.features.is_channel(target))
    }
}

pub trait Guard: Send + Sync + 'static {
    fn check(&self, ctx: &GuardContext) -> bool;

    /// what to tell the sender when this guard rejects them, `None` rejects
    /// silently
    fn message(&self) -> Option<&str> {
        None
    }

    /// The message for a rejection of `ctx`. Composite guards answer with
    /// the message of the part that actually failed.
    fn denial(&self, _ctx: &GuardContext) -> Option<&str> {
        self.message()
    }

    fn clone_boxed(&self) -> Box<dyn Guard>;

    fn and<G: Guard>(self, rhs: G) -> AndGuard<Self, G>
    where
        Self: Sized,
    {
        AndGuard { lhs: self, rhs }
    }

    fn or<G: Guard>(self, rhs: G) -> OrGuard<Self, G>
    where
        Self: Sized,
    {
        OrGuard { lhs: self, rhs }
    }

    fn not(self) -> NotGuard<Self>
    where
        Self: Sized,
    {
        NotGuard(self)
    }

    fn with_message(self, message: impl Into<String>) -> WithMessage<Self>
    where
        Self: Sized,
    {
        WithMessage {
            guard: self,
            message: message.into(),
        }
    }
}

impl Clone for Box<dyn Guard> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

impl Guard for Box<dyn Guard> {
    fn check(&self, ctx: &GuardContext) -> bool {
        (**self).check(ctx)
    }

    fn message(&self) -> Option<&str> {
        (**self).message()
    }

    fn denial(&self, ctx: &GuardContext) -> Option<&str> {
        (**self).denial(ctx)
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        (**self).clone_boxed()
    }
}

#[derive(Clone)]
pub struct AndGuard<G1: Guard + Sized, G2: Guard + Sized> {
    lhs: G1,
    rhs: G2,
}

impl<G1: Guard + Clone, G2: Guard + Clone> Guard for AndGuard<G1, G2> {
    fn check(&self, ctx: &GuardContext) -> bool {
        self.lhs.check(ctx) && self.rhs.check(ctx)
    }

    fn denial(&self, ctx: &GuardContext) -> Option<&str> {
        if self.lhs.check(ctx) {
            self.rhs.denial(ctx)
        } else {
            self.lhs.denial(ctx)
        }
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

#[derive(Clone)]
pub struct OrGuard<G1: Guard + Sized, G2: Guard + Sized> {
    lhs: G1,
    rhs: G2,
}

impl<G1: Guard + Clone, G2: Guard + Clone> Guard for OrGuard<G1, G2> {
    fn check(&self, ctx: &GuardContext) -> bool {
        self.lhs.check(ctx) || self.rhs.check(ctx)
    }

    fn denial(&self, ctx: &GuardContext) -> Option<&str> {
        self.rhs.denial(ctx).or_else(|| self.lhs.denial(ctx))
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// Inverts the result of the inner guard
#[derive(Clone)]
pub struct NotGuard<G: Guard>(G);

impl<G: Guard + Clone> Guard for NotGuard<G> {
    fn check(&self, ctx: &GuardContext) -> bool {
        !self.0.check(ctx)
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// Replaces the denial message of the inner guard
#[derive(Clone)]
pub struct WithMessage<G: Guard> {
    guard: G,
    message: String,
}

impl<G: Guard + Clone> Guard for WithMessage<G> {
    fn check(&self, ctx: &GuardContext) -> bool {
        self.guard.check(ctx)
    }

    fn message(&self) -> Option<&str> {
        Some(&self.message)
    }

    fn denial(&self, _ctx: &GuardContext) -> Option<&str> {
        Some(&self.message)
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// Passes when the message starts with `prefix` directly followed by one
/// of `names`
#[derive(Clone)]
pub struct CommandGuard {
    names: Vec<String>,
    prefix: String,
}

impl CommandGuard {
    pub fn new(names: Vec<String>, prefix: impl Into<String>) -> Self {
        Self {
            names,
            prefix: prefix.into(),
        }
    }

    /// the text following the command name, `None` if the message isn't
    /// this command
    pub fn arguments<'m>(&self, text: &'m str) -> Option<&'m str> {
        let text = text.trim_start();
        let (first_word, rest) = text.split_once(' ').unwrap_or((text, ""));
        let name = first_word.strip_prefix(self.prefix.as_str())?;
        self.names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(name))
            .then_some(rest.trim())
    }
}

impl Guard for CommandGuard {
    fn check(&self, ctx: &GuardContext) -> bool {
        !ctx.message().is_ctcp() && self.arguments(ctx.message().message_text()).is_some()
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// Passes when the sender holds `level` or anything ranked above it in the
/// channel the message was sent to. Private messages never pass.
#[derive(Clone)]
pub struct RequirePrivilege(pub PrivilegeLevel);

impl Guard for RequirePrivilege {
    fn check(&self, ctx: &GuardContext) -> bool {
        let (Some(channel), Some(sender)) = (ctx.channel(), ctx.sender()) else {
            return false;
        };
        ctx.privileges().has_privilege(channel, sender, self.0)
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// Like [RequirePrivilege] but for the bot itself, e.g. before it tries to
/// kick someone
#[derive(Clone)]
pub struct RequireBotPrivilege(pub PrivilegeLevel);

impl Guard for RequireBotPrivilege {
    fn check(&self, ctx: &GuardContext) -> bool {
        ctx.channel().is_some_and(|channel| {
            ctx.privileges()
                .has_privilege(channel, ctx.bot_nick(), self.0)
        })
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// only messages sent to a channel
#[derive(Clone)]
pub struct RequireChanmsg;

impl Guard for RequireChanmsg {
    fn check(&self, ctx: &GuardContext) -> bool {
        ctx.channel().is_some()
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// only messages sent to the bot directly
#[derive(Clone)]
pub struct RequirePrivmsg;

impl Guard for RequirePrivmsg {
    fn check(&self, ctx: &GuardContext) -> bool {
        ctx.message().target().is_some() && ctx.channel().is_none()
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

/// Passes when the sender is logged in to services, going by the
/// `account` message tag
#[derive(Clone)]
pub struct RequireAccount;

impl Guard for RequireAccount {
    fn check(&self, ctx: &GuardContext) -> bool {
        ctx.message().account().is_some()
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

#[derive(Clone)]
pub struct UserGuard {
    nick: String,
}

impl UserGuard {
    pub fn allow(nick: impl Into<String>) -> Self {
        Self { nick: nick.into() }
    }

    pub fn forbid(nick: impl Into<String>) -> NotGuard<Self> {
        NotGuard(Self { nick: nick.into() })
    }
}

impl Guard for UserGuard {
    fn check(&self, ctx: &GuardContext) -> bool {
        ctx.sender()
            .is_some_and(|sender| ctx.features().casemapping.eq(sender, &self.nick))
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

#[derive(Clone)]
pub struct ChannelGuard {
    channel: String,
}

impl ChannelGuard {
    pub fn allow(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    pub fn forbid(channel: impl Into<String>) -> NotGuard<Self> {
        NotGuard(Self {
            channel: channel.into(),
        })
    }
}

impl Guard for ChannelGuard {
    fn check(&self, ctx: &GuardContext) -> bool {
        ctx.channel()
            .is_some_and(|channel| ctx.features().casemapping.eq(channel, &self.channel))
    }

    fn clone_boxed(&self) -> Box<dyn Guard> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use privy_core::{IrcMessage, irc_message::SemanticIrcMessage};

    use super::*;

    fn table() -> PrivilegeTable {
        let mut table = PrivilegeTable::new();
        table.add_user("#rust", "owner", PrivilegeLevel::OWNER);
        table.add_user("#rust", "op", PrivilegeLevel::OP);
        table.add_user("#rust", "voiced", PrivilegeLevel::VOICE);
        table.add_user("#rust", "privy", PrivilegeLevel::HALFOP);
        table
    }

    fn check(guard: &impl Guard, raw: &str) -> bool {
        let msg = PrivMsg::from_message(IrcMessage::try_from(raw).unwrap()).unwrap();
        let table = table();
        let features = NetworkFeatures::default();
        guard.check(&GuardContext::new(&msg, &table, &features, "privy"))
    }

    fn denial(guard: &impl Guard, raw: &str) -> Option<String> {
        let msg = PrivMsg::from_message(IrcMessage::try_from(raw).unwrap()).unwrap();
        let table = table();
        let features = NetworkFeatures::default();
        guard
            .denial(&GuardContext::new(&msg, &table, &features, "privy"))
            .map(ToOwned::to_owned)
    }

    #[test]
    fn require_privilege_uses_rank() {
        let guard = RequirePrivilege(PrivilegeLevel::OP);
        assert!(check(&guard, ":op!o@h PRIVMSG #rust :!ops"));
        // no OP bit, but ranked above it
        assert!(check(&guard, ":owner!o@h PRIVMSG #rust :!ops"));
        assert!(!check(&guard, ":voiced!v@h PRIVMSG #rust :!ops"));
        assert!(!check(&guard, ":stranger!s@h PRIVMSG #rust :!ops"));
        assert!(!check(&guard, ":op!o@h PRIVMSG privy :!ops"));
        assert!(check(&guard, ":OP!o@h PRIVMSG #RUST :!ops"));
    }

    #[test]
    fn require_bot_privilege() {
        assert!(check(
            &RequireBotPrivilege(PrivilegeLevel::HALFOP),
            ":voiced!v@h PRIVMSG #rust :!kick someone"
        ));
        assert!(!check(
            &RequireBotPrivilege(PrivilegeLevel::OP),
            ":voiced!v@h PRIVMSG #rust :!kick someone"
        ));
    }

    #[test]
    fn message_kinds() {
        assert!(check(&RequireChanmsg, ":a!a@h PRIVMSG #rust :hi"));
        assert!(!check(&RequireChanmsg, ":a!a@h PRIVMSG privy :hi"));
        assert!(check(&RequirePrivmsg, ":a!a@h PRIVMSG privy :hi"));
        assert!(!check(&RequirePrivmsg, ":a!a@h PRIVMSG &local :hi"));
    }

    #[test]
    fn accounts() {
        assert!(check(&RequireAccount, "@account=a :a!a@h PRIVMSG #rust :hi"));
        assert!(!check(&RequireAccount, "@account=* :a!a@h PRIVMSG #rust :hi"));
        assert!(!check(&RequireAccount, ":a!a@h PRIVMSG #rust :hi"));
    }

    #[test]
    fn users_and_channels() {
        assert!(check(&UserGuard::allow("Nick[a]"), ":nick{a}!n@h PRIVMSG #rust :hi"));
        assert!(!check(&UserGuard::forbid("nick"), ":Nick!n@h PRIVMSG #rust :hi"));
        assert!(check(&ChannelGuard::allow("#Rust"), ":a!a@h PRIVMSG #rust :hi"));
        assert!(!check(&ChannelGuard::allow("#rust"), ":a!a@h PRIVMSG privy :hi"));
        assert!(check(&ChannelGuard::forbid("#rust"), ":a!a@h PRIVMSG #go :hi"));
    }

    #[test]
    fn combinators() {
        let op_or_alice = RequirePrivilege(PrivilegeLevel::OP).or(UserGuard::allow("alice"));
        assert!(check(&op_or_alice, ":alice!a@h PRIVMSG #rust :hi"));
        assert!(check(&op_or_alice, ":op!a@h PRIVMSG #rust :hi"));
        assert!(!check(&op_or_alice, ":voiced!a@h PRIVMSG #rust :hi"));

        let voiced_in_channel = RequireChanmsg.and(RequirePrivilege(PrivilegeLevel::VOICE));
        assert!(check(&voiced_in_channel, ":voiced!a@h PRIVMSG #rust :hi"));
        assert!(!check(&voiced_in_channel.not(), ":voiced!a@h PRIVMSG #rust :hi"));

        let guard = RequireChanmsg
            .with_message("channels only")
            .and(RequireAccount.with_message("log in first"));
        assert_eq!(
            denial(&guard, ":a!a@h PRIVMSG #rust :hi").as_deref(),
            Some("log in first")
        );
        assert_eq!(
            denial(&guard, ":a!a@h PRIVMSG privy :hi").as_deref(),
            Some("channels only")
        );
        assert_eq!(denial(&RequireChanmsg, ":a!a@h PRIVMSG privy :hi"), None);

        let guard = RequireAccount
            .with_message("log in first")
            .or(RequirePrivilege(PrivilegeLevel::OP));
        assert_eq!(
            denial(&guard, ":voiced!a@h PRIVMSG #rust :hi").as_deref(),
            Some("log in first")
        );
    }

    #[test]
    fn commands() {
        let guard = CommandGuard::new(vec!["privs".into(), "p".into()], "!");
        assert_eq!(guard.arguments("!privs alice"), Some("alice"));
        assert_eq!(guard.arguments("!PRIVS"), Some(""));
        assert_eq!(guard.arguments("!p  bob "), Some("bob"));
        assert_eq!(guard.arguments("!privsx"), None);
        assert_eq!(guard.arguments("privs"), None);
        assert!(check(&guard, ":a!a@h PRIVMSG #rust :!privs"));
        assert!(!check(&guard, ":a!a@h PRIVMSG #rust :\u{1}ACTION !privs\u{1}"));
    }
}
