#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! commands {
    (
        $name:ident,
        [$($var:ident),+]
        $($key:literal = $val:ident),+
    ) => {
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(into = "&'static str", from = "&str"))]
        #[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
        pub enum $name {
            $($var,)*
            /// any command this crate has no use for, the original text is
            /// still available through [IrcMessage::command_str](super::message::IrcMessage::command_str)
            Unknown,
        }

        impl From<&str> for $name {
            fn from(val: &str) -> Self {
                match val {
                    $($key => Self::$val,)*
                    _ => Self::Unknown,
                }
            }
        }

        #[allow(unreachable_patterns)]
        impl From<$name> for &str {
            fn from(val: $name) -> &'static str {
                match val {
                    $($name::$val => $key,)*
                    $name::Unknown => "UNKNOWN",
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", Into::<&str>::into(*self))
            }
        }
    };
}

commands! {
    IrcCommand,
    [
        Pass,
        Nick,
        User,
        Join,
        Part,
        Kick,
        Quit,
        Mode,
        Topic,
        Notice,
        PrivMsg,
        Ping,
        Pong,
        Cap,
        Error,
        Welcome,
        ISupport,
        NamReply,
        EndOfNames
    ]
    "PASS" = Pass,
    "NICK" = Nick,
    "USER" = User,
    "JOIN" = Join,
    "PART" = Part,
    "KICK" = Kick,
    "QUIT" = Quit,
    "MODE" = Mode,
    "TOPIC" = Topic,
    "NOTICE" = Notice,
    "PRIVMSG" = PrivMsg,
    "PING" = Ping,
    "PONG" = Pong,
    "CAP" = Cap,
    "ERROR" = Error,
    "001" = Welcome,
    "005" = ISupport,
    "353" = NamReply,
    "366" = EndOfNames
}

#[test]
fn unknown_commands_do_not_fail() {
    assert_eq!(IrcCommand::from("MODE"), IrcCommand::Mode);
    assert_eq!(IrcCommand::from("353"), IrcCommand::NamReply);
    assert_eq!(IrcCommand::from("WALLOPS"), IrcCommand::Unknown);
    assert_eq!(IrcCommand::PrivMsg.to_string(), "PRIVMSG");
}
