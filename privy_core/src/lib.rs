#![deny(clippy::missing_safety_doc)]
// utf-8 char boundary checking is cool
#![allow(clippy::sliced_string_as_bytes)]

pub mod casemap;
pub mod channel;
pub mod irc_message;
pub mod isupport;
pub mod mode;
pub mod privilege;
pub mod table;
pub mod tracker;

pub use crate::casemap::Casemapping;
pub use crate::irc_message::builder::MessageBuilder;
pub use crate::irc_message::command::IrcCommand;
pub use crate::irc_message::message::IrcMessage;
pub use crate::isupport::NetworkFeatures;
pub use crate::mode::{ModeChange, ModeEvent, ModeSign};
pub use crate::privilege::PrivilegeLevel;
pub use crate::table::{PrivilegeTable, SharedPrivileges};
pub use crate::tracker::ChannelTracker;
