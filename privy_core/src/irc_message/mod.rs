pub mod builder;
pub mod command;
pub mod iter;
pub mod message;
pub mod prefix;
pub mod semantic;

pub use semantic::*;

use command::IrcCommand;

pub trait ToIrcMessage {
    fn get_command(&self) -> IrcCommand;

    fn to_message(self) -> String;
}

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum IrcMessageStructureError {
        #[error("missing separator from tags")]
        MissingTagSeparator,
        #[error("missing separator from prefix")]
        MissingPrefixSeparator,
    }

    #[derive(Debug, Error)]
    pub enum IrcMessageParseError {
        #[error("failed to parse message due to a missing command")]
        NoCommand,
        #[error(transparent)]
        StructureError(#[from] IrcMessageStructureError),
        #[error("failed to parse message due to it being empty")]
        Empty,
    }
}
