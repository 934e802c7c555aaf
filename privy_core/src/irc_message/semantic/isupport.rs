use crate::isupport::ISupportToken;

use super::ISupport;

impl ISupport<'_> {
    /// `005 <me> <token>... :are supported by this server`, the first and
    /// last parameters are not tokens
    pub fn tokens(&self) -> impl Iterator<Item = ISupportToken<'_>> {
        let count = self.param_count();
        self.params()
            .enumerate()
            .filter(move |(idx, _)| *idx > 0 && *idx + 1 < count)
            .filter_map(|(_, token)| ISupportToken::parse(token))
    }
}

#[test]
fn isupport_tokens() {
    use crate::{IrcMessage, irc_message::SemanticIrcMessage};

    let msg = ISupport::from_message(
        IrcMessage::try_from(
            ":irc.example.net 005 privy PREFIX=(ov)@+ -EXCEPTS CASEMAPPING=ascii :are supported by this server",
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(
        msg.tokens().collect::<Vec<_>>(),
        vec![
            ISupportToken::Set {
                key: "PREFIX",
                value: Some("(ov)@+")
            },
            ISupportToken::Unset { key: "EXCEPTS" },
            ISupportToken::Set {
                key: "CASEMAPPING",
                value: Some("ascii")
            },
        ]
    );
}
