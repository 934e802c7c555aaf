mod admin;
mod ops;
mod privs;

pub use admin::{join, part, quit};
pub use ops::ops;
pub use privs::privs;

use crate::{
    command::{Command, CommandBuilder, StaticMessageHandler},
    config,
    guard::{Guard, RequireAccount, RequireChanmsg, RequirePrivilege, RequirePrivmsg, UserGuard},
};

/// The commands every bot gets: `privs`, `ops` and `ping`. `join`, `part`
/// and `quit` are added when there are admins configured.
pub fn builtin(prefix: &str, config: &config::Commands) -> Vec<Command> {
    let mut commands = vec![
        CommandBuilder::new(privs, vec!["privs".into(), "whois".into()], prefix)
            .and(RequireChanmsg.with_message("privs only works in a channel"))
            .build(),
        CommandBuilder::new(ops, vec!["ops".into()], prefix)
            .and(RequireChanmsg)
            .and(RequirePrivilege(config.ops_min_privilege).with_message(format!(
                "you need to be {} or above to do that",
                config.ops_min_privilege.name()
            )))
            .build(),
        Command::new(
            StaticMessageHandler {
                msg: "pong!".into(),
            },
            vec!["ping".into()],
            prefix,
        ),
    ];

    if let Some(admin) = admin_guard(&config.admins) {
        let admin_only = |builder: CommandBuilder| {
            builder
                .and(RequireAccount.with_message("log in to services first"))
                .and(admin.clone().with_message("you are not allowed to do that"))
                .build()
        };
        commands.extend([
            admin_only(
                CommandBuilder::new(join, vec!["join".into()], prefix)
                    .and(RequirePrivmsg.with_message("send that to me directly")),
            ),
            admin_only(CommandBuilder::new(part, vec!["part".into(), "leave".into()], prefix)),
            admin_only(CommandBuilder::new(quit, vec!["quit".into()], prefix)),
        ]);
    }

    commands
}

/// passes for any of `admins`, `None` when there are none
fn admin_guard(admins: &[String]) -> Option<Box<dyn Guard>> {
    admins
        .iter()
        .map(|nick| Box::new(UserGuard::allow(nick)) as Box<dyn Guard>)
        .reduce(|lhs, rhs| Box::new(lhs.or(rhs)))
}
