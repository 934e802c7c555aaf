use privy_core::PrivilegeLevel;

use crate::command::CommandContext;

/// `privs [nick]`, what `nick` (or the sender) holds in this channel
pub fn privs(cx: &CommandContext) -> Option<String> {
    let channel = cx.channel()?;
    let nick = cx.args().next().or_else(|| cx.sender())?;

    if !cx.privileges().contains_user(channel, nick) {
        return Some(format!("{nick} is not in {channel}"));
    }
    let level = cx.privileges().privileges_of(channel, nick);
    Some(format!("{nick} has {} in {channel}", describe(level)))
}

fn describe(level: PrivilegeLevel) -> String {
    if level == PrivilegeLevel::NONE {
        return "no privileges".into();
    }
    level
        .flags_descending()
        .map(PrivilegeLevel::name)
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptions() {
        assert_eq!(describe(PrivilegeLevel::NONE), "no privileges");
        assert_eq!(describe(PrivilegeLevel::OP | PrivilegeLevel::VOICE), "op + voice");
        assert_eq!(describe(PrivilegeLevel::OWNER), "owner");
    }
}
