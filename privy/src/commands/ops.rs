use privy_core::{PrivilegeLevel, channel::Member};

use crate::command::CommandContext;

/// `ops`, everyone in the channel holding voice or above, highest first
pub fn ops(cx: &CommandContext) -> Option<String> {
    let channel = cx.channel()?;
    let mut members: Vec<&Member> = cx
        .privileges()
        .users(channel)
        .filter(|m| m.privileges.at_least(PrivilegeLevel::VOICE))
        .collect();

    if members.is_empty() {
        return Some(format!("nobody in {channel} holds voice or above"));
    }

    members.sort_by(|a, b| {
        b.privileges
            .rank()
            .cmp(&a.privileges.rank())
            .then_with(|| a.nick.cmp(&b.nick))
    });

    let prefixes = &cx.features().prefixes;
    let listed = members
        .iter()
        .map(|m| {
            let highest = m.privileges.highest();
            match highest
                .mode_char()
                .and_then(|mode| prefixes.symbol_for_mode(mode))
                .or_else(|| highest.prefix_symbol())
            {
                Some(symbol) => format!("{symbol}{}", m.nick),
                None => m.nick.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Some(format!("{channel}: {listed}"))
}
