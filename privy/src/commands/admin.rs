use crate::{command::CommandContext, response::BotResponse};

pub fn join(cx: &CommandContext) -> Result<(String, BotResponse), String> {
    let channel = cx.args().next().ok_or("usage: join <channel>")?;
    if !cx.features().is_channel(channel) {
        return Err(format!("{channel} is not a channel"));
    }
    Ok((
        format!("joining {channel}"),
        BotResponse::Join(channel.to_owned()),
    ))
}

/// leaves the given channel, or the current one
pub fn part(cx: &CommandContext) -> Result<BotResponse, &'static str> {
    let channel = cx
        .args()
        .next()
        .or_else(|| cx.channel())
        .ok_or("usage: part <channel>")?;
    Ok(BotResponse::Part(channel.to_owned()))
}

pub fn quit(_cx: &CommandContext) -> (&'static str, BotResponse) {
    ("bye!", BotResponse::Shutdown)
}
