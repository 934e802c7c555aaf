use std::path::Path;

use anyhow::Context;
use owo_colors::OwoColorize;
use privy_core::{
    ChannelTracker, IrcCommand, IrcMessage, MessageBuilder, NetworkFeatures, PrivilegeLevel,
    irc_message::{AnySemantic, PrivMsg},
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter},
    sync::mpsc,
};

use crate::{
    command::{Command, Dispatch},
    guard::GuardContext,
    response::BotResponse,
};

pub struct Bot {
    tracker: ChannelTracker,
    commands: Vec<Command>,
    channels: Vec<String>,
}

/// Something the bot wants done on the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    SendRawIrc(MessageBuilder<'static>),
    JoinChannel(String),
    PartChannel(String),
    Shutdown,
}

impl BotCommand {
    /// the raw line for this command, `None` for [Shutdown](Self::Shutdown)
    pub fn to_line(&self) -> Option<String> {
        match self {
            Self::SendRawIrc(msg) => Some(msg.clone().build()),
            Self::JoinChannel(channel) => Some(MessageBuilder::join([channel]).build()),
            Self::PartChannel(channel) => Some(
                MessageBuilder::new(IrcCommand::Part)
                    .add_param(channel.as_str())
                    .build(),
            ),
            Self::Shutdown => None,
        }
    }
}

const LINE_CHANNEL_SIZE: usize = 128;

impl Bot {
    pub fn new(nick: impl Into<String>, features: NetworkFeatures) -> Self {
        Self {
            tracker: ChannelTracker::new(nick, features),
            commands: vec![],
            channels: vec![],
        }
    }

    /// channels to join as soon as the bot starts running
    pub fn add_channels(mut self, channels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.channels.extend(channels.into_iter().map(Into::into));
        self
    }

    pub fn add_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    pub fn add_commands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.commands.extend(commands);
        self
    }

    pub fn tracker(&self) -> &ChannelTracker {
        &self.tracker
    }

    /// Feeds one raw line through the tracker, then through the commands.
    /// Commands see the table as it is after this line.
    pub fn handle_line(&mut self, line: &str) -> Vec<BotCommand> {
        let msg = match IrcMessage::try_from(line) {
            Ok(msg) => AnySemantic::from(msg),
            Err(e) => {
                log::warn!("skipping malformed line {line:?}: {e}");
                return vec![];
            }
        };
        log::trace!("received message of kind: {}", msg.get_command());

        self.tracker.handle(&msg);

        match &msg {
            AnySemantic::Ping(ping) => vec![BotCommand::SendRawIrc(
                MessageBuilder::pong(ping.get_param(0).unwrap_or_default()).to_owned(),
            )],
            AnySemantic::PrivMsg(privmsg) => self.dispatch(privmsg),
            AnySemantic::Error(error) => {
                log::error!("server error: {}", error.get_param(0).unwrap_or_default());
                vec![]
            }
            _ => vec![],
        }
    }

    fn dispatch(&self, msg: &PrivMsg<'_>) -> Vec<BotCommand> {
        let table = self.tracker.privileges().read();
        let cx = GuardContext::new(msg, &table, self.tracker.features(), self.tracker.nick());

        for command in &self.commands {
            match command.dispatch(&cx) {
                Dispatch::Skipped => continue,
                Dispatch::Denied(reason) => {
                    log::debug!(
                        "denied {:?} from {}",
                        msg.message_text(),
                        msg.sender().unwrap_or("<unknown>")
                    );
                    return reason
                        .map(|reason| self.respond(msg, BotResponse::Message(reason)))
                        .unwrap_or_default();
                }
                Dispatch::Handled(resp) => {
                    return resp
                        .map(|resp| self.respond(msg, resp))
                        .unwrap_or_default();
                }
            }
        }
        vec![]
    }

    fn respond(&self, msg: &PrivMsg<'_>, resp: BotResponse) -> Vec<BotCommand> {
        let features = self.tracker.features();
        resp.flatten()
            .into_iter()
            .filter_map(|resp| match resp {
                BotResponse::Message(text) => msg
                    .reply(|target| features.is_channel(target), &text)
                    .map(|reply| BotCommand::SendRawIrc(reply.to_owned())),
                BotResponse::Notice(text) => msg.sender().map(|sender| {
                    BotCommand::SendRawIrc(MessageBuilder::notice(sender, &text).to_owned())
                }),
                BotResponse::Raw(raw) => Some(BotCommand::SendRawIrc(raw)),
                BotResponse::Join(channel) => Some(BotCommand::JoinChannel(channel)),
                BotResponse::Part(channel) => Some(BotCommand::PartChannel(channel)),
                BotResponse::Shutdown => Some(BotCommand::Shutdown),
                BotResponse::Many(_) => None,
            })
            .collect()
    }

    /// Reads lines from `input` (stdin when `None`) until it runs out, the
    /// bot is told to shut down, or ctrl-c. Responses go to stdout.
    pub async fn run(&mut self, input: Option<&Path>) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel(LINE_CHANNEL_SIZE);
        let reader = match input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("failed to open {}", path.display()))?;
                Some(tokio::spawn(forward_lines(BufReader::new(file), tx)))
            }
            None => {
                // tokio's stdin would hold up runtime shutdown, this thread
                // is never joined
                std::thread::Builder::new()
                    .name("stdin".into())
                    .spawn(move || {
                        if let Err(e) = forward_lines_blocking(std::io::stdin().lock(), tx) {
                            log::error!("failed to read stdin: {e}");
                        }
                    })
                    .context("failed to spawn the stdin reader")?;
                None
            }
        };

        let mut out = BufWriter::new(tokio::io::stdout());
        if !self.channels.is_empty() {
            let join = MessageBuilder::join(&self.channels).build();
            out.write_all(join.as_bytes()).await?;
            out.flush().await?;
        }

        log::info!("privy started as {}", self.tracker.nick());

        loop {
            tokio::select! {
                line = rx.recv() => {
                    let Some(line) = line else {
                        log::debug!("input exhausted");
                        break;
                    };
                    let commands = self.handle_line(&line);
                    if !write_commands(&mut out, commands).await? {
                        log::info!("shutting down");
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    log::info!("interrupted, shutting down");
                    break;
                }
            }
        }

        out.flush().await?;
        if let Some(reader) = reader {
            reader.abort();
            match reader.await {
                Ok(res) => res.context("failed to read input")?,
                Err(e) if e.is_cancelled() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// the whole privilege table, one channel per block
    pub fn dump_table(&self) -> String {
        let table = self.tracker.privileges().read();
        let mut channels: Vec<_> = table.channels().collect();
        channels.sort_by(|a, b| a.name().cmp(b.name()));

        let mut out = String::new();
        for channel in channels {
            out.push_str(&format!("{} ({} users)\n", channel.name().bold(), channel.len()));
            let mut members: Vec<_> = channel.members().collect();
            members.sort_by(|a, b| {
                b.privileges
                    .cmp(&a.privileges)
                    .then_with(|| a.nick.cmp(&b.nick))
            });
            for member in members {
                let level = member.privileges;
                let nick = match level.highest() {
                    PrivilegeLevel::OWNER => member.nick.red().to_string(),
                    PrivilegeLevel::ADMIN => member.nick.magenta().to_string(),
                    PrivilegeLevel::OP => member.nick.green().to_string(),
                    PrivilegeLevel::HALFOP => member.nick.cyan().to_string(),
                    PrivilegeLevel::VOICE => member.nick.yellow().to_string(),
                    _ => member.nick.clone(),
                };
                out.push_str(&format!("  {} {nick}\n", level.dimmed()));
            }
        }
        out
    }
}

async fn forward_lines<R: AsyncBufRead + Unpin>(
    mut reader: R,
    tx: mpsc::Sender<String>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        if tx.send(line.to_owned()).await.is_err() {
            return Ok(());
        }
    }
}

/// [forward_lines] for readers that block, must run outside the runtime
fn forward_lines_blocking<R: std::io::BufRead>(
    mut reader: R,
    tx: mpsc::Sender<String>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            continue;
        }
        if tx.blocking_send(line.to_owned()).is_err() {
            return Ok(());
        }
    }
}

/// returns `false` once a [BotCommand::Shutdown] is reached
async fn write_commands<W: AsyncWrite + Unpin>(
    out: &mut W,
    commands: Vec<BotCommand>,
) -> std::io::Result<bool> {
    for command in commands {
        let Some(line) = command.to_line() else {
            out.flush().await?;
            return Ok(false);
        };
        log::debug!("sending {}", line.trim_end());
        out.write_all(line.as_bytes()).await?;
    }
    out.flush().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands, config};

    fn bot() -> Bot {
        let mut bot = Bot::new("privy", NetworkFeatures::default())
            .add_commands(commands::builtin("!", &config::Commands::default()));
        for line in [
            ":irc.example.net 001 privy :Welcome",
            ":privy!p@h JOIN #rust",
            ":irc.example.net 353 privy = #rust :privy ~owner @op +voiced plain",
        ] {
            assert!(bot.handle_line(line).is_empty());
        }
        bot
    }

    fn lines(commands: Vec<BotCommand>) -> Vec<String> {
        commands.iter().filter_map(BotCommand::to_line).collect()
    }

    #[test]
    fn answers_pings() {
        let mut bot = bot();
        assert_eq!(
            lines(bot.handle_line("PING :irc.example.net")),
            ["PONG :irc.example.net\r\n"]
        );
    }

    #[test]
    fn privs_reports_levels() {
        let mut bot = bot();
        assert_eq!(
            lines(bot.handle_line(":plain!p@h PRIVMSG #rust :!privs op")),
            ["PRIVMSG #rust :op has op in #rust\r\n"]
        );
        bot.handle_line(":op!o@h MODE #rust +v plain");
        assert_eq!(
            lines(bot.handle_line(":plain!p@h PRIVMSG #rust :!privs")),
            ["PRIVMSG #rust :plain has voice in #rust\r\n"]
        );
        assert_eq!(
            lines(bot.handle_line(":plain!p@h PRIVMSG #rust :!privs ghost")),
            ["PRIVMSG #rust :ghost is not in #rust\r\n"]
        );
        assert_eq!(
            lines(bot.handle_line(":plain!p@h PRIVMSG privy :!privs")),
            ["PRIVMSG plain :privs only works in a channel\r\n"]
        );
    }

    #[test]
    fn ops_is_gated() {
        let mut bot = bot();
        assert_eq!(
            lines(bot.handle_line(":voiced!v@h PRIVMSG #rust :!ops")),
            ["PRIVMSG #rust :you need to be op or above to do that\r\n"]
        );
        assert_eq!(
            lines(bot.handle_line(":owner!o@h PRIVMSG #rust :!ops")),
            ["PRIVMSG #rust :#rust: ~owner @op +voiced\r\n"]
        );
        // the MODE line is applied before the command is dispatched
        bot.handle_line(":owner!o@h MODE #rust -o op");
        assert_eq!(
            lines(bot.handle_line(":op!o@h PRIVMSG #rust :!ops")),
            ["PRIVMSG #rust :you need to be op or above to do that\r\n"]
        );
    }

    #[test]
    fn admin_commands() {
        let config = config::Commands {
            admins: vec!["alice".into()],
            ..Default::default()
        };
        let mut bot = Bot::new("privy", NetworkFeatures::default())
            .add_commands(commands::builtin("!", &config));

        assert_eq!(
            lines(bot.handle_line(":alice!a@h PRIVMSG privy :!join #go")),
            ["PRIVMSG alice :log in to services first\r\n"]
        );
        assert_eq!(
            lines(bot.handle_line("@account=mallory :mallory!m@h PRIVMSG privy :!join #go")),
            ["PRIVMSG mallory :you are not allowed to do that\r\n"]
        );
        assert_eq!(
            lines(bot.handle_line("@account=alice :Alice!a@h PRIVMSG privy :!join #go")),
            ["PRIVMSG Alice :joining #go\r\n", "JOIN #go\r\n"]
        );
        assert_eq!(
            lines(bot.handle_line("@account=alice :alice!a@h PRIVMSG #go :!join #rust")),
            ["PRIVMSG #go :send that to me directly\r\n"]
        );
        assert_eq!(
            lines(bot.handle_line("@account=alice :alice!a@h PRIVMSG #go :!leave")),
            ["PART #go\r\n"]
        );
        assert_eq!(
            bot.handle_line("@account=alice :alice!a@h PRIVMSG privy :!quit"),
            vec![
                BotCommand::SendRawIrc(MessageBuilder::privmsg("alice", "bye!").to_owned()),
                BotCommand::Shutdown,
            ]
        );
    }

    #[test]
    fn ignores_the_rest() {
        let mut bot = bot();
        assert!(bot.handle_line(":plain!p@h PRIVMSG #rust :hello").is_empty());
        assert!(bot.handle_line("").is_empty());
        assert!(bot.handle_line(":irc.example.net 372 privy :- motd").is_empty());
    }

    #[test]
    fn commands_to_lines() {
        assert_eq!(
            BotCommand::PartChannel("#rust".into()).to_line().as_deref(),
            Some("PART #rust\r\n")
        );
        assert_eq!(
            BotCommand::JoinChannel("#rust".into()).to_line().as_deref(),
            Some("JOIN #rust\r\n")
        );
        assert_eq!(BotCommand::Shutdown.to_line(), None);
    }

    #[tokio::test]
    async fn stops_at_shutdown() {
        let mut out = Vec::new();
        let keep_going = write_commands(
            &mut out,
            vec![
                BotCommand::JoinChannel("#a".into()),
                BotCommand::Shutdown,
                BotCommand::JoinChannel("#b".into()),
            ],
        )
        .await
        .unwrap();
        assert!(!keep_going);
        assert_eq!(out, b"JOIN #a\r\n");
    }

    #[tokio::test]
    async fn forwards_lossy_lines() {
        let (tx, mut rx) = mpsc::channel(8);
        let input: &[u8] = b"PING :a\r\n\r\n:n!u@h PRIVMSG #c :caf\xe9\nPING :b";
        forward_lines(input, tx).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("PING :a"));
        assert_eq!(rx.recv().await.as_deref(), Some(":n!u@h PRIVMSG #c :caf\u{fffd}"));
        assert_eq!(rx.recv().await.as_deref(), Some("PING :b"));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn forwards_lines_from_a_thread() {
        let (tx, mut rx) = mpsc::channel(1);
        let input: &[u8] = b":a!a@h PRIVMSG #c :!quit\r\n\nPING :x\n";
        let reader = std::thread::spawn(move || forward_lines_blocking(input, tx));
        assert_eq!(rx.blocking_recv().as_deref(), Some(":a!a@h PRIVMSG #c :!quit"));
        // dropping the receiver ends the reader instead of blocking it
        drop(rx);
        reader.join().unwrap().unwrap();
    }

    #[test]
    fn dump_lists_channels() {
        let dump = bot().dump_table();
        assert!(dump.contains("#rust"));
        assert!(dump.contains("owner"));
        assert!(dump.contains("plain"));
    }
}
