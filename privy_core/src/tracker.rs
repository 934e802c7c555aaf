//! Keeps a [PrivilegeTable](crate::table::PrivilegeTable) in sync with the
//! messages received on one connection.

use crate::{
    irc_message::{AnySemantic, ISupport, Join, Kick, Mode, NamReply, Nick, Part, Quit},
    isupport::NetworkFeatures,
    privilege::PrivilegeLevel,
    table::{PrivilegeTable, SharedPrivileges},
};

/// Feeds membership and MODE messages into a [SharedPrivileges].
///
/// Messages have to be handed to [handle](Self::handle) in the order they
/// were received, the tracker is the table's only writer.
#[derive(Debug, Clone)]
pub struct ChannelTracker {
    nick: String,
    features: NetworkFeatures,
    privileges: SharedPrivileges,
}

impl ChannelTracker {
    pub fn new(nick: impl Into<String>, features: NetworkFeatures) -> Self {
        let privileges = SharedPrivileges::new(PrivilegeTable::with_casemapping(features.casemapping));
        Self {
            nick: nick.into(),
            features,
            privileges,
        }
    }

    /// the bot's current nickname
    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn features(&self) -> &NetworkFeatures {
        &self.features
    }

    /// a handle for querying, clones share the same table
    pub fn privileges(&self) -> &SharedPrivileges {
        &self.privileges
    }

    pub fn is_me(&self, nick: &str) -> bool {
        self.features.casemapping.eq(nick, &self.nick)
    }

    /// updates the table from `msg`, returns whether the message was one the
    /// tracker cares about
    pub fn handle(&mut self, msg: &AnySemantic<'_>) -> bool {
        match msg {
            AnySemantic::Welcome(welcome) => {
                if let Some(nick) = welcome.nick() {
                    if nick != self.nick {
                        log::info!("server registered us as {nick}");
                        nick.clone_into(&mut self.nick);
                    }
                }
                true
            }
            AnySemantic::ISupport(isupport) => {
                self.on_isupport(isupport);
                true
            }
            AnySemantic::Join(join) => {
                self.on_join(join);
                true
            }
            AnySemantic::Part(part) => {
                self.on_part(part);
                true
            }
            AnySemantic::Kick(kick) => {
                self.on_kick(kick);
                true
            }
            AnySemantic::Quit(quit) => {
                match quit.nick() {
                    Some(nick) => {
                        let channels = self.privileges.write().quit_user(nick);
                        log::debug!("{nick} quit, removed from {channels} channels");
                    }
                    None => log::warn!("QUIT without a source: {}", quit.raw().trim_end()),
                }
                true
            }
            AnySemantic::Nick(nick) => {
                self.on_nick(nick);
                true
            }
            AnySemantic::Mode(mode) => self.on_mode(mode),
            AnySemantic::NamReply(names) => {
                self.on_names(names);
                true
            }
            _ => false,
        }
    }

    fn on_isupport(&mut self, isupport: &ISupport<'_>) {
        let mut changed = false;
        for token in isupport.tokens() {
            changed |= self.features.apply_token(token);
        }
        if changed {
            log::debug!(
                "network features: PREFIX={} CHANMODES={} CHANTYPES={} CASEMAPPING={}",
                self.features.prefixes,
                self.features.chanmodes,
                self.features.chantypes,
                self.features.casemapping
            );
            self.privileges
                .write()
                .set_casemapping(self.features.casemapping);
        }
    }

    fn on_join(&mut self, join: &Join<'_>) {
        let Some(nick) = join.nick() else {
            log::warn!("JOIN without a source: {}", join.raw().trim_end());
            return;
        };
        let mut table = self.privileges.write();
        for channel in join.channels() {
            if self.is_me(nick) {
                log::info!("joined {channel}");
                // a fresh NAMES reply follows, anything left over is stale
                table.remove_channel(channel);
                table.add_channel(channel);
            } else {
                table.join_user(channel, nick);
            }
        }
    }

    fn on_part(&mut self, part: &Part<'_>) {
        let Some(nick) = part.nick() else {
            log::warn!("PART without a source: {}", part.raw().trim_end());
            return;
        };
        let mut table = self.privileges.write();
        for channel in part.channels() {
            if self.is_me(nick) {
                log::info!("left {channel}");
                table.remove_channel(channel);
            } else {
                table.remove_user(channel, nick);
            }
        }
    }

    fn on_kick(&mut self, kick: &Kick<'_>) {
        let (Some(channel), Some(target)) = (kick.channel(), kick.target()) else {
            log::warn!("malformed KICK: {}", kick.raw().trim_end());
            return;
        };
        let mut table = self.privileges.write();
        if self.is_me(target) {
            log::info!(
                "kicked from {channel} by {}: {}",
                kick.kicker().unwrap_or("<unknown>"),
                kick.reason().unwrap_or_default()
            );
            table.remove_channel(channel);
        } else {
            table.remove_user(channel, target);
        }
    }

    fn on_nick(&mut self, nick: &Nick<'_>) {
        let (Some(old), Some(new)) = (nick.old_nick(), nick.new_nick()) else {
            log::warn!("malformed NICK: {}", nick.raw().trim_end());
            return;
        };
        if self.is_me(old) {
            log::info!("our nick changed from {old} to {new}");
            new.clone_into(&mut self.nick);
        }
        self.privileges.write().rename_user(old, new);
    }

    fn on_mode(&mut self, mode: &Mode<'_>) -> bool {
        let Some(mut event) = mode.to_event(&self.features) else {
            return false;
        };
        // letters like `q` are list modes on some networks
        let prefixes = &self.features.prefixes;
        event.changes.retain(|change| {
            let keep = prefixes.is_prefix_mode(change.mode);
            if !keep && PrivilegeLevel::from_mode_char(change.mode).is_some() {
                log::debug!(
                    "{}: {} is not a prefix mode on this network",
                    event.channel,
                    change
                );
            }
            keep
        });
        if event.is_empty() {
            return true;
        }
        log::trace!(
            "{}: {}",
            event.channel,
            event
                .changes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.privileges.apply_mode_event(&event);
        true
    }

    fn on_names(&mut self, names: &NamReply<'_>) {
        let Some(channel) = names.channel() else {
            log::warn!("malformed NAMES reply: {}", names.raw().trim_end());
            return;
        };
        let mut table = self.privileges.write();
        for entry in names.entries() {
            let (level, nick) = self.features.prefixes.split_nick(entry);
            // userhost-in-names
            let nick = nick.split_once('!').map_or(nick, |(nick, _)| nick);
            if nick.is_empty() {
                continue;
            }
            table.add_user(channel, nick, level);
        }
    }
}
