use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    casemap::Casemapping,
    channel::{Channel, Member},
    mode::{ModeEvent, ModeSign},
    privilege::PrivilegeLevel,
};

/// Per-channel privileges of every known user.
///
/// This is a best-effort cache of what the server told us. Nothing here
/// fails: unknown mode letters and target-less changes are skipped, queries
/// about unknown channels or users answer [NONE](PrivilegeLevel::NONE), and
/// removing something that isn't there does nothing.
#[derive(Debug, Clone, Default)]
pub struct PrivilegeTable {
    casemapping: Casemapping,
    channels: HashMap<String, Channel>,
}

impl PrivilegeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_casemapping(casemapping: Casemapping) -> Self {
        Self {
            casemapping,
            channels: HashMap::new(),
        }
    }

    pub fn casemapping(&self) -> Casemapping {
        self.casemapping
    }

    /// switches to a new casemapping, re-keying everything already stored
    pub fn set_casemapping(&mut self, casemapping: Casemapping) {
        if casemapping == self.casemapping {
            return;
        }
        log::debug!("switching casemapping from {} to {casemapping}", self.casemapping);
        self.casemapping = casemapping;
        self.channels = self
            .channels
            .drain()
            .map(|(_, mut chan)| {
                chan.rekey(|nick| casemapping.normalize(nick));
                (casemapping.normalize(chan.name()), chan)
            })
            .collect();
    }

    fn key(&self, name: &str) -> String {
        self.casemapping.normalize(name)
    }

    fn channel_entry(&mut self, channel: &str) -> &mut Channel {
        let key = self.key(channel);
        self.channels
            .entry(key)
            .or_insert_with(|| Channel::new(channel))
    }

    /// starts tracking `channel`, keeping its members if it is already known
    pub fn add_channel(&mut self, channel: &str) -> &mut Channel {
        self.channel_entry(channel)
    }

    pub fn remove_channel(&mut self, channel: &str) -> Option<Channel> {
        let key = self.key(channel);
        self.channels.remove(&key)
    }

    /// Grants or revokes the privilege behind `flag_char` for `target_nick`.
    ///
    /// Letters that aren't privilege modes leave the table untouched. The
    /// channel and the user are created on demand.
    pub fn apply_mode(&mut self, channel: &str, sign: ModeSign, flag_char: char, target_nick: &str) {
        let Some(flag) = PrivilegeLevel::from_mode_char(flag_char) else {
            log::debug!("{channel}: {}{flag_char} is not a privilege mode", sign.as_char());
            return;
        };
        let key = self.key(target_nick);
        let level = self
            .channel_entry(channel)
            .apply(key, target_nick, sign, flag);
        log::trace!(
            "{channel}: {}{flag_char} {target_nick} -> {:?}",
            sign.as_char(),
            level
        );
    }

    /// applies every change of `event` in order, changes without a target
    /// are discarded
    pub fn apply_mode_event(&mut self, event: &ModeEvent) {
        for change in &event.changes {
            match &change.target {
                Some(target) => self.apply_mode(&event.channel, change.sign, change.mode, target),
                None if PrivilegeLevel::from_mode_char(change.mode).is_some() => {
                    log::debug!(
                        "{}: discarding {}{} without a target",
                        event.channel,
                        change.sign.as_char(),
                        change.mode
                    );
                }
                None => {}
            }
        }
    }

    /// sets a user's privileges outright, e.g. from a `NAMES` reply
    pub fn add_user(&mut self, channel: &str, nick: &str, level: PrivilegeLevel) {
        let key = self.key(nick);
        self.channel_entry(channel).set(key, nick, level);
    }

    /// adds a user without privileges, keeping whatever is already known
    /// about them
    pub fn join_user(&mut self, channel: &str, nick: &str) {
        let key = self.key(nick);
        self.channel_entry(channel).insert(key, nick);
    }

    pub fn remove_user(&mut self, channel: &str, nick: &str) {
        let (chan_key, nick_key) = (self.key(channel), self.key(nick));
        if let Some(chan) = self.channels.get_mut(&chan_key) {
            chan.remove(&nick_key);
        }
    }

    /// follows a nick change in every channel, returns the number of
    /// channels the user was in
    pub fn rename_user(&mut self, old: &str, new: &str) -> usize {
        let (old_key, new_key) = (self.key(old), self.key(new));
        self.channels
            .values_mut()
            .map(|chan| chan.rename(&old_key, new_key.clone(), new))
            .filter(|renamed| *renamed)
            .count()
    }

    /// removes a user from every channel, returns the number of channels
    /// they were in
    pub fn quit_user(&mut self, nick: &str) -> usize {
        let key = self.key(nick);
        self.channels
            .values_mut()
            .filter_map(|chan| chan.remove(&key))
            .count()
    }

    pub fn privileges_of(&self, channel: &str, nick: &str) -> PrivilegeLevel {
        self.channel(channel)
            .map(|chan| chan.privileges_of(&self.key(nick)))
            .unwrap_or(PrivilegeLevel::NONE)
    }

    pub fn is_voiced(&self, channel: &str, nick: &str) -> bool {
        self.privileges_of(channel, nick)
            .has_flag(PrivilegeLevel::VOICE)
    }

    pub fn is_op(&self, channel: &str, nick: &str) -> bool {
        self.privileges_of(channel, nick).has_flag(PrivilegeLevel::OP)
    }

    /// whether `nick` holds `level` or anything above it in `channel`
    pub fn has_privilege(&self, channel: &str, nick: &str, level: PrivilegeLevel) -> bool {
        self.privileges_of(channel, nick).at_least(level)
    }

    pub fn channel(&self, channel: &str) -> Option<&Channel> {
        self.channels.get(&self.key(channel))
    }

    pub fn has_channel(&self, channel: &str) -> bool {
        self.channel(channel).is_some()
    }

    pub fn contains_user(&self, channel: &str, nick: &str) -> bool {
        self.channel(channel)
            .is_some_and(|chan| chan.contains(&self.key(nick)))
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    /// members of `channel`, empty for unknown channels
    pub fn users<'a>(&'a self, channel: &str) -> impl Iterator<Item = &'a Member> + use<'a> {
        self.channel(channel).into_iter().flat_map(|chan| chan.members())
    }
}

/// A [PrivilegeTable] shared between the message path, which is the only
/// writer, and any number of readers.
///
/// A whole [ModeEvent] is applied under one write lock, so readers see a
/// user either before or after every change of a MODE line, never halfway.
#[derive(Debug, Clone, Default)]
pub struct SharedPrivileges {
    inner: Arc<RwLock<PrivilegeTable>>,
}

impl SharedPrivileges {
    pub fn new(table: PrivilegeTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, PrivilegeTable> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, PrivilegeTable> {
        self.inner.write()
    }

    pub fn apply_mode_event(&self, event: &ModeEvent) {
        self.write().apply_mode_event(event);
    }

    pub fn privileges_of(&self, channel: &str, nick: &str) -> PrivilegeLevel {
        self.read().privileges_of(channel, nick)
    }

    pub fn is_voiced(&self, channel: &str, nick: &str) -> bool {
        self.read().is_voiced(channel, nick)
    }

    pub fn is_op(&self, channel: &str, nick: &str) -> bool {
        self.read().is_op(channel, nick)
    }

    pub fn has_privilege(&self, channel: &str, nick: &str, level: PrivilegeLevel) -> bool {
        self.read().has_privilege(channel, nick, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isupport::NetworkFeatures;

    use PrivilegeLevel as P;

    #[test]
    fn op_is_not_voice() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#test", ModeSign::Grant, 'o', "Alice");
        assert!(table.is_op("#test", "Alice"));
        assert!(!table.is_voiced("#test", "Alice"));
        assert!(table.has_privilege("#test", "Alice", P::VOICE));
    }

    #[test]
    fn grant_then_revoke() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#test", ModeSign::Grant, 'o', "Alice");
        table.apply_mode("#test", ModeSign::Revoke, 'o', "Alice");
        assert_eq!(table.privileges_of("#test", "Alice"), P::NONE);
        // the entry survives the revoke
        assert!(table.contains_user("#test", "Alice"));
    }

    #[test]
    fn flags_do_not_combine() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#test", ModeSign::Grant, 'v', "Alice");
        table.apply_mode("#test", ModeSign::Grant, 'o', "Alice");
        let level = table.privileges_of("#test", "Alice");
        assert!(level.has_flag(P::VOICE));
        assert!(level.has_flag(P::OP));
        assert!(level.at_least(P::OP));
        assert!(!level.has_flag(P::HALFOP));
    }

    #[test]
    fn mode_event_pairs_positionally() {
        let mut table = PrivilegeTable::new();
        let event = ModeEvent::parse("#test", "+ov", ["Alice", "Bob"], &NetworkFeatures::default());
        table.apply_mode_event(&event);
        assert_eq!(table.privileges_of("#test", "Alice"), P::OP);
        assert_eq!(table.privileges_of("#test", "Bob"), P::VOICE);
    }

    #[test]
    fn mode_event_order_matters() {
        let mut table = PrivilegeTable::new();
        let features = NetworkFeatures::default();
        table.apply_mode_event(&ModeEvent::parse("#test", "+o-o", ["Alice", "Alice"], &features));
        table.apply_mode_event(&ModeEvent::parse("#test", "-o+o", ["Bob", "Bob"], &features));
        assert_eq!(table.privileges_of("#test", "Alice"), P::NONE);
        assert_eq!(table.privileges_of("#test", "Bob"), P::OP);
    }

    #[test]
    fn targetless_changes_are_discarded() {
        let mut table = PrivilegeTable::new();
        let event = ModeEvent::new("#test")
            .with_change(ModeSign::Grant, 'v', None)
            .with_change(ModeSign::Grant, 'o', Some("Alice"));
        table.apply_mode_event(&event);
        assert_eq!(table.privileges_of("#test", "Alice"), P::OP);
        assert_eq!(table.users("#test").count(), 1);
    }

    #[test]
    fn unknown_letters_are_ignored() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#test", ModeSign::Grant, 'x', "Alice");
        table.apply_mode("#test", ModeSign::Grant, 'b', "*!*@host");
        assert!(!table.has_channel("#test"));
        assert_eq!(table.privileges_of("#test", "Alice"), P::NONE);
    }

    #[test]
    fn unknown_users_have_nothing() {
        let mut table = PrivilegeTable::new();
        table.add_channel("#test");
        assert_eq!(table.privileges_of("#test", "Nobody"), P::NONE);
        assert!(!table.has_privilege("#test", "Nobody", P::VOICE));
        assert!(table.has_privilege("#test", "Nobody", P::NONE));
        assert_eq!(table.privileges_of("#elsewhere", "Nobody"), P::NONE);
    }

    #[test]
    fn remove_user_is_idempotent() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#test", ModeSign::Grant, 'o', "Alice");
        table.remove_user("#test", "Alice");
        table.remove_user("#test", "Alice");
        table.remove_user("#nowhere", "Alice");
        assert!(!table.is_op("#test", "Alice"));
        assert!(!table.contains_user("#test", "Alice"));
    }

    #[test]
    fn privileges_are_channel_scoped() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#a", ModeSign::Grant, 'o', "Alice");
        table.apply_mode("#b", ModeSign::Grant, 'v', "Alice");
        assert_eq!(table.privileges_of("#a", "Alice"), P::OP);
        assert_eq!(table.privileges_of("#b", "Alice"), P::VOICE);

        assert!(table.remove_channel("#a").is_some());
        assert!(table.remove_channel("#a").is_none());
        assert_eq!(table.privileges_of("#a", "Alice"), P::NONE);
        assert_eq!(table.privileges_of("#b", "Alice"), P::VOICE);
    }

    #[test]
    fn keys_are_casemapped() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#Chan", ModeSign::Grant, 'o', "Nick[a]");
        assert!(table.is_op("#chan", "nick{A}"));
        table.remove_user("#CHAN", "NICK{A}");
        assert!(!table.contains_user("#chan", "nick[a]"));
    }

    #[test]
    fn switching_casemapping_rekeys() {
        let mut table = PrivilegeTable::with_casemapping(Casemapping::Ascii);
        table.apply_mode("#test", ModeSign::Grant, 'o', "Nick[a]");
        assert!(!table.is_op("#test", "nick{a}"));
        table.set_casemapping(Casemapping::Rfc1459);
        assert!(table.is_op("#TEST", "nick{a}"));
        assert_eq!(
            table.users("#test").map(|m| m.nick.as_str()).collect::<Vec<_>>(),
            vec!["Nick[a]"]
        );
    }

    #[test]
    fn rename_and_quit() {
        let mut table = PrivilegeTable::new();
        table.apply_mode("#a", ModeSign::Grant, 'o', "Alice");
        table.apply_mode("#b", ModeSign::Grant, 'q', "Alice");
        table.join_user("#c", "Bob");

        assert_eq!(table.rename_user("Alice", "Alicia"), 2);
        assert_eq!(table.privileges_of("#a", "Alicia"), P::OP);
        assert_eq!(table.privileges_of("#b", "alicia"), P::OWNER);
        assert_eq!(table.privileges_of("#a", "Alice"), P::NONE);

        assert_eq!(table.quit_user("Alicia"), 2);
        assert!(!table.contains_user("#b", "Alicia"));
        assert_eq!(table.quit_user("Alicia"), 0);
        assert!(table.contains_user("#c", "Bob"));
    }

    #[test]
    fn shared_handle_sees_writes() {
        let shared = SharedPrivileges::default();
        let reader = shared.clone();
        shared.apply_mode_event(
            &ModeEvent::new("#test").with_change(ModeSign::Grant, 'h', Some("Alice")),
        );
        assert!(reader.has_privilege("#test", "Alice", P::HALFOP));
        assert!(!reader.is_op("#test", "Alice"));
        assert_eq!(reader.privileges_of("#test", "alice"), P::HALFOP);
    }

    #[test]
    fn concurrent_readers_see_whole_events() {
        let shared = SharedPrivileges::default();
        let event = ModeEvent::new("#test")
            .with_change(ModeSign::Grant, 'o', Some("Alice"))
            .with_change(ModeSign::Grant, 'v', Some("Alice"));

        std::thread::scope(|s| {
            let reader = shared.clone();
            let handle = s.spawn(move || {
                for _ in 0..1000 {
                    let level = reader.privileges_of("#test", "Alice");
                    assert!(level == P::NONE || level == P::OP | P::VOICE, "saw {level:?}");
                }
            });
            shared.apply_mode_event(&event);
            handle.join().unwrap();
        });
    }
}
