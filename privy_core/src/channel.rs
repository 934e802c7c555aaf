use hashbrown::HashMap;

use crate::{mode::ModeSign, privilege::PrivilegeLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// the nickname as it was last seen, keys are normalized
    pub nick: String,
    pub privileges: PrivilegeLevel,
}

/// The members of one channel and what each of them holds there.
///
/// Every method takes an already normalized `key`, see
/// [PrivilegeTable](crate::table::PrivilegeTable) for the casemapped API.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    name: String,
    members: HashMap<String, Member>,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Member> {
        self.members.get(key)
    }

    pub fn privileges_of(&self, key: &str) -> PrivilegeLevel {
        self.members
            .get(key)
            .map(|m| m.privileges)
            .unwrap_or(PrivilegeLevel::NONE)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// grants or revokes `flag`, creating the member at
    /// [NONE](PrivilegeLevel::NONE) first if needed. Returns the new level.
    pub fn apply(&mut self, key: String, nick: &str, sign: ModeSign, flag: PrivilegeLevel) -> PrivilegeLevel {
        let member = self.members.entry(key).or_insert_with(|| Member {
            nick: nick.to_owned(),
            privileges: PrivilegeLevel::NONE,
        });
        member.privileges = match sign {
            ModeSign::Grant => member.privileges.grant(flag),
            ModeSign::Revoke => member.privileges.revoke(flag),
        };
        member.privileges
    }

    /// inserts or overwrites a member
    pub fn set(&mut self, key: String, nick: &str, privileges: PrivilegeLevel) {
        self.members.insert(
            key,
            Member {
                nick: nick.to_owned(),
                privileges,
            },
        );
    }

    /// adds a member at [NONE](PrivilegeLevel::NONE) unless it is already known
    pub fn insert(&mut self, key: String, nick: &str) {
        self.members.entry(key).or_insert_with(|| Member {
            nick: nick.to_owned(),
            privileges: PrivilegeLevel::NONE,
        });
    }

    pub fn remove(&mut self, key: &str) -> Option<Member> {
        self.members.remove(key)
    }

    /// moves a member to a new key, returns `false` if `old_key` wasn't a member
    pub fn rename(&mut self, old_key: &str, new_key: String, new_nick: &str) -> bool {
        let Some(mut member) = self.members.remove(old_key) else {
            return false;
        };
        new_nick.clone_into(&mut member.nick);
        self.members.insert(new_key, member);
        true
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub(crate) fn rekey(&mut self, keys: impl Fn(&str) -> String) {
        self.members = self
            .members
            .drain()
            .map(|(_, member)| (keys(&member.nick), member))
            .collect();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_creates_members() {
        let mut chan = Channel::new("#test");
        assert_eq!(
            chan.apply("alice".into(), "Alice", ModeSign::Revoke, PrivilegeLevel::OP),
            PrivilegeLevel::NONE
        );
        assert!(chan.contains("alice"));
        assert_eq!(
            chan.apply("alice".into(), "Alice", ModeSign::Grant, PrivilegeLevel::VOICE),
            PrivilegeLevel::VOICE
        );
        assert_eq!(chan.get("alice").map(|m| m.nick.as_str()), Some("Alice"));
    }

    #[test]
    fn insert_keeps_existing_privileges() {
        let mut chan = Channel::new("#test");
        chan.set("alice".into(), "alice", PrivilegeLevel::OP);
        chan.insert("alice".into(), "alice");
        assert_eq!(chan.privileges_of("alice"), PrivilegeLevel::OP);
    }

    #[test]
    fn rename_moves_privileges() {
        let mut chan = Channel::new("#test");
        chan.set("alice".into(), "alice", PrivilegeLevel::HALFOP);
        assert!(chan.rename("alice", "al".into(), "Al"));
        assert!(!chan.rename("alice", "al".into(), "Al"));
        assert_eq!(chan.privileges_of("al"), PrivilegeLevel::HALFOP);
        assert_eq!(chan.privileges_of("alice"), PrivilegeLevel::NONE);
        assert_eq!(chan.len(), 1);
    }
}
