//! JOIN, PART, KICK, QUIT and NICK, the messages that add or remove users
//! from channels.

use super::{Join, Kick, Nick, Part, Quit, Welcome, util::split_targets};

impl Join<'_> {
    /// the joined channels, servers send one per line but clients may list
    /// several
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.get_param(0).into_iter().flat_map(|p| split_targets(p))
    }

    pub fn nick(&self) -> Option<&str> {
        self.get_nickname()
    }

    /// the account name from `extended-join`, `None` when logged out or
    /// not sent
    pub fn account(&self) -> Option<&str> {
        self.get_param(1).filter(|a| *a != "*")
    }
}

impl Part<'_> {
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.get_param(0).into_iter().flat_map(|p| split_targets(p))
    }

    pub fn nick(&self) -> Option<&str> {
        self.get_nickname()
    }

    pub fn reason(&self) -> Option<&str> {
        self.get_param(1)
    }
}

impl Kick<'_> {
    pub fn channel(&self) -> Option<&str> {
        self.get_param(0)
    }

    /// the user that was kicked
    pub fn target(&self) -> Option<&str> {
        self.get_param(1)
    }

    /// who did the kicking
    pub fn kicker(&self) -> Option<&str> {
        self.get_nickname()
    }

    pub fn reason(&self) -> Option<&str> {
        self.get_param(2)
    }
}

impl Quit<'_> {
    pub fn nick(&self) -> Option<&str> {
        self.get_nickname()
    }

    pub fn reason(&self) -> Option<&str> {
        self.get_param(0)
    }
}

impl Nick<'_> {
    pub fn old_nick(&self) -> Option<&str> {
        self.get_nickname()
    }

    pub fn new_nick(&self) -> Option<&str> {
        self.get_param(0)
    }
}

impl Welcome<'_> {
    /// the nickname the server registered us with
    pub fn nick(&self) -> Option<&str> {
        self.get_param(0)
    }
}
