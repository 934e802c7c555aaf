use crate::{isupport::NetworkFeatures, mode::ModeEvent};

use super::Mode;

impl Mode<'_> {
    /// the channel or nickname whose modes changed
    pub fn target(&self) -> Option<&str> {
        self.get_param(0)
    }

    pub fn modestring(&self) -> Option<&str> {
        self.get_param(1)
    }

    /// the arguments following the mode string
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.params().skip(2)
    }

    pub fn is_channel_mode(&self, features: &NetworkFeatures) -> bool {
        self.target().is_some_and(|t| features.is_channel(t))
    }

    /// the changes of a channel MODE, `None` for user modes and for MODE
    /// lines without a mode string
    pub fn to_event(&self, features: &NetworkFeatures) -> Option<ModeEvent> {
        let channel = self.target().filter(|t| features.is_channel(t))?;
        let modestring = self.modestring()?;
        Some(ModeEvent::parse(channel, modestring, self.arguments(), features))
    }
}
