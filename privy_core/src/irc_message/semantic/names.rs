use super::{EndOfNames, NamReply};

impl NamReply<'_> {
    /// `353 <me> <symbol> <channel> :<names>`, some servers leave out the
    /// symbol so the channel is taken from the end
    pub fn channel(&self) -> Option<&str> {
        self.get_param(self.param_count().checked_sub(2)?)
    }

    /// the raw entries, still carrying their prefix symbols and, with
    /// `userhost-in-names`, their `!user@host`
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.param_count()
            .checked_sub(1)
            .and_then(|idx| self.get_param(idx))
            .into_iter()
            .flat_map(|p| p.split_ascii_whitespace())
    }
}

impl EndOfNames<'_> {
    pub fn channel(&self) -> Option<&str> {
        self.get_param(1)
    }
}
