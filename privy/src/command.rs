use crate::{
    guard::{CommandGuard, Guard, GuardContext},
    response::{BotResponse, IntoResponse},
};

/// What a handler gets: the [GuardContext] the command passed with, and
/// whatever followed the command name.
pub struct CommandContext<'a> {
    pub cx: GuardContext<'a>,
    pub args: &'a str,
}

impl<'a> CommandContext<'a> {
    pub fn args(&self) -> impl Iterator<Item = &'a str> {
        self.args.split_ascii_whitespace()
    }
}

impl<'a> std::ops::Deref for CommandContext<'a> {
    type Target = GuardContext<'a>;

    fn deref(&self) -> &Self::Target {
        &self.cx
    }
}

pub trait CommandHandler: Send + Sync + 'static {
    fn handle(&self, cx: &CommandContext) -> Option<BotResponse>;

    fn clone_boxed(&self) -> Box<dyn CommandHandler>;
}

impl<F, R> CommandHandler for F
where
    F: Fn(&CommandContext) -> R + Clone + Send + Sync + 'static,
    R: IntoResponse,
{
    fn handle(&self, cx: &CommandContext) -> Option<BotResponse> {
        self(cx).into_response()
    }

    fn clone_boxed(&self) -> Box<dyn CommandHandler> {
        Box::new(self.clone())
    }
}

#[derive(Clone)]
pub struct StaticMessageHandler {
    pub msg: String,
}

impl CommandHandler for StaticMessageHandler {
    fn handle(&self, _cx: &CommandContext) -> Option<BotResponse> {
        Some(BotResponse::Message(self.msg.clone()))
    }

    fn clone_boxed(&self) -> Box<dyn CommandHandler> {
        Box::new(self.clone())
    }
}

/// What happened when a message was offered to a [Command]
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// not this command
    Skipped,
    /// one of the guards said no, carrying its message if it has one
    Denied(Option<String>),
    Handled(Option<BotResponse>),
}

/// Holds command logic and information, you should use [CommandBuilder]
/// instead if you plan on adding [Guard]s
pub struct Command {
    matcher: CommandGuard,
    guards: Vec<Box<dyn Guard>>,
    pub handler: Box<dyn CommandHandler>,
}

impl Clone for Command {
    fn clone(&self) -> Self {
        Self {
            matcher: self.matcher.clone(),
            guards: self.guards.iter().map(|g| g.clone_boxed()).collect(),
            handler: self.handler.clone_boxed(),
        }
    }
}

impl Command {
    pub fn new(
        handler: impl CommandHandler,
        names: Vec<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            matcher: CommandGuard::new(names, prefix),
            guards: vec![],
            handler: Box::new(handler),
        }
    }

    /// Runs the guards in the order they were added and stops at the first
    /// one that fails. The handler only runs once every guard passed.
    pub fn dispatch(&self, cx: &GuardContext) -> Dispatch {
        if !self.matcher.check(cx) {
            return Dispatch::Skipped;
        }
        let args = self
            .matcher
            .arguments(cx.message().message_text())
            .unwrap_or_default();

        if let Some(failed) = self.guards.iter().find(|guard| !guard.check(cx)) {
            return Dispatch::Denied(failed.denial(cx).map(ToOwned::to_owned));
        }

        let cx = CommandContext { cx: *cx, args };
        Dispatch::Handled(self.handler.handle(&cx))
    }
}

pub struct CommandBuilder {
    command: Command,
}

impl CommandBuilder {
    pub fn new(handler: impl CommandHandler, names: Vec<String>, prefix: impl Into<String>) -> Self {
        Self {
            command: Command::new(handler, names, prefix),
        }
    }

    pub fn build(self) -> Command {
        self.command
    }

    /// adds a guard after the ones already added
    pub fn and(mut self, guard: impl Guard) -> Self {
        self.command.guards.push(Box::new(guard));
        self
    }

    /// lets either the last added guard or `guard` pass
    pub fn or<G: Guard + Clone>(mut self, guard: G) -> Self {
        match self.command.guards.pop() {
            Some(last) => self.command.guards.push(Box::new(last.or(guard))),
            None => self.command.guards.push(Box::new(guard)),
        }
        self
    }
}
