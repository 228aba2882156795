use std::collections::BTreeMap;
use std::fmt;

use gab_core::{CommandName, DialogueCommand, GabError};

/// Host side of `<<loadPuzzle>>`, `<<loadLevel>>` and `<<return>>`.
pub trait CommandHandlers: Send + Sync {
    fn handle(&self, command: &DialogueCommand) -> Result<(), GabError>;
}

/// Accepts every command without doing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreCommands;

impl CommandHandlers for IgnoreCommands {
    fn handle(&self, _command: &DialogueCommand) -> Result<(), GabError> {
        Ok(())
    }
}

pub type CommandFn = Box<dyn Fn(&[String]) -> Result<(), GabError> + Send + Sync>;

/// Handlers keyed by command name. A command with no entry fails with
/// `ENGINE_COMMAND_UNHANDLED`.
#[derive(Default)]
pub struct CommandTable {
    handlers: BTreeMap<CommandName, CommandFn>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, name: CommandName, handler: F) -> Self
    where
        F: Fn(&[String]) -> Result<(), GabError> + Send + Sync + 'static,
    {
        self.insert(name, handler);
        self
    }

    pub fn insert<F>(&mut self, name: CommandName, handler: F)
    where
        F: Fn(&[String]) -> Result<(), GabError> + Send + Sync + 'static,
    {
        self.handlers.insert(name, Box::new(handler));
    }

    pub fn contains(&self, name: CommandName) -> bool {
        self.handlers.contains_key(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = CommandName> + '_ {
        self.handlers.keys().copied()
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CommandHandlers for CommandTable {
    fn handle(&self, command: &DialogueCommand) -> Result<(), GabError> {
        let handler = self.handlers.get(&command.name).ok_or_else(|| {
            GabError::new(
                "ENGINE_COMMAND_UNHANDLED",
                format!("No handler registered for command \"{}\".", command.name),
            )
        })?;
        handler(&command.args)
    }
}
