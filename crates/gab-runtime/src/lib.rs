mod commands;
mod session;

pub use commands::{CommandFn, CommandHandlers, CommandTable, IgnoreCommands};
pub use session::{
    Cursor, DialogueSession, DialogueSessionOptions, SessionState, SESSION_GUARD_LIMIT,
};
