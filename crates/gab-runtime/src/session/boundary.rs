use super::*;

impl DialogueSession {
    pub fn choose(&mut self, index: usize) -> Result<DialogueEvent, GabError> {
        self.advance(Some(AdvanceInput::Choice {
            option_index: index,
        }))
    }

    pub fn pending_choice(&self) -> Option<&[DialogueOption]> {
        match &self.state {
            SessionState::ChoicePending(cursor) => Some(&cursor.node.options),
            _ => None,
        }
    }

    pub fn pending_command(&self) -> Option<&DialogueCommand> {
        match &self.state {
            SessionState::CommandPending(cursor) => cursor.node.command.as_ref(),
            _ => None,
        }
    }

    /// Runs the registered handler for the command event just emitted. The
    /// session stays on the command until the next `advance`.
    pub fn execute_pending_command(&self) -> Result<(), GabError> {
        let command = self.pending_command().ok_or_else(|| {
            GabError::new(
                "ENGINE_NO_PENDING_COMMAND",
                format!("No pending command while the session is {}.", self.state.name()),
            )
        })?;
        debug!("executing {} {:?}", command.name, command.args);
        self.command_handlers.handle(command)
    }
}
