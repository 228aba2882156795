use super::*;

/// Silent transitions (navigation without an event) allowed per `advance`.
pub const SESSION_GUARD_LIMIT: usize = 10_000;

type Transition = (SessionState, Option<DialogueEvent>);

impl DialogueSession {
    /// Drives the session to its next observable event. `input` must be a
    /// choice exactly when a choice event is pending.
    pub fn advance(&mut self, input: Option<AdvanceInput>) -> Result<DialogueEvent, GabError> {
        let mut input = input;
        let mut guard = 0usize;
        while guard < SESSION_GUARD_LIMIT {
            guard += 1;

            let current = self.state.clone();
            let (next, event) = self.transition(current, input.take())?;
            self.state = next;
            if let Some(event) = event {
                return Ok(event);
            }
        }

        Err(GabError::new(
            "ENGINE_GUARD_EXCEEDED",
            format!(
                "Navigation guard exceeded {} steps without an event.",
                SESSION_GUARD_LIMIT
            ),
        ))
    }

    pub fn next_event(&mut self) -> Result<DialogueEvent, GabError> {
        self.advance(None)
    }

    fn transition(
        &mut self,
        state: SessionState,
        input: Option<AdvanceInput>,
    ) -> Result<Transition, GabError> {
        match (state, input) {
            (SessionState::Idle, _) => Err(GabError::new(
                "ENGINE_NOT_STARTED",
                "Dialogue session has not been started.",
            )),
            (SessionState::ChoicePending(cursor), Some(AdvanceInput::Choice { option_index })) => {
                let next = self.resolve_choice(cursor, option_index)?;
                Ok((next, None))
            }
            (SessionState::ChoicePending(cursor), None) => Err(GabError::new(
                "ENGINE_CHOICE_PENDING",
                format!(
                    "Node '{}' is waiting for a choice; advance needs a choice input.",
                    cursor.node.title
                ),
            )),
            (state, Some(AdvanceInput::Choice { option_index })) => Err(GabError::new(
                "ENGINE_NO_PENDING_CHOICE",
                format!(
                    "Choice {} supplied while the session is {}.",
                    option_index,
                    state.name()
                ),
            )),
            (SessionState::Emitting(cursor), None) => self.emit(cursor),
            (SessionState::CommandPending(cursor), None) => self.navigate(cursor),
            (SessionState::Ended(cursor), None) => {
                Ok((SessionState::Ended(cursor), Some(DialogueEvent::End)))
            }
        }
    }

    /// Lines first, then one choice event, then one command event, then
    /// navigation. A node with options never reaches its command.
    fn emit(&mut self, mut cursor: Cursor) -> Result<Transition, GabError> {
        if let Some(raw) = cursor.next_line() {
            let event = self.line_event(&cursor.node.title, raw);
            cursor.line += 1;
            return Ok((SessionState::Emitting(cursor), Some(event)));
        }

        if !cursor.node.options.is_empty() {
            let event = DialogueEvent::Choice {
                options: cursor.node.options.clone(),
                node: cursor.node.title.clone(),
            };
            return Ok((SessionState::ChoicePending(cursor), Some(event)));
        }

        if let Some(command) = cursor.node.command.clone() {
            let event = DialogueEvent::Command {
                command,
                node: cursor.node.title.clone(),
            };
            return Ok((SessionState::CommandPending(cursor), Some(event)));
        }

        self.navigate(cursor)
    }

    fn line_event(&mut self, node: &str, raw: &str) -> DialogueEvent {
        let (speaker, text) = split_speaker_line(raw);
        if let Some(speaker) = speaker {
            self.active_speaker = Some(speaker.to_string());
        }
        DialogueEvent::Line {
            text: text.to_string(),
            speaker: speaker.map(str::to_string),
            node: node.to_string(),
        }
    }

    fn navigate(&mut self, cursor: Cursor) -> Result<Transition, GabError> {
        if let Some(target) = cursor.node.fallthrough.as_deref() {
            let next = self.goto(target, false)?;
            return Ok((SessionState::Emitting(next), None));
        }

        if let Some(origin) = self.return_stack.last().cloned() {
            let next = self.goto(&origin, true)?;
            self.pop_return();
            return Ok((SessionState::Emitting(next), None));
        }

        info!("dialogue ended at {}", cursor.node.title);
        Ok((SessionState::Ended(cursor), Some(DialogueEvent::End)))
    }

    fn resolve_choice(&mut self, cursor: Cursor, index: usize) -> Result<SessionState, GabError> {
        let option = cursor.node.options.get(index).ok_or_else(|| {
            GabError::new(
                "ENGINE_CHOICE_INDEX",
                format!(
                    "Choice index \"{}\" is out of range for {} option(s).",
                    index,
                    cursor.node.options.len()
                ),
            )
        })?;
        let target = option.target.as_deref().ok_or_else(|| {
            GabError::new(
                "ENGINE_OPTION_NO_TARGET",
                format!(
                    "Option \"{}\" in node '{}' has no jump or detour.",
                    option.text, cursor.node.title
                ),
            )
        })?;

        let next = self.goto(target, false)?;
        if option.detour {
            self.push_return(cursor.node.title.clone());
        }
        Ok(SessionState::Emitting(next))
    }
}
