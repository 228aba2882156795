use super::*;

/// A compiled node plus the index of the next line to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub node: CompiledNode,
    pub line: usize,
}

impl Cursor {
    pub fn at_start(node: CompiledNode) -> Self {
        Self { node, line: 0 }
    }

    /// Used when popping the return stack; lines already delivered are not
    /// repeated.
    pub fn skip_to_choices(node: CompiledNode) -> Self {
        let line = node.lines.len();
        Self { node, line }
    }

    pub fn next_line(&self) -> Option<&str> {
        self.node.lines.get(self.line).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Emitting(Cursor),
    ChoicePending(Cursor),
    CommandPending(Cursor),
    /// Keeps the last node so hosts can still ask whether it was an examine
    /// node after the dialogue finished.
    Ended(Cursor),
}

impl SessionState {
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Self::Idle => None,
            Self::Emitting(cursor)
            | Self::ChoicePending(cursor)
            | Self::CommandPending(cursor)
            | Self::Ended(cursor) => Some(cursor),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Emitting(_) => "emitting",
            Self::ChoicePending(_) => "choicePending",
            Self::CommandPending(_) => "commandPending",
            Self::Ended(_) => "ended",
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended(_))
    }
}
