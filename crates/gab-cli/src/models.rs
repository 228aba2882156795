use std::path::PathBuf;

use gab_core::{DialogueCommand, DialogueOption};
use serde::Serialize;

#[derive(Debug, Clone)]
pub(crate) struct LoadedScript {
    pub(crate) path: PathBuf,
    pub(crate) text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LineOutput {
    pub(crate) speaker: Option<String>,
    pub(crate) text: String,
}

/// What happened between two boundaries, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TranscriptEntry {
    Line(LineOutput),
    Command(DialogueCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryEvent {
    Choice,
    End,
}

#[derive(Debug, Clone)]
pub(crate) struct BoundaryResult {
    pub(crate) event: BoundaryEvent,
    pub(crate) transcript: Vec<TranscriptEntry>,
    pub(crate) choices: Vec<DialogueOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineCommandAction {
    NotHandled,
    Continue,
    Restart,
    Quit,
}
