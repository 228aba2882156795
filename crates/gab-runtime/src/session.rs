use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use gab_compiler::compile_node;
use gab_core::{
    split_speaker_line, AdvanceInput, CompiledNode, DialogueCommand, DialogueEvent,
    DialogueOption, GabError, GabFile, ScriptNode, SpeakerTable,
};
use log::{debug, info};

use crate::{CommandHandlers, IgnoreCommands};

mod boundary;
mod lifecycle;
mod state;
mod step;

pub use lifecycle::{DialogueSession, DialogueSessionOptions};
pub use state::{Cursor, SessionState};
pub use step::SESSION_GUARD_LIMIT;
