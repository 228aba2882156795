use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::speaker::SpeakerTable;

pub const TAG_EXAMINE: &str = "examine";
pub const TAG_DISABLED: &str = "disabled";
pub const TAG_FINAL: &str = "final";

pub const METADATA_TAGS: &str = "tags";
pub const METADATA_POSITION: &str = "position";
pub const KNOWN_METADATA_KEYS: [&str; 2] = [METADATA_TAGS, METADATA_POSITION];

/// One `title:` block as written by the author. Bodies stay raw until a
/// session or the linter compiles them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptNode {
    pub title: String,
    pub metadata: BTreeMap<String, String>,
    pub body: String,
    pub line: usize,
}

impl ScriptNode {
    pub fn tags(&self) -> BTreeSet<String> {
        self.metadata
            .get(METADATA_TAGS)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    pub line: usize,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GabFile {
    pub nodes: Vec<ScriptNode>,
    pub speakers: SpeakerTable,
}

impl GabFile {
    pub fn node(&self, title: &str) -> Option<&ScriptNode> {
        self.nodes.iter().find(|node| node.title == title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandName {
    LoadPuzzle,
    LoadLevel,
    Return,
}

impl CommandName {
    pub const ALL: [CommandName; 3] = [Self::LoadPuzzle, Self::LoadLevel, Self::Return];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadPuzzle => "loadPuzzle",
            Self::LoadLevel => "loadLevel",
            Self::Return => "return",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.as_str() == name)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueCommand {
    pub name: CommandName,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub text: String,
    pub target: Option<String>,
    pub visited: bool,
    pub detour: bool,
}

/// A node body resolved against one snapshot of the visited set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompiledNode {
    pub title: String,
    pub tags: BTreeSet<String>,
    pub lines: Vec<String>,
    pub options: Vec<DialogueOption>,
    pub fallthrough: Option<String>,
    pub command: Option<DialogueCommand>,
}

impl CompiledNode {
    pub fn is_examine(&self) -> bool {
        self.tags.contains(TAG_EXAMINE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DialogueEvent {
    Line {
        text: String,
        speaker: Option<String>,
        node: String,
    },
    Choice {
        options: Vec<DialogueOption>,
        node: String,
    },
    Command {
        command: DialogueCommand,
        node: String,
    },
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AdvanceInput {
    #[serde(rename_all = "camelCase")]
    Choice { option_index: usize },
}
