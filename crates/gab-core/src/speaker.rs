use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GabError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerDef {
    pub name: String,
    pub talk_anim: Option<String>,
}

impl SpeakerDef {
    /// `none` and the empty string both mean "no animation".
    pub fn animation(&self) -> Option<&str> {
        match self.talk_anim.as_deref() {
            None | Some("") | Some("none") => None,
            Some(anim) => Some(anim),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerTable {
    speakers: BTreeMap<String, SpeakerDef>,
}

impl SpeakerTable {
    pub fn insert(&mut self, speaker: SpeakerDef) {
        self.speakers.insert(speaker.name.clone(), speaker);
    }

    pub fn get(&self, name: &str) -> Option<&SpeakerDef> {
        self.speakers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.speakers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.speakers.keys().map(String::as_str)
    }

    pub fn animation_for(&self, name: &str) -> Result<Option<&str>, GabError> {
        let Some(speaker) = self.speakers.get(name) else {
            return Err(GabError::new(
                "SPEAKER_NOT_FOUND",
                format!("No animation defined for speaker {}", name),
            ));
        };
        Ok(speaker.animation())
    }
}

impl FromIterator<SpeakerDef> for SpeakerTable {
    fn from_iter<I: IntoIterator<Item = SpeakerDef>>(iter: I) -> Self {
        let mut table = Self::default();
        for speaker in iter {
            table.insert(speaker);
        }
        table
    }
}

fn speaker_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_ .'-]*?)\s*:\s*(.*)$")
            .expect("speaker line regex must compile")
    })
}

/// Splits `"Speaker: text"` into its parts. Lines without the pattern come
/// back with no speaker and the text untouched.
pub fn split_speaker_line(line: &str) -> (Option<&str>, &str) {
    let trimmed = line.trim();
    match speaker_line_regex().captures(trimmed) {
        Some(caps) => {
            let speaker = caps.get(1).map(|m| m.as_str());
            let text = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            (speaker, text)
        }
        None => (None, trimmed),
    }
}
