use std::sync::OnceLock;

use regex::Regex;

use crate::*;

/// A `<<...>>` line inside a node body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Jump(String),
    Detour(String),
    Command(DialogueCommand),
    Unknown(String),
}

/// A `{Title}` / `{!Title}` prefix and the text that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate<'a> {
    pub negate: bool,
    pub condition: &'a str,
    pub rest: &'a str,
}

impl Gate<'_> {
    pub fn holds(&self, visited: &BTreeSet<String>) -> bool {
        visited.contains(self.condition) != self.negate
    }
}

fn navigation_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^<<\s*(jump|detour)\s+([A-Za-z0-9_]+)\s*>>")
            .expect("navigation directive regex must compile")
    })
}

fn command_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^<<\s*(loadPuzzle|loadLevel|return)((?:\s+[A-Za-z0-9_]+)*)\s*>>")
            .expect("command directive regex must compile")
    })
}

fn gate_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\{(!?)([^}]+)\}\s*(.*)$").expect("gate regex must compile")
    })
}

/// Classifies a trimmed body line. Returns `None` for anything that does not
/// open with `<<`; text after the closing `>>` is ignored.
pub fn parse_directive(trimmed: &str) -> Option<Directive> {
    if !trimmed.starts_with("<<") {
        return None;
    }

    if let Some(caps) = navigation_regex().captures(trimmed) {
        let target = caps[2].to_string();
        return Some(match &caps[1] {
            "detour" => Directive::Detour(target),
            _ => Directive::Jump(target),
        });
    }

    if let Some(caps) = command_regex().captures(trimmed) {
        let args: Vec<String> = caps
            .get(2)
            .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let name = CommandName::from_name(&caps[1])?;
        // loadPuzzle and loadLevel need a name; return takes none.
        let arity_ok = match name {
            CommandName::Return => args.is_empty(),
            CommandName::LoadPuzzle | CommandName::LoadLevel => !args.is_empty(),
        };
        if arity_ok {
            return Some(Directive::Command(DialogueCommand { name, args }));
        }
    }

    Some(Directive::Unknown(trimmed.to_string()))
}

pub fn parse_gate(text: &str) -> Option<Gate<'_>> {
    let caps = gate_regex().captures(text)?;
    let condition = caps.get(2)?.as_str().trim();
    let rest = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
    Some(Gate {
        negate: caps.get(1).is_some_and(|m| m.as_str() == "!"),
        condition,
        rest,
    })
}
