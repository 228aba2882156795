use std::collections::BTreeSet;

use gab_compiler::{node_edges, parse_directive, parse_gate};
use gab_core::{split_speaker_line, GabFile, ScriptNode};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndefinedSpeaker {
    pub node: String,
    pub speaker: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownGate {
    pub node: String,
    pub condition: String,
}

/// Every `Speaker: text` line whose speaker has no `speaker:` block.
pub fn lint_speakers(file: &GabFile) -> Vec<UndefinedSpeaker> {
    let mut findings = Vec::new();
    for node in &file.nodes {
        let mut reported = BTreeSet::new();
        for raw in node.body.lines() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with("->") || parse_directive(trimmed).is_some()
            {
                continue;
            }
            let text = parse_gate(trimmed).map(|gate| gate.rest).unwrap_or(trimmed);
            let (Some(speaker), _) = split_speaker_line(text) else {
                continue;
            };
            if !file.speakers.contains(speaker) && reported.insert(speaker.to_string()) {
                findings.push(UndefinedSpeaker {
                    node: node.title.clone(),
                    speaker: speaker.to_string(),
                });
            }
        }
    }
    findings
}

/// Nodes that write more than one command directive. Only the last one runs.
pub fn lint_commands(nodes: &[ScriptNode]) -> Vec<String> {
    nodes
        .iter()
        .filter(|node| node_edges(node).command_count > 1)
        .map(|node| node.title.clone())
        .collect()
}

/// Gate conditions naming a title that does not exist; such a gate can
/// never flip.
pub fn lint_gates(nodes: &[ScriptNode]) -> Vec<UnknownGate> {
    let titles = nodes
        .iter()
        .map(|node| node.title.as_str())
        .collect::<BTreeSet<_>>();
    let mut findings = Vec::new();
    for node in nodes {
        for condition in node_edges(node).gate_conditions {
            if !titles.contains(condition.as_str()) {
                findings.push(UnknownGate {
                    node: node.title.clone(),
                    condition,
                });
            }
        }
    }
    findings
}
