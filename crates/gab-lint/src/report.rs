use gab_core::{GabFile, ScriptNode};
use gab_parser::parse_gab_file_collecting;
use serde::Serialize;

use crate::{lint_commands, lint_gates, lint_speakers, validate_gab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub line: Option<usize>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LintReport {
    pub start: Option<String>,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == severity)
            .count()
    }
}

/// Parses in collecting mode and runs every lint over the result. When no
/// start is given the first node is used.
pub fn lint_script(source: &str, start: Option<&str>) -> LintReport {
    let mut issues = Vec::new();
    let file = parse_gab_file_collecting(source, &mut issues);

    let mut findings = issues
        .into_iter()
        .map(|issue| LintFinding {
            severity: Severity::Error,
            code: issue.code,
            message: issue.message,
            line: Some(issue.line),
            title: None,
        })
        .collect::<Vec<_>>();

    let start = start
        .map(str::to_string)
        .or_else(|| file.nodes.first().map(|node| node.title.clone()));
    if let Some(start) = &start {
        findings.extend(lint_parsed(&file, start));
    }

    findings.sort_by_key(|finding| (finding.line.unwrap_or(0), finding.severity));
    LintReport { start, findings }
}

fn lint_parsed(file: &GabFile, start: &str) -> Vec<LintFinding> {
    let nodes = &file.nodes;
    let mut findings = Vec::new();

    if !nodes.iter().any(|node| node.title == start) {
        findings.push(LintFinding {
            severity: Severity::Error,
            code: "LINT_START_NOT_FOUND".to_string(),
            message: format!("Start node '{}' does not exist.", start),
            line: None,
            title: None,
        });
    }

    let validation = validate_gab(nodes, start);
    for dangling in validation.dangling {
        findings.push(node_finding(
            nodes,
            Severity::Error,
            "LINT_DANGLING_TARGET",
            &dangling.from,
            format!(
                "Node '{}' points at missing node '{}'.",
                dangling.from, dangling.target
            ),
        ));
    }
    for untargeted in validation.untargeted {
        findings.push(node_finding(
            nodes,
            Severity::Error,
            "LINT_OPTION_NO_TARGET",
            &untargeted.node,
            format!(
                "Option \"{}\" in node '{}' has no jump or detour.",
                untargeted.option, untargeted.node
            ),
        ));
    }
    for title in validation.unreachable {
        let message = format!("Unreachable node: {}", title);
        findings.push(node_finding(
            nodes,
            Severity::Warning,
            "LINT_UNREACHABLE",
            &title,
            message,
        ));
    }
    for title in validation.nonterminating {
        let message = format!("Non-terminating node: {}", title);
        findings.push(node_finding(
            nodes,
            Severity::Warning,
            "LINT_NONTERMINATING",
            &title,
            message,
        ));
    }
    for undefined in lint_speakers(file) {
        findings.push(node_finding(
            nodes,
            Severity::Warning,
            "LINT_UNDEFINED_SPEAKER",
            &undefined.node,
            format!(
                "Speaker '{}' in node '{}' has no speaker block.",
                undefined.speaker, undefined.node
            ),
        ));
    }
    for title in lint_commands(nodes) {
        let message = format!(
            "Node '{}' has several commands; only the last one runs.",
            title
        );
        findings.push(node_finding(
            nodes,
            Severity::Warning,
            "LINT_MULTIPLE_COMMANDS",
            &title,
            message,
        ));
    }
    for gate in lint_gates(nodes) {
        findings.push(node_finding(
            nodes,
            Severity::Warning,
            "LINT_UNKNOWN_GATE",
            &gate.node,
            format!(
                "Gate '{{{}}}' in node '{}' names a missing node.",
                gate.condition, gate.node
            ),
        ));
    }

    findings
}

fn node_finding(
    nodes: &[ScriptNode],
    severity: Severity,
    code: &str,
    title: &str,
    message: String,
) -> LintFinding {
    LintFinding {
        severity,
        code: code.to_string(),
        message,
        line: title_line(nodes, title),
        title: Some(title.to_string()),
    }
}

/// Maps a node title back to the line of its `title:` header.
pub fn title_line(nodes: &[ScriptNode], title: &str) -> Option<usize> {
    nodes
        .iter()
        .find(|node| node.title == title)
        .map(|node| node.line)
}
