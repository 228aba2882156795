use std::collections::{BTreeMap, BTreeSet, VecDeque};

use gab_compiler::node_edges;
use gab_core::{CommandName, ScriptNode, TAG_DISABLED, TAG_EXAMINE, TAG_FINAL};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub from: String,
    pub target: String,
}

/// An option with no jump or detour after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntargetedOption {
    pub node: String,
    pub option: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GabValidation {
    pub unreachable: Vec<String>,
    pub nonterminating: Vec<String>,
    pub dangling: Vec<DanglingReference>,
    pub untargeted: Vec<UntargetedOption>,
}

pub fn default_terminating_commands() -> BTreeSet<CommandName> {
    [CommandName::LoadPuzzle, CommandName::LoadLevel]
        .into_iter()
        .collect()
}

pub fn validate_gab(nodes: &[ScriptNode], start: &str) -> GabValidation {
    validate_gab_with(nodes, start, &default_terminating_commands())
}

/// Reachability and termination analysis over the whole node set.
///
/// Roots are `start` plus every `examine` node. A detour adds a reverse edge
/// from the target back to its caller, since the return stack brings the
/// player back there. Terminal nodes run a terminating command, have no
/// edges, options or command, or are tagged `final`.
pub fn validate_gab_with(
    nodes: &[ScriptNode],
    start: &str,
    terminating_commands: &BTreeSet<CommandName>,
) -> GabValidation {
    let titles = nodes
        .iter()
        .map(|node| node.title.as_str())
        .collect::<BTreeSet<_>>();

    let mut forward: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut terminals = BTreeSet::new();
    let mut dangling = Vec::new();
    let mut untargeted = Vec::new();

    for node in nodes {
        let edges = node_edges(node);
        untargeted.extend(edges.untargeted_options.iter().map(|option| UntargetedOption {
            node: node.title.clone(),
            option: option.clone(),
        }));
        let terminating_command = edges
            .command
            .is_some_and(|command| terminating_commands.contains(&command));
        if terminating_command || edges.is_dead_end() || node.has_tag(TAG_FINAL) {
            terminals.insert(node.title.clone());
        }

        for edge in edges.targets {
            if !titles.contains(edge.target.as_str()) {
                dangling.push(DanglingReference {
                    from: node.title.clone(),
                    target: edge.target.clone(),
                });
            }
            forward
                .entry(node.title.clone())
                .or_default()
                .push(edge.target.clone());
            if edge.detour {
                forward
                    .entry(edge.target)
                    .or_default()
                    .push(node.title.clone());
            }
        }
    }

    let mut roots = Vec::new();
    if titles.contains(start) {
        roots.push(start.to_string());
    }
    roots.extend(
        nodes
            .iter()
            .filter(|node| node.has_tag(TAG_EXAMINE))
            .map(|node| node.title.clone()),
    );
    let reachable = breadth_first(roots, &forward);

    let mut backward: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (from, targets) in &forward {
        for target in targets {
            backward
                .entry(target.clone())
                .or_default()
                .push(from.clone());
        }
    }
    let reaches_terminal = breadth_first(terminals.into_iter().collect(), &backward);

    let mut validation = GabValidation {
        dangling,
        untargeted,
        ..GabValidation::default()
    };
    for node in nodes {
        let examine = node.has_tag(TAG_EXAMINE);
        if !reachable.contains(&node.title) {
            if !examine && !node.has_tag(TAG_DISABLED) {
                validation.unreachable.push(node.title.clone());
            }
            continue;
        }
        if !examine && !reaches_terminal.contains(&node.title) {
            validation.nonterminating.push(node.title.clone());
        }
    }
    validation
}

fn breadth_first(
    seeds: Vec<String>,
    adjacency: &BTreeMap<String, Vec<String>>,
) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from(seeds);
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current.clone()) {
            continue;
        }
        for next in adjacency.get(&current).into_iter().flatten() {
            if !seen.contains(next) {
                queue.push_back(next.clone());
            }
        }
    }
    seen
}
