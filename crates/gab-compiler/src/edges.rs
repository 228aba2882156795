use crate::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeTarget {
    pub target: String,
    pub detour: bool,
}

/// Every edge a node could take under any visited set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeEdges {
    pub targets: Vec<EdgeTarget>,
    pub command: Option<CommandName>,
    pub command_count: usize,
    pub gate_conditions: Vec<String>,
    /// Option texts with no `<<jump>>`/`<<detour>>` after them. Choosing one
    /// fails at runtime.
    pub untargeted_options: Vec<String>,
}

impl NodeEdges {
    /// No way out at all. A node that still offers options is never a dead
    /// end, even when those options lead nowhere.
    pub fn is_dead_end(&self) -> bool {
        self.targets.is_empty() && self.command.is_none() && self.untargeted_options.is_empty()
    }
}

pub fn node_edges(node: &ScriptNode) -> NodeEdges {
    let lines = node.body.lines().collect::<Vec<_>>();
    let mut edges = NodeEdges::default();

    let mut index = 0usize;
    while index < lines.len() {
        let trimmed = lines[index].trim();
        if trimmed.starts_with(OPTION_MARKER) {
            break;
        }
        index += 1;

        match parse_directive(trimmed) {
            Some(Directive::Jump(target)) => edges.targets.push(EdgeTarget {
                target,
                detour: false,
            }),
            Some(Directive::Command(command)) => {
                edges.command = Some(command.name);
                edges.command_count += 1;
            }
            Some(Directive::Detour(_)) | Some(Directive::Unknown(_)) => {}
            None => {
                if let Some(gate) = parse_gate(trimmed) {
                    edges.gate_conditions.push(gate.condition.to_string());
                }
            }
        }
    }

    while index < lines.len() {
        let trimmed = lines[index].trim();
        index += 1;
        let Some(marked) = trimmed.strip_prefix(OPTION_MARKER) else {
            continue;
        };
        let mut text = marked.trim();
        if let Some(gate) = parse_gate(text) {
            edges.gate_conditions.push(gate.condition.to_string());
            text = gate.rest;
        }

        match lines.get(index).and_then(|next| parse_directive(next.trim())) {
            Some(Directive::Jump(target)) => {
                index += 1;
                edges.targets.push(EdgeTarget {
                    target,
                    detour: false,
                });
            }
            Some(Directive::Detour(target)) => {
                index += 1;
                edges.targets.push(EdgeTarget {
                    target,
                    detour: true,
                });
            }
            _ => edges.untargeted_options.push(text.to_string()),
        }
    }

    edges
}
