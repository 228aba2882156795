use crate::*;

/// Resolves one node body against the visited set: gated lines and options
/// are filtered, directive lines become the fallthrough target or the
/// command, and every kept option gets its `visited` flag.
pub fn compile_node(node: &ScriptNode, visited: &BTreeSet<String>) -> CompiledNode {
    let lines = node.body.lines().collect::<Vec<_>>();
    let mut compiled = CompiledNode {
        title: node.title.clone(),
        tags: node.tags(),
        ..CompiledNode::default()
    };

    let mut index = 0usize;
    while index < lines.len() {
        let trimmed = lines[index].trim();
        if trimmed.starts_with(OPTION_MARKER) {
            break;
        }
        index += 1;
        if trimmed.is_empty() {
            continue;
        }

        match parse_directive(trimmed) {
            Some(Directive::Jump(target)) => compiled.fallthrough = Some(target),
            // Last command wins.
            Some(Directive::Command(command)) => compiled.command = Some(command),
            Some(Directive::Detour(target)) => {
                warn!(
                    "{}: detour to {} outside an option is ignored",
                    node.title, target
                );
            }
            Some(Directive::Unknown(raw)) => {
                warn!("{}: unrecognized directive {} dropped", node.title, raw);
            }
            None => match parse_gate(trimmed) {
                Some(gate) => {
                    if gate.holds(visited) && !gate.rest.is_empty() {
                        compiled.lines.push(gate.rest.to_string());
                    }
                }
                None => compiled.lines.push(trimmed.to_string()),
            },
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
            if !gate.holds(visited) {
                if lines
                    .get(index)
                    .is_some_and(|next| next.trim().starts_with("<<"))
                {
                    index += 1;
                }
                continue;
            }
            text = gate.rest;
        }

        let (target, detour) = match lines.get(index).and_then(|next| parse_directive(next.trim()))
        {
            Some(Directive::Jump(target)) => {
                index += 1;
                (Some(target), false)
            }
            Some(Directive::Detour(target)) => {
                index += 1;
                (Some(target), true)
            }
            _ => (None, false),
        };

        let visited_target = target
            .as_ref()
            .is_some_and(|target| visited.contains(target));
        compiled.options.push(DialogueOption {
            text: text.to_string(),
            target,
            visited: visited_target,
            detour,
        });
    }

    compiled
}
