use super::*;
use gab_parser::parse_gab;

fn node(title: &str, body: &str) -> ScriptNode {
    ScriptNode {
        title: title.to_string(),
        metadata: Default::default(),
        body: body.to_string(),
        line: 1,
    }
}

fn visited(titles: &[&str]) -> BTreeSet<String> {
    titles.iter().map(|title| (*title).to_string()).collect()
}

#[test]
fn compile_sample_start_node() {
    let nodes = parse_gab(
        r#"
title: Start
---
Guide: Welcome!
-> Visit shop
    <<detour Shop>>
-> Continue
    <<jump End>>
===
"#,
    )
    .expect("script should parse");

    let compiled = compile_node(&nodes[0], &BTreeSet::new());
    assert_eq!(compiled.title, "Start");
    assert_eq!(compiled.lines, vec!["Guide: Welcome!".to_string()]);
    assert_eq!(
        compiled.options,
        vec![
            DialogueOption {
                text: "Visit shop".to_string(),
                target: Some("Shop".to_string()),
                visited: false,
                detour: true,
            },
            DialogueOption {
                text: "Continue".to_string(),
                target: Some("End".to_string()),
                visited: false,
                detour: false,
            },
        ]
    );
    assert_eq!(compiled.fallthrough, None);
    assert_eq!(compiled.command, None);

    let revisited = compile_node(&nodes[0], &visited(&["Shop"]));
    assert!(revisited.options[0].visited);
    assert!(!revisited.options[1].visited);
}

#[test]
fn empty_body_compiles_to_terminal_node() {
    let compiled = compile_node(&node("Dead", ""), &BTreeSet::new());
    assert!(compiled.lines.is_empty());
    assert!(compiled.options.is_empty());
    assert_eq!(compiled.fallthrough, None);
    assert_eq!(compiled.command, None);
}

#[test]
fn gated_lines_follow_visited_state() {
    let body = "{Shop} Guide: Back so soon?\n{!Shop} Guide: First time here?\n\nGuide: Anyway.";
    let fresh = compile_node(&node("Hall", body), &BTreeSet::new());
    assert_eq!(
        fresh.lines,
        vec![
            "Guide: First time here?".to_string(),
            "Guide: Anyway.".to_string()
        ]
    );

    let returning = compile_node(&node("Hall", body), &visited(&["Shop"]));
    assert_eq!(
        returning.lines,
        vec!["Guide: Back so soon?".to_string(), "Guide: Anyway.".to_string()]
    );
}

#[test]
fn hidden_option_also_drops_its_directive_line() {
    let body = "-> {Vault} Open the vault\n<<jump Vault_Open>>\n-> {!Vault} Look around\n<<detour Vault>>\n-> Leave";
    let compiled = compile_node(&node("Door", body), &BTreeSet::new());
    assert_eq!(compiled.options.len(), 2);
    assert_eq!(compiled.options[0].text, "Look around");
    assert_eq!(compiled.options[0].target.as_deref(), Some("Vault"));
    assert!(compiled.options[0].detour);
    assert_eq!(compiled.options[1].text, "Leave");
    assert_eq!(compiled.options[1].target, None);

    let after = compile_node(&node("Door", body), &visited(&["Vault"]));
    assert_eq!(after.options.len(), 2);
    assert_eq!(after.options[0].text, "Open the vault");
    assert_eq!(after.options[0].target.as_deref(), Some("Vault_Open"));
    assert!(!after.options[0].visited);
    assert_eq!(after.options[1].text, "Leave");
}

#[test]
fn jump_and_commands_are_not_dialogue_lines() {
    let body = "Guide: One.\n<<jump Next>>\nGuide: Two.\n<<loadPuzzle Hanoi>>\n<<unknown thing>>";
    let compiled = compile_node(&node("Intro", body), &BTreeSet::new());
    assert_eq!(
        compiled.lines,
        vec!["Guide: One.".to_string(), "Guide: Two.".to_string()]
    );
    assert_eq!(compiled.fallthrough.as_deref(), Some("Next"));
    assert_eq!(
        compiled.command,
        Some(DialogueCommand {
            name: CommandName::LoadPuzzle,
            args: vec!["Hanoi".to_string()],
        })
    );
}

#[test]
fn last_command_wins_when_several_are_written() {
    let body = "<<loadPuzzle Hanoi>>\n<<loadLevel thebar>>\n<<return>>";
    let compiled = compile_node(&node("Busy", body), &BTreeSet::new());
    assert_eq!(
        compiled.command,
        Some(DialogueCommand {
            name: CommandName::Return,
            args: Vec::new(),
        })
    );

    let edges = node_edges(&node("Busy", body));
    assert_eq!(edges.command_count, 3);
    assert_eq!(edges.command, Some(CommandName::Return));
}

#[test]
fn examine_tag_is_carried_into_compiled_node() {
    let nodes = parse_gab("title: Bar_Mirror\ntags: examine\n---\nYou: Looking good.\n===")
        .expect("parse");
    let compiled = compile_node(&nodes[0], &BTreeSet::new());
    assert!(compiled.is_examine());
}

#[test]
fn parse_directive_classifies_lines() {
    assert_eq!(
        parse_directive("<< jump  Hall >>"),
        Some(Directive::Jump("Hall".to_string()))
    );
    assert_eq!(
        parse_directive("<<detour Shop>>"),
        Some(Directive::Detour("Shop".to_string()))
    );
    assert_eq!(
        parse_directive("<<return>>"),
        Some(Directive::Command(DialogueCommand {
            name: CommandName::Return,
            args: Vec::new(),
        }))
    );
    assert!(matches!(
        parse_directive("<<loadLevel>>"),
        Some(Directive::Unknown(_))
    ));
    assert_eq!(parse_directive("Guide: hi"), None);
}

#[test]
fn text_after_the_closing_brackets_is_ignored() {
    assert_eq!(
        parse_directive("<<jump End>> !"),
        Some(Directive::Jump("End".to_string()))
    );
    assert_eq!(
        parse_directive("<<loadPuzzle TowerOfHanoi>>  // first puzzle"),
        Some(Directive::Command(DialogueCommand {
            name: CommandName::LoadPuzzle,
            args: vec!["TowerOfHanoi".to_string()],
        }))
    );

    let compiled = compile_node(&node("Hall", "Guide: hi\n<<jump End>> !"), &BTreeSet::new());
    assert_eq!(compiled.fallthrough.as_deref(), Some("End"));
    assert_eq!(compiled.lines, vec!["Guide: hi".to_string()]);
}

#[test]
fn parse_gate_reads_negation_condition_and_rest() {
    let gate = parse_gate("{!Shop} Never been?").expect("gate");
    assert!(gate.negate);
    assert_eq!(gate.condition, "Shop");
    assert_eq!(gate.rest, "Never been?");
    assert!(gate.holds(&BTreeSet::new()));
    assert!(!gate.holds(&visited(&["Shop"])));
    assert!(parse_gate("no gate").is_none());
}

#[test]
fn node_edges_ignore_gates_and_collect_every_target() {
    let body = "{Seen} X: again\n<<jump Tail>>\n-> {Key} Unlock\n<<jump Vault>>\n-> Chat\n<<detour Talk>>\n-> Wait";
    let edges = node_edges(&node("Door", body));
    assert_eq!(
        edges.targets,
        vec![
            EdgeTarget {
                target: "Tail".to_string(),
                detour: false
            },
            EdgeTarget {
                target: "Vault".to_string(),
                detour: false
            },
            EdgeTarget {
                target: "Talk".to_string(),
                detour: true
            },
        ]
    );
    assert_eq!(
        edges.gate_conditions,
        vec!["Seen".to_string(), "Key".to_string()]
    );
    assert_eq!(edges.untargeted_options, vec!["Wait".to_string()]);
    assert!(!edges.is_dead_end());
    assert!(node_edges(&node("Empty", "X: bye")).is_dead_end());
}

#[test]
fn options_without_targets_keep_a_node_from_being_a_dead_end() {
    let edges = node_edges(&node("A", "X: pick\n-> Go somewhere\n-> {Key} Later"));
    assert!(edges.targets.is_empty());
    assert_eq!(
        edges.untargeted_options,
        vec!["Go somewhere".to_string(), "Later".to_string()]
    );
    assert!(!edges.is_dead_end());
}
