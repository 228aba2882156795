use std::collections::BTreeSet;
use std::sync::Arc;

use gab_core::{GabError, GabFile};
use gab_parser::parse_gab_file;
use gab_runtime::{CommandHandlers, DialogueSession, DialogueSessionOptions};
use log::info;

#[derive(Clone)]
pub struct CreateSessionOptions {
    pub script_text: String,
    pub start_node: Option<String>,
    pub command_handlers: Option<Arc<dyn CommandHandlers>>,
    pub visited: Option<BTreeSet<String>>,
}

/// Strict parse of one `.gab` file.
pub fn compile_script(script_text: &str) -> Result<GabFile, GabError> {
    parse_gab_file(script_text)
}

pub fn create_session_from_text(
    options: CreateSessionOptions,
) -> Result<DialogueSession, GabError> {
    let file = compile_script(&options.script_text)?;
    let start_node = resolve_start_node(&file, options.start_node)?;
    info!(
        "session over {} node(s), {} speaker(s), starting at {}",
        file.nodes.len(),
        file.speakers.len(),
        start_node
    );

    let mut session = DialogueSession::new(DialogueSessionOptions {
        file,
        command_handlers: options.command_handlers,
        visited: options.visited,
    })?;

    session.start(&start_node)?;
    Ok(session)
}

pub fn resolve_start_node(file: &GabFile, explicit: Option<String>) -> Result<String, GabError> {
    if let Some(start) = explicit {
        if file.node(&start).is_none() {
            return Err(GabError::new(
                "API_START_NODE_NOT_FOUND",
                format!("Start node \"{}\" is not defined.", start),
            ));
        }
        return Ok(start);
    }

    file.nodes
        .first()
        .map(|node| node.title.clone())
        .ok_or_else(|| GabError::new("API_SCRIPT_EMPTY", "Script defines no nodes."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gab_core::{CommandName, DialogueEvent};
    use gab_runtime::CommandTable;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SCRIPT: &str = r#"
speaker: Overlord
---
talkAnim: overlord_talk
===
title: Intro
---
Overlord: Begin
<<loadLevel Sector7>>
===
title: Alt
---
Overlord: Elsewhere
===
"#;

    fn options(start_node: Option<&str>) -> CreateSessionOptions {
        CreateSessionOptions {
            script_text: SCRIPT.to_string(),
            start_node: start_node.map(str::to_string),
            command_handlers: None,
            visited: None,
        }
    }

    #[test]
    fn compile_script_returns_nodes_and_speakers() {
        let file = compile_script(SCRIPT).expect("compile should pass");
        assert_eq!(file.nodes.len(), 2);
        assert!(file.speakers.contains("Overlord"));
    }

    #[test]
    fn compile_script_surfaces_structural_errors() {
        let error = compile_script("title: A\nmood: grim\n---\n===")
            .expect_err("unknown metadata should fail");
        assert_eq!(error.code, "PARSE_UNKNOWN_METADATA");
        assert_eq!(error.line, Some(2));
    }

    #[test]
    fn create_session_from_text_defaults_to_first_node() {
        let mut session = create_session_from_text(options(None)).expect("session should build");
        let first = session.next_event().expect("next should succeed");
        assert!(matches!(first, DialogueEvent::Line { ref node, .. } if node == "Intro"));
    }

    #[test]
    fn create_session_from_text_accepts_explicit_start() {
        let mut session =
            create_session_from_text(options(Some("Alt"))).expect("session should build");
        let first = session.next_event().expect("next should succeed");
        assert!(matches!(first, DialogueEvent::Line { ref text, .. } if text == "Elsewhere"));
    }

    #[test]
    fn create_session_from_text_rejects_missing_start() {
        let error = create_session_from_text(options(Some("Missing")))
            .err()
            .expect("missing start should fail");
        assert_eq!(error.code, "API_START_NODE_NOT_FOUND");
    }

    #[test]
    fn create_session_from_text_rejects_empty_script() {
        let error = create_session_from_text(CreateSessionOptions {
            script_text: "# only a comment".to_string(),
            start_node: None,
            command_handlers: None,
            visited: None,
        })
        .err()
        .expect("empty script should fail");
        assert_eq!(error.code, "API_SCRIPT_EMPTY");
    }

    #[test]
    fn create_session_from_text_wires_command_handlers() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let handlers = CommandTable::new().with(CommandName::LoadLevel, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let mut session = create_session_from_text(CreateSessionOptions {
            command_handlers: Some(Arc::new(handlers)),
            ..options(None)
        })
        .expect("session should build");

        session.next_event().expect("line");
        session.next_event().expect("command");
        session
            .execute_pending_command()
            .expect("command should run");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(session.next_event().expect("end"), DialogueEvent::End);
    }
}
