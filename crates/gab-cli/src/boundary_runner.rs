use gab_core::{AdvanceInput, DialogueCommand, DialogueEvent, GabError};
use gab_runtime::{CommandHandlers, DialogueSession};
use log::info;

use crate::{BoundaryEvent, BoundaryResult, LineOutput, TranscriptEntry};

const BOUNDARY_EVENT_LIMIT: usize = 10_000;

/// Prints commands instead of running them; the CLI has no puzzles or levels.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingCommands;

impl CommandHandlers for LoggingCommands {
    fn handle(&self, command: &DialogueCommand) -> Result<(), GabError> {
        info!("command {} {}", command.name, command.args.join(" "));
        Ok(())
    }
}

/// Advances until the session needs a choice or ends. `input` is passed to
/// the first advance only.
pub(crate) fn run_to_boundary(
    session: &mut DialogueSession,
    input: Option<AdvanceInput>,
) -> Result<BoundaryResult, GabError> {
    let mut transcript = Vec::new();
    let mut input = input;

    for _ in 0..BOUNDARY_EVENT_LIMIT {
        match session.advance(input.take())? {
            DialogueEvent::Line { text, speaker, .. } => {
                transcript.push(TranscriptEntry::Line(LineOutput { speaker, text }));
            }
            DialogueEvent::Command { command, .. } => {
                session.execute_pending_command()?;
                transcript.push(TranscriptEntry::Command(command));
            }
            DialogueEvent::Choice { options, .. } => {
                return Ok(BoundaryResult {
                    event: BoundaryEvent::Choice,
                    transcript,
                    choices: options,
                })
            }
            DialogueEvent::End => {
                return Ok(BoundaryResult {
                    event: BoundaryEvent::End,
                    transcript,
                    choices: Vec::new(),
                })
            }
        }
    }

    Err(GabError::new(
        "CLI_BOUNDARY_GUARD",
        format!(
            "No choice or end within {} events; the script probably loops.",
            BOUNDARY_EVENT_LIMIT
        ),
    ))
}

pub(crate) fn render_boundary(
    transcript: &[TranscriptEntry],
    boundary: &BoundaryResult,
) -> Vec<String> {
    let mut out = vec!["RESULT:OK".to_string()];
    out.push(match boundary.event {
        BoundaryEvent::Choice => "EVENT:CHOICE".to_string(),
        BoundaryEvent::End => "EVENT:END".to_string(),
    });

    for entry in transcript {
        match entry {
            TranscriptEntry::Line(line) => out.push(format!(
                "LINE_JSON:{}",
                serde_json::to_string(line).expect("line json")
            )),
            TranscriptEntry::Command(command) => out.push(format!(
                "COMMAND_JSON:{}",
                serde_json::to_string(command).expect("command json")
            )),
        }
    }

    for (index, option) in boundary.choices.iter().enumerate() {
        out.push(format!(
            "CHOICE:{}|{}",
            index,
            serde_json::to_string(&option.text).expect("string json")
        ));
    }

    out
}

pub(crate) fn emit_boundary(transcript: &[TranscriptEntry], boundary: &BoundaryResult) {
    for line in render_boundary(transcript, boundary) {
        println!("{}", line);
    }
}
