use gab_core::{AdvanceInput, GabError};
use log::debug;

use crate::{
    create_session_for_script, emit_boundary, load_script, run_to_boundary, AgentArgs,
    BoundaryEvent, BoundaryResult, TranscriptEntry,
};

pub(crate) fn run_agent(args: AgentArgs) -> Result<i32, GabError> {
    let script = load_script(&args.file)?;
    let (transcript, boundary) =
        replay_choices(&script.text, args.start.as_deref(), &args.choices)?;
    emit_boundary(&transcript, &boundary);
    Ok(0)
}

/// Runs from the start node, feeding `choices` at each choice boundary in
/// order. Returns everything emitted along the way and the final boundary.
pub(crate) fn replay_choices(
    script_text: &str,
    start: Option<&str>,
    choices: &[usize],
) -> Result<(Vec<TranscriptEntry>, BoundaryResult), GabError> {
    let mut session = create_session_for_script(script_text, start)?;
    let mut remaining = choices.iter().copied();
    let mut transcript = Vec::new();
    let mut input = None;

    loop {
        let mut boundary = run_to_boundary(&mut session, input.take())?;
        transcript.append(&mut boundary.transcript);

        if boundary.event == BoundaryEvent::Choice {
            if let Some(index) = remaining.next() {
                debug!("replaying choice {}", index);
                input = Some(AdvanceInput::Choice {
                    option_index: index,
                });
                continue;
            }
        }

        let unused = remaining.count();
        if unused > 0 {
            return Err(GabError::new(
                "CLI_CHOICES_UNUSED",
                format!("Dialogue ended with {} choice(s) left unused.", unused),
            ));
        }
        return Ok((transcript, boundary));
    }
}
