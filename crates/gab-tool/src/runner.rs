use std::path::Path;

use gab_api::{create_session_from_text, CreateSessionOptions};
use gab_core::DialogueEvent;
use log::debug;

use crate::source::{read_gab_script_from_dir, read_test_case};
use crate::{ExpectedChoice, ExpectedEvent, GabToolError, TestAction, TestCase};

pub const MAX_EVENTS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub consumed_actions: usize,
    pub steps: usize,
}

/// Plays the scenario under `scenario_dir`, answering each choice with the
/// next action of `case`. Commands are observed but not executed.
pub fn run_case(scenario_dir: &Path, case: &TestCase) -> Result<RunReport, GabToolError> {
    let script_text = read_gab_script_from_dir(scenario_dir)?;
    let mut session = create_session_from_text(CreateSessionOptions {
        script_text,
        start_node: case.start.clone(),
        command_handlers: None,
        visited: Some(case.visited.clone()),
    })?;

    let mut observed_events = Vec::new();
    let mut action_index = 0usize;
    let mut event = session.next_event()?;

    for step in 1..=MAX_EVENTS {
        event = match event {
            DialogueEvent::Line { speaker, text, .. } => {
                observed_events.push(ExpectedEvent::Line { speaker, text });
                session.next_event()?
            }
            DialogueEvent::Command { command, .. } => {
                observed_events.push(ExpectedEvent::Command {
                    name: command.name.as_str().to_string(),
                    args: command.args,
                });
                session.next_event()?
            }
            DialogueEvent::Choice { options, .. } => {
                let choices = options
                    .into_iter()
                    .map(|option| ExpectedChoice {
                        text: option.text,
                        visited: option.visited,
                    })
                    .collect();
                observed_events.push(ExpectedEvent::Choice { choices });
                let event_index = observed_events.len() - 1;
                let TestAction::Choose { index } = case
                    .actions
                    .get(action_index)
                    .ok_or(GabToolError::MissingAction { event_index })?;
                debug!("event {}: choose {}", event_index, index);
                action_index += 1;
                session.choose(*index)?
            }
            DialogueEvent::End => {
                observed_events.push(ExpectedEvent::End);
                if action_index != case.actions.len() {
                    return Err(GabToolError::UnusedActions {
                        used: action_index,
                        total: case.actions.len(),
                    });
                }
                return Ok(RunReport {
                    observed_events,
                    consumed_actions: action_index,
                    steps: step,
                });
            }
        };
    }

    Err(GabToolError::GuardExceeded {
        max_events: MAX_EVENTS,
    })
}

pub fn assert_case(scenario_dir: &Path, case_path: &Path) -> Result<(), GabToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(scenario_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(GabToolError::EventSerialize)?;
        return Err(GabToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(GabToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(GabToolError::EventSerialize)?;
            return Err(GabToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    Ok(())
}
