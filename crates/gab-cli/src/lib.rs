use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use gab_api::{create_session_from_text, CreateSessionOptions};
use gab_core::GabError;
use gab_runtime::DialogueSession;

mod agent;
mod boundary_runner;
mod cli_args;
mod error_map;
mod line_player;
mod models;
mod source_loader;

pub(crate) use boundary_runner::{emit_boundary, run_to_boundary, LoggingCommands};
#[cfg(test)]
pub(crate) use boundary_runner::render_boundary;
pub(crate) use cli_args::{AgentArgs, Cli, Mode, PlayArgs};
pub(crate) use error_map::{emit_error, map_cli_source_path, map_cli_source_read, map_play_io};
pub(crate) use line_player::run_play_line_mode;
pub(crate) use models::{
    BoundaryEvent, BoundaryResult, LineCommandAction, LineOutput, LoadedScript, TranscriptEntry,
};
pub(crate) use source_loader::load_script;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, GabError> {
    match cli.command {
        Mode::Play(args) => run_play(args),
        Mode::Agent(args) => agent::run_agent(args),
    }
}

fn run_play(args: PlayArgs) -> Result<i32, GabError> {
    let script = load_script(&args.file)?;
    run_play_line_mode(&script, args.start.as_deref())
}

pub(crate) fn create_session_for_script(
    script_text: &str,
    start: Option<&str>,
) -> Result<DialogueSession, GabError> {
    create_session_from_text(CreateSessionOptions {
        script_text: script_text.to_string(),
        start_node: start.map(str::to_string),
        command_handlers: Some(Arc::new(LoggingCommands)),
        visited: None,
    })
}
