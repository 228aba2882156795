use std::io::{self, BufRead, Write};

use gab_core::{AdvanceInput, GabError};

use crate::{
    create_session_for_script, map_play_io, run_to_boundary, BoundaryEvent, LineCommandAction,
    LoadedScript, TranscriptEntry,
};

const HELP: &str = "commands: :help :restart :quit";

pub(crate) fn run_play_line_mode(
    script: &LoadedScript,
    start: Option<&str>,
) -> Result<i32, GabError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_play_line_mode_with_io(script, start, &mut reader, &mut writer)
}

pub(crate) fn run_play_line_mode_with_io(
    script: &LoadedScript,
    start: Option<&str>,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, GabError> {
    writeln!(writer, "gab player: {}", script.path.display()).map_err(map_play_io)?;
    writeln!(writer, "{}", HELP).map_err(map_play_io)?;

    let mut session = create_session_for_script(&script.text, start)?;
    let mut input = None;

    loop {
        let boundary = run_to_boundary(&mut session, input.take())?;
        for entry in &boundary.transcript {
            writeln!(writer, "{}", render_entry(entry)).map_err(map_play_io)?;
        }

        if boundary.event == BoundaryEvent::End {
            writeln!(writer, "[END]").map_err(map_play_io)?;
            return Ok(0);
        }

        writeln!(writer).map_err(map_play_io)?;
        for (index, option) in boundary.choices.iter().enumerate() {
            let seen = if option.visited { " (seen)" } else { "" };
            writeln!(writer, "  [{}] {}{}", index, option.text, seen).map_err(map_play_io)?;
        }

        loop {
            let raw = prompt_input_from("> ", reader, writer)?;
            match handle_line_cmd(raw.trim(), writer)? {
                LineCommandAction::Continue => continue,
                LineCommandAction::Quit => return Ok(0),
                LineCommandAction::Restart => {
                    session = create_session_for_script(&script.text, start)?;
                    break;
                }
                LineCommandAction::NotHandled => {}
            }

            match raw.trim().parse::<usize>() {
                Ok(index) if index < boundary.choices.len() => {
                    input = Some(AdvanceInput::Choice {
                        option_index: index,
                    });
                    break;
                }
                _ => {
                    writeln!(writer, "invalid choice: {}", raw.trim()).map_err(map_play_io)?;
                }
            }
        }
    }
}

fn render_entry(entry: &TranscriptEntry) -> String {
    match entry {
        TranscriptEntry::Line(line) => match &line.speaker {
            Some(speaker) => format!("{}: {}", speaker, line.text),
            None => line.text.clone(),
        },
        TranscriptEntry::Command(command) => {
            let mut rendered = format!("[{}", command.name);
            for arg in &command.args {
                rendered.push(' ');
                rendered.push_str(arg);
            }
            rendered.push(']');
            rendered
        }
    }
}

pub(crate) fn handle_line_cmd(
    raw: &str,
    writer: &mut dyn Write,
) -> Result<LineCommandAction, GabError> {
    match raw {
        ":help" => {
            writeln!(writer, "{}", HELP).map_err(map_play_io)?;
            Ok(LineCommandAction::Continue)
        }
        ":restart" => {
            writeln!(writer, "restarted").map_err(map_play_io)?;
            Ok(LineCommandAction::Restart)
        }
        ":quit" => {
            writeln!(writer, "bye").map_err(map_play_io)?;
            Ok(LineCommandAction::Quit)
        }
        _ => Ok(LineCommandAction::NotHandled),
    }
}

/// End of input reads as `:quit`.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<String, GabError> {
    write!(writer, "{}", prefix).map_err(map_play_io)?;
    writer.flush().map_err(map_play_io)?;
    let mut input = String::new();
    if reader.read_line(&mut input).map_err(map_play_io)? == 0 {
        return Ok(":quit".to_string());
    }
    Ok(input.trim_end_matches(&['\r', '\n'][..]).to_string())
}
