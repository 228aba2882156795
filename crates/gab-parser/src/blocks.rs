use std::collections::{BTreeMap, BTreeSet};

use gab_core::{GabError, GabFile, ParseIssue, ScriptNode, SpeakerDef, KNOWN_METADATA_KEYS};

const TITLE_PREFIX: &str = "title:";
const SPEAKER_PREFIX: &str = "speaker:";
const BODY_SEPARATOR: &str = "---";
const BLOCK_TERMINATOR: &str = "===";
const TALK_ANIM_KEY: &str = "talkAnim";

enum IssueSink<'a> {
    Strict,
    Collecting(&'a mut Vec<ParseIssue>),
}

impl IssueSink<'_> {
    fn report(
        &mut self,
        line: usize,
        code: &str,
        message: impl Into<String>,
    ) -> Result<(), GabError> {
        let message = message.into();
        match self {
            Self::Strict => Err(GabError::with_line(code, message, line)),
            Self::Collecting(issues) => {
                issues.push(ParseIssue {
                    line,
                    code: code.to_string(),
                    message,
                });
                Ok(())
            }
        }
    }
}

pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    }
}

pub fn parse_gab(source: &str) -> Result<Vec<ScriptNode>, GabError> {
    Ok(parse_gab_file(source)?.nodes)
}

pub fn parse_gab_collecting(source: &str, issues: &mut Vec<ParseIssue>) -> Vec<ScriptNode> {
    parse_gab_file_collecting(source, issues).nodes
}

pub fn parse_gab_file(source: &str) -> Result<GabFile, GabError> {
    BlockParser::new(source, IssueSink::Strict).parse()
}

pub fn parse_gab_file_collecting(source: &str, issues: &mut Vec<ParseIssue>) -> GabFile {
    // A collecting sink never returns an error.
    BlockParser::new(source, IssueSink::Collecting(issues))
        .parse()
        .unwrap_or_default()
}

struct BlockParser<'a> {
    lines: Vec<&'a str>,
    sink: IssueSink<'a>,
    cursor: usize,
    file: GabFile,
    seen_titles: BTreeSet<String>,
}

impl<'a> BlockParser<'a> {
    fn new(source: &'a str, sink: IssueSink<'a>) -> Self {
        Self {
            lines: source.lines().map(strip_comment).collect(),
            sink,
            cursor: 0,
            file: GabFile::default(),
            seen_titles: BTreeSet::new(),
        }
    }

    fn parse(mut self) -> Result<GabFile, GabError> {
        while let Some(raw) = self.next_line() {
            let header_line = self.cursor;
            let trimmed = raw.trim();
            if let Some(title) = trimmed.strip_prefix(TITLE_PREFIX) {
                self.parse_node_block(title.trim(), header_line)?;
            } else if let Some(name) = trimmed.strip_prefix(SPEAKER_PREFIX) {
                self.parse_speaker_block(name.trim(), header_line)?;
            }
        }
        Ok(self.file)
    }

    /// Returns the next raw line; `self.cursor` is then its 1-based number.
    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.cursor).copied();
        if line.is_some() {
            self.cursor += 1;
        }
        line
    }

    fn parse_node_block(&mut self, title: &str, header_line: usize) -> Result<(), GabError> {
        let mut metadata = BTreeMap::new();
        let mut has_body = false;

        while let Some(raw) = self.next_line() {
            let line_number = self.cursor;
            let trimmed = raw.trim();
            if trimmed == BODY_SEPARATOR {
                has_body = true;
                break;
            }
            if trimmed == BLOCK_TERMINATOR {
                break;
            }
            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                self.sink.report(
                    line_number,
                    "PARSE_MALFORMED_METADATA",
                    format!(
                        "Expected \"key: value\" metadata in node '{}', got \"{}\".",
                        title, trimmed
                    ),
                )?;
                continue;
            };

            let key = key.trim();
            if !KNOWN_METADATA_KEYS.contains(&key) {
                self.sink.report(
                    line_number,
                    "PARSE_UNKNOWN_METADATA",
                    format!("Unknown metadata field '{}' in node '{}'.", key, title),
                )?;
                continue;
            }
            metadata.insert(key.to_string(), value.trim().to_string());
        }

        let mut body_lines = Vec::new();
        if has_body {
            while let Some(raw) = self.next_line() {
                if raw.trim() == BLOCK_TERMINATOR {
                    break;
                }
                body_lines.push(raw.trim_end());
            }
        }

        if title.is_empty() {
            return self.sink.report(
                header_line,
                "PARSE_MISSING_TITLE",
                "Node header \"title:\" has no title.",
            );
        }

        if !self.seen_titles.insert(title.to_string()) {
            return self.sink.report(
                header_line,
                "PARSE_DUPLICATE_TITLE",
                format!("Node '{}' is defined more than once.", title),
            );
        }

        self.file.nodes.push(ScriptNode {
            title: title.to_string(),
            metadata,
            body: join_body(&body_lines),
            line: header_line,
        });
        Ok(())
    }

    fn parse_speaker_block(&mut self, name: &str, header_line: usize) -> Result<(), GabError> {
        if self
            .lines
            .get(self.cursor)
            .is_some_and(|line| line.trim() == BODY_SEPARATOR)
        {
            self.cursor += 1;
        }

        let mut talk_anim = None;
        while let Some(raw) = self.next_line() {
            let trimmed = raw.trim();
            if trimmed == BLOCK_TERMINATOR {
                break;
            }
            if trimmed.is_empty() {
                continue;
            }
            let (key, value) = match trimmed.split_once(|c: char| c == ':' || c.is_whitespace()) {
                Some((key, value)) => (key.trim(), value.trim().trim_start_matches(':').trim()),
                None => (trimmed, ""),
            };
            if key == TALK_ANIM_KEY {
                talk_anim = Some(value.to_string());
            }
        }

        if name.is_empty() {
            return self.sink.report(
                header_line,
                "PARSE_MISSING_SPEAKER_NAME",
                "Speaker header \"speaker:\" has no name.",
            );
        }

        self.file.speakers.insert(SpeakerDef {
            name: name.to_string(),
            talk_anim,
        });
        Ok(())
    }
}

fn join_body(lines: &[&str]) -> String {
    let start = lines.iter().position(|line| !line.trim().is_empty());
    let end = lines.iter().rposition(|line| !line.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
