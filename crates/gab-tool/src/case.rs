use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "gab-tool-case.v1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    /// Falls back to the first node of the script when absent.
    #[serde(default)]
    pub start: Option<String>,
    /// Titles treated as already visited before the session starts.
    #[serde(default)]
    pub visited: BTreeSet<String>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Choose { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedChoice {
    pub text: String,
    #[serde(default)]
    pub visited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Line {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        text: String,
    },
    Choice {
        choices: Vec<ExpectedChoice>,
    },
    Command {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
    End,
}

#[cfg(test)]
mod case_tests {
    use super::*;

    #[test]
    fn testcase_deserialize_applies_defaults() {
        let parsed: TestCase = serde_json::from_str(
            r#"{
  "schemaVersion": "gab-tool-case.v1",
  "expectedEvents": []
}"#,
        )
        .expect("testcase should deserialize");

        assert_eq!(parsed.schema_version, TESTCASE_SCHEMA_V1);
        assert_eq!(parsed.start, None);
        assert!(parsed.visited.is_empty());
        assert!(parsed.actions.is_empty());
        assert!(parsed.expected_events.is_empty());
    }

    #[test]
    fn expected_event_deserialize_supports_all_variants() {
        let parsed: Vec<ExpectedEvent> = serde_json::from_str(
            r#"[
  {"kind":"line","speaker":"Guide","text":"Welcome!"},
  {"kind":"line","text":"The wind howls."},
  {"kind":"choice","choices":[{"text":"Visit shop","visited":true},{"text":"Continue"}]},
  {"kind":"command","name":"loadPuzzle","args":["Hanoi"]},
  {"kind":"command","name":"return"},
  {"kind":"end"}
]"#,
        )
        .expect("events should deserialize");

        assert_eq!(parsed.len(), 6);
        assert_eq!(
            parsed[1],
            ExpectedEvent::Line {
                speaker: None,
                text: "The wind howls.".to_string(),
            }
        );
        let ExpectedEvent::Choice { choices } = &parsed[2] else {
            panic!("expected choice event");
        };
        assert!(choices[0].visited);
        assert!(!choices[1].visited);
        assert!(matches!(
            &parsed[4],
            ExpectedEvent::Command { args, .. } if args.is_empty()
        ));
        assert!(matches!(parsed[5], ExpectedEvent::End));
    }

    #[test]
    fn line_without_speaker_serializes_without_speaker_field() {
        let line = ExpectedEvent::Line {
            speaker: None,
            text: "x".to_string(),
        };
        let json = serde_json::to_string(&line).expect("line should serialize");
        assert_eq!(json, r#"{"kind":"line","text":"x"}"#);
    }

    #[test]
    fn unknown_action_kind_is_rejected() {
        let parsed = serde_json::from_str::<TestAction>(r#"{"kind":"input","text":"x"}"#);
        assert!(parsed.is_err());
    }
}
