use std::fs;
use std::path::Path;

use log::debug;
use walkdir::WalkDir;

use crate::{GabToolError, TestCase, TESTCASE_SCHEMA_V1};

/// Joins every `.gab` file under `scenario_dir` in path order. Blocks end
/// with `===`, so concatenated files parse as one script.
pub fn read_gab_script_from_dir(scenario_dir: &Path) -> Result<String, GabToolError> {
    let mut parts = Vec::new();

    for entry in WalkDir::new(scenario_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("gab") {
            continue;
        }

        let content = fs::read_to_string(path).map_err(|source| GabToolError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded {}", path.display());
        parts.push(content);
    }

    if parts.is_empty() {
        return Err(GabToolError::SourceEmpty {
            path: scenario_dir.to_path_buf(),
        });
    }

    Ok(parts.join("\n"))
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, GabToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| GabToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase =
        serde_json::from_str(&raw).map_err(|source| GabToolError::ParseCase {
            path: case_path.to_path_buf(),
            source,
        })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(GabToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod source_tests {
    use super::*;

    use std::time::{SystemTime, UNIX_EPOCH};
    #[cfg(unix)]
    use std::{fs::Permissions, os::unix::fs::PermissionsExt};

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("gab-tool-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    #[test]
    fn read_gab_script_from_dir_joins_gab_files_in_path_order() {
        let root = temp_dir("scripts");
        write_file(
            &root.join("b-nodes.gab"),
            "title: Start\n---\nGuide: Hi\n===\n",
        );
        write_file(
            &root.join("a-speakers.gab"),
            "speaker: Guide\n---\ntalkAnim: guide_talk\n===\n",
        );
        write_file(&root.join("notes.txt"), "skip");

        let script = read_gab_script_from_dir(&root).expect("scan should pass");
        let speaker_at = script.find("speaker: Guide").expect("speaker block");
        let title_at = script.find("title: Start").expect("node block");
        assert!(speaker_at < title_at);
        assert!(!script.contains("skip"));
    }

    #[test]
    fn read_gab_script_from_dir_fails_when_no_gab_files() {
        let root = temp_dir("empty-scripts");
        write_file(&root.join("ignore.txt"), "skip");

        let error = read_gab_script_from_dir(&root).expect_err("empty source should fail");
        assert!(matches!(error, GabToolError::SourceEmpty { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn read_gab_script_from_dir_reports_read_errors() {
        let root = temp_dir("read-error");
        let script_path = root.join("script.gab");
        write_file(&script_path, "title: Start\n---\nHi\n===\n");

        let mut perms = fs::metadata(&script_path)
            .expect("metadata should exist")
            .permissions();
        perms.set_mode(0o000);
        fs::set_permissions(&script_path, perms).expect("permissions should update");
        // root ignores file modes
        let readable = fs::read_to_string(&script_path).is_ok();

        let result = read_gab_script_from_dir(&root);

        fs::set_permissions(&script_path, Permissions::from_mode(0o644))
            .expect("permissions should reset");
        if !readable {
            assert!(matches!(result, Err(GabToolError::ReadFile { .. })));
        }
    }

    #[test]
    fn read_test_case_parses_valid_json() {
        let root = temp_dir("case-ok");
        let case_path = root.join("testcase.json");
        write_file(
            &case_path,
            r#"{
  "schemaVersion":"gab-tool-case.v1",
  "start":"Start",
  "actions":[{"kind":"choose","index":1}],
  "expectedEvents":[{"kind":"end"}]
}"#,
        );

        let parsed = read_test_case(&case_path).expect("case should parse");
        assert_eq!(parsed.schema_version, TESTCASE_SCHEMA_V1);
        assert_eq!(parsed.start.as_deref(), Some("Start"));
        assert_eq!(parsed.actions, vec![crate::TestAction::Choose { index: 1 }]);
        assert_eq!(parsed.expected_events.len(), 1);
    }

    #[test]
    fn read_test_case_reports_read_error() {
        let root = temp_dir("case-read-error");
        fs::create_dir_all(&root).expect("root should be created");
        let error = read_test_case(&root.join("missing.json")).expect_err("missing case should fail");
        assert!(matches!(error, GabToolError::ReadFile { .. }));
    }

    #[test]
    fn read_test_case_reports_parse_and_schema_errors() {
        let root = temp_dir("case-errors");

        let bad_json_path = root.join("bad.json");
        write_file(&bad_json_path, "{");
        let parse_error = read_test_case(&bad_json_path).expect_err("parse should fail");
        assert!(matches!(parse_error, GabToolError::ParseCase { .. }));

        let bad_schema_path = root.join("bad-schema.json");
        write_file(
            &bad_schema_path,
            r#"{"schemaVersion":"v0","expectedEvents":[{"kind":"end"}]}"#,
        );
        let schema_error = read_test_case(&bad_schema_path).expect_err("schema should fail");
        assert!(matches!(
            schema_error,
            GabToolError::InvalidSchemaVersion { .. }
        ));
    }
}
