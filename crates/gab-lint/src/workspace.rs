use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use gab_core::{GabError, ScriptNode};
use gab_parser::parse_gab_collecting;
use log::{debug, info};
use serde::Serialize;
use walkdir::WalkDir;

use crate::{lint_room_regions, lint_script, load_room_regions, LintReport, RegionFinding};

pub const GAB_EXTENSION: &str = "gab";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub report: LintReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DirectoryReport {
    pub files: Vec<FileReport>,
    pub regions: Vec<RegionFinding>,
}

impl DirectoryReport {
    pub fn has_errors(&self) -> bool {
        !self.regions.is_empty() || self.files.iter().any(|file| file.report.has_errors())
    }
}

/// Reads every `*.gab` file under `scripts_dir`, keyed by its path relative
/// to that directory with `/` separators.
pub fn read_gab_sources(scripts_dir: &Path) -> Result<BTreeMap<String, String>, GabError> {
    if !scripts_dir.is_dir() {
        return Err(GabError::new(
            "LINT_SOURCE_NOT_DIR",
            format!("scripts-dir is not a directory: {}", scripts_dir.display()),
        ));
    }

    let mut sources = BTreeMap::new();
    for entry in WalkDir::new(scripts_dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(GAB_EXTENSION)
        {
            continue;
        }

        let relative = path
            .strip_prefix(scripts_dir)
            .map_err(|error| GabError::new("LINT_SOURCE_SCAN", error.to_string()))?
            .to_string_lossy()
            .replace('\\', "/");
        let content = fs::read_to_string(path).map_err(|error| {
            GabError::new(
                "LINT_SOURCE_READ",
                format!("Failed to read {}: {}", path.display(), error),
            )
        })?;
        debug!("read {} ({} bytes)", relative, content.len());
        sources.insert(relative, content);
    }
    Ok(sources)
}

/// Lints every `.gab` file under `scripts_dir`. `start` applies to the files
/// that define it; the others start from their first node. When no file
/// defines `start`, every file reports it missing.
pub fn lint_directory(
    scripts_dir: &Path,
    start: Option<&str>,
    regions_path: Option<&Path>,
) -> Result<DirectoryReport, GabError> {
    let sources = read_gab_sources(scripts_dir)?;
    info!(
        "linting {} script file(s) under {}",
        sources.len(),
        scripts_dir.display()
    );

    let parsed = sources
        .iter()
        .map(|(path, source)| {
            let mut issues = Vec::new();
            (path.clone(), parse_gab_collecting(source, &mut issues))
        })
        .collect::<BTreeMap<_, _>>();
    let start_defined =
        start.is_some_and(|start| parsed.values().any(|nodes| defines_title(nodes, start)));

    let mut report = DirectoryReport::default();
    for (path, source) in &sources {
        let file_start = start.filter(|start| {
            !start_defined || parsed.get(path).is_some_and(|nodes| defines_title(nodes, start))
        });
        debug!("{} starts at {:?}", path, file_start);
        report.files.push(FileReport {
            path: path.clone(),
            report: lint_script(source, file_start),
        });
    }

    if let Some(regions_path) = regions_path {
        let rooms = load_room_regions(regions_path)?;
        let scripts_by_level = scripts_by_level(parsed);
        report.regions = lint_room_regions(&rooms, &scripts_by_level);
    }

    Ok(report)
}

fn defines_title(nodes: &[ScriptNode], title: &str) -> bool {
    nodes.iter().any(|node| node.title == title)
}

fn scripts_by_level(
    parsed: BTreeMap<String, Vec<ScriptNode>>,
) -> BTreeMap<String, Vec<ScriptNode>> {
    let mut levels = BTreeMap::new();
    for (path, nodes) in parsed {
        let Some(level) = Path::new(&path).file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        levels.insert(level.to_string(), nodes);
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("gab-lint-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    #[test]
    fn read_gab_sources_collects_only_gab_files() {
        let root = temp_dir("sources");
        write_file(&root.join("thebar.gab"), "title: A\n---\n===");
        write_file(&root.join("nested/cryo.gab"), "title: B\n---\n===");
        write_file(&root.join("notes.txt"), "skip");

        let sources = read_gab_sources(&root).expect("scan should pass");
        assert_eq!(
            sources.keys().cloned().collect::<Vec<_>>(),
            vec!["nested/cryo.gab".to_string(), "thebar.gab".to_string()]
        );
    }

    #[test]
    fn read_gab_sources_rejects_missing_directory() {
        let error = read_gab_sources(&temp_dir("missing")).expect_err("missing dir");
        assert_eq!(error.code, "LINT_SOURCE_NOT_DIR");
    }

    #[test]
    fn start_applies_only_to_files_that_define_it() {
        let root = temp_dir("start");
        write_file(
            &root.join("intro.gab"),
            "title: Opening\n---\n<<jump Start>>\n===\ntitle: Start\n---\n===",
        );
        write_file(&root.join("thebar.gab"), "title: Bar_Intro\n---\n===");

        let report = lint_directory(&root, Some("Start"), None).expect("lint should run");
        let starts = report
            .files
            .iter()
            .map(|file| (file.path.as_str(), file.report.start.as_deref()))
            .collect::<Vec<_>>();
        assert_eq!(
            starts,
            vec![("intro.gab", Some("Start")), ("thebar.gab", Some("Bar_Intro"))]
        );
        assert_eq!(report.files[0].report.findings[0].code, "LINT_UNREACHABLE");
        assert!(!report.has_errors());

        let missing = lint_directory(&root, Some("Nowhere"), None).expect("lint should run");
        assert!(missing.files.iter().all(|file| file.report.findings.iter().any(
            |finding| finding.code == "LINT_START_NOT_FOUND"
        )));
        assert!(missing.has_errors());
    }

    #[test]
    fn lint_directory_checks_scripts_and_regions() {
        let root = temp_dir("directory");
        write_file(
            &root.join("thebar.gab"),
            "title: Bar_Intro\n---\n===\ntitle: Bar_Counter\ntags: examine\n---\n===",
        );
        let regions = root.join("rooms.json");
        write_file(
            &regions,
            r#"{"thebar":[
  {"x":1,"y":1,"width":5,"height":5,"type":"dialogue","level":"thebar","dialogueNode":"Bar_Counter"},
  {"x":1,"y":1,"width":5,"height":5,"type":"dialogue","level":"thebar","dialogueNode":"Bar_Ghost"}
]}"#,
        );

        let report = lint_directory(&root, None, Some(&regions)).expect("lint should run");
        assert_eq!(report.files.len(), 1);
        assert!(report.files[0].report.findings.is_empty());
        assert_eq!(report.regions.len(), 1);
        assert_eq!(report.regions[0].index, 1);
        assert!(report.has_errors());
    }
}
