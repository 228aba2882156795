use std::fs;
use std::path::{Path, PathBuf};

use gab_core::GabError;
use walkdir::WalkDir;

use crate::{map_cli_source_path, map_cli_source_read, LoadedScript};

/// `file` may name a `.gab` file or a directory holding exactly one.
pub(crate) fn load_script(file: &str) -> Result<LoadedScript, GabError> {
    let resolved = resolve_source_path(file)?;
    let path = if resolved.is_dir() {
        find_gab_file(&resolved)?
    } else {
        resolved
    };
    let text = fs::read_to_string(&path).map_err(map_cli_source_read)?;
    Ok(LoadedScript { path, text })
}

pub(crate) fn resolve_source_path(file: &str) -> Result<PathBuf, GabError> {
    let path = PathBuf::from(file);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(GabError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("Script path does not exist: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn find_gab_file(dir: &Path) -> Result<PathBuf, GabError> {
    let mut found = WalkDir::new(dir)
        .follow_links(false)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("gab"))
        .collect::<Vec<_>>();
    found.sort();

    match found.len() {
        0 => Err(GabError::new(
            "CLI_SOURCE_EMPTY",
            format!("No .gab file under {}", dir.display()),
        )),
        1 => Ok(found.remove(0)),
        count => Err(GabError::new(
            "CLI_SOURCE_AMBIGUOUS",
            format!(
                "{} .gab files under {}; pass one with --file.",
                count,
                dir.display()
            ),
        )),
    }
}
