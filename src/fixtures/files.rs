//! On-disk fixture files: `NAME.in` with an optional `NAME.out` or checker script beside it.

use std::fs;
use std::path::{Path, PathBuf};

use super::FixtureError;

pub const INPUT_EXT: &str = "in";
pub const OUTPUT_EXT: &str = "out";
pub const CATCH_ALL_STEM: &str = "ALLTESTS";

/// Extensions a checker or generator script may have, in lookup order.
pub const SCRIPT_EXTENSIONS: [&str; 3] = ["py", "sh", "check"];

/// One `NAME.in` file and what sits next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFixture {
    pub name: String,
    pub input: String,
    /// Contents of `NAME.out`.
    pub output: Option<String>,
    /// `NAME.{py,sh,check}`.
    pub checker: Option<PathBuf>,
}

/// First existing `dir/stem.{py,sh,check}`.
pub fn find_script(dir: &Path, stem: &str) -> Option<PathBuf> {
    SCRIPT_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

fn read(path: &Path) -> Result<String, FixtureError> {
    fs::read_to_string(path).map_err(|source| FixtureError::io(path, source))
}

fn entries(dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|source| FixtureError::io(dir, source))? {
        let entry = entry.map_err(|source| FixtureError::io(dir, source))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Every `*.in` fixture directly inside `dir`, sorted by name.
pub fn scan_inputs(dir: &Path) -> Result<Vec<InputFixture>, FixtureError> {
    let mut fixtures = Vec::new();
    for path in entries(dir)? {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(INPUT_EXT) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let out_path = path.with_extension(OUTPUT_EXT);
        let output = if out_path.is_file() { Some(read(&out_path)?) } else { None };

        fixtures.push(InputFixture {
            name: name.to_string(),
            input: read(&path)?,
            output,
            checker: find_script(dir, name),
        });
    }
    Ok(fixtures)
}

/// Immediate, non-hidden subdirectories of `dir`, sorted.
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
    Ok(entries(dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .filter(|path| {
            !path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
        })
        .collect())
}
