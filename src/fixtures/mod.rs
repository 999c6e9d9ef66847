//! Test discovery from a fixture directory.
//!
//! Sources, in the order their packs are first seen:
//! 1. `.in` files in the test directory (pack named after the directory), then in each subdirectory (pack named
//!    after the subdirectory).
//! 2. `TESTS.json` in the test directory.
//! 3. `GENERATOR.{py,sh,check}` in the test directory.
//!
//! Packs with the same name from different sources are merged. Inside a pack, a later test with an existing
//! name replaces the earlier one where it stands.
//!
//! ## Test names
//!
//! | source | kind | name |
//! |---|---|---|
//! | `NAME.in` + `NAME.out` | static | `NAME#in/out` |
//! | `NAME.in` + `NAME.{py,sh,check}` | checker | `NAME#in/check` |
//! | `NAME.in` + catch-all only | checker | `NAME#in/all` |
//! | manifest `[input, output]` | static | `NAME#json` |
//! | manifest `[input]` | checker | `NAME#json/all` |
//! | generator `static` | static | `NAME#gen` |
//! | generator `checker` | checker | `NAME#gen/all` |
//!
//! The catch-all checker is `ALLTESTS.{py,sh,check}`. Subdirectories use their own when they have one and the
//! test directory's otherwise. Manifest and generator tests always use the test directory's.

pub mod files;
pub mod generator;
pub mod manifest;
pub mod time_limit;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use judgekit_core::{Expectation, KindMismatch};
use thiserror::Error;

use crate::harness::{Program, ScriptChecker, Test, TestPack};
use crate::resolve::script_program;
use files::{CATCH_ALL_STEM, find_script, scan_inputs, subdirectories};
use generator::{GENERATOR_STEM, GeneratedCase, GeneratorError};
use manifest::{MANIFEST_FILE, ManifestCase, ManifestError};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    KindMismatch(#[from] KindMismatch),
}

impl FixtureError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        FixtureError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Turns a test directory into packs of runnable tests.
pub trait FixtureLoader {
    /// ## Parameters
    /// - `test_dir`: root of the fixtures.
    /// - `program`: the program every test runs.
    /// - `time_limit`: applied to every test; `None` is unlimited.
    ///
    /// ## Errors
    /// - [`FixtureError`] for unreadable files, malformed manifests and failing generators.
    fn discover(
        &self,
        test_dir: &Path,
        program: Arc<Program>,
        time_limit: Option<Duration>,
    ) -> Result<Vec<TestPack>, FixtureError>;
}

/// The standard layout described in the module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryLoader;

impl FixtureLoader for DirectoryLoader {
    #[tracing::instrument(skip_all, fields(test_dir = %test_dir.display()))]
    fn discover(
        &self,
        test_dir: &Path,
        program: Arc<Program>,
        time_limit: Option<Duration>,
    ) -> Result<Vec<TestPack>, FixtureError> {
        let mut packs = PackBuilder::new(program, time_limit);
        let root_catch_all = find_script(test_dir, CATCH_ALL_STEM).map(|path| checker_for(&path));

        let root_name = dir_name(test_dir)?;
        add_directory(&mut packs, test_dir, &root_name, root_catch_all.as_ref())?;
        for subdir in subdirectories(test_dir)? {
            let name = dir_name(&subdir)?;
            let own = find_script(&subdir, CATCH_ALL_STEM).map(|path| checker_for(&path));
            add_directory(&mut packs, &subdir, &name, own.as_ref().or(root_catch_all.as_ref()))?;
        }

        let manifest_path = test_dir.join(MANIFEST_FILE);
        if manifest_path.is_file() {
            add_manifest(&mut packs, &manifest_path, root_catch_all.as_ref())?;
        }

        if let Some(path) = find_script(test_dir, GENERATOR_STEM) {
            add_generated(&mut packs, &path, root_catch_all.as_ref())?;
        }

        let packs = packs.finish();
        tracing::debug!(
            packs = packs.len(),
            tests = packs.iter().map(TestPack::len).sum::<usize>(),
            "discovery finished"
        );
        Ok(packs)
    }
}

fn checker_for(script: &Path) -> Expectation {
    Expectation::checker(ScriptChecker::new(script_program(script)))
}

/// Last path component, resolving `.` and `..` first.
fn dir_name(dir: &Path) -> Result<String, FixtureError> {
    let canonical = fs::canonicalize(dir).map_err(|source| FixtureError::io(dir, source))?;
    Ok(canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| canonical.display().to_string()))
}

fn add_directory(
    packs: &mut PackBuilder,
    dir: &Path,
    pack: &str,
    catch_all: Option<&Expectation>,
) -> Result<(), FixtureError> {
    packs.ensure(pack);
    for fixture in scan_inputs(dir)? {
        let mut covered = false;
        if let Some(output) = &fixture.output {
            packs.add(
                pack,
                format!("{}#in/out", fixture.name),
                &fixture.input,
                Expectation::Static(output.clone()),
            )?;
            covered = true;
        }
        if let Some(script) = &fixture.checker {
            packs.add(
                pack,
                format!("{}#in/check", fixture.name),
                &fixture.input,
                checker_for(script),
            )?;
            covered = true;
        }
        if covered {
            continue;
        }
        match catch_all {
            Some(checker) => packs.add(pack, format!("{}#in/all", fixture.name), &fixture.input, checker.clone())?,
            None => tracing::debug!(pack, fixture = %fixture.name, "input has no expectation, skipping"),
        }
    }
    Ok(())
}

fn add_manifest(packs: &mut PackBuilder, path: &Path, catch_all: Option<&Expectation>) -> Result<(), FixtureError> {
    let text = fs::read_to_string(path).map_err(|source| FixtureError::io(path, source))?;
    let entries = manifest::parse(&text).map_err(|source| FixtureError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;

    for entry in entries {
        packs.ensure(&entry.pack);
        match (entry.case, catch_all) {
            (ManifestCase::Static { input, output }, _) => {
                packs.add(&entry.pack, format!("{}#json", entry.test), &input, Expectation::Static(output))?;
            }
            (ManifestCase::Checker { input }, Some(checker)) => {
                packs.add(&entry.pack, format!("{}#json/all", entry.test), &input, checker.clone())?;
            }
            (ManifestCase::Checker { .. }, None) => {
                tracing::debug!(pack = %entry.pack, test = %entry.test, "manifest test needs a catch-all checker, skipping");
            }
        }
    }
    Ok(())
}

fn add_generated(packs: &mut PackBuilder, path: &Path, catch_all: Option<&Expectation>) -> Result<(), FixtureError> {
    for (pack, cases) in generator::run(path)? {
        packs.ensure(&pack);
        for case in cases {
            match (case, catch_all) {
                (GeneratedCase::Static { name, input, output }, _) => {
                    packs.add(&pack, format!("{name}#gen"), &input, Expectation::Static(output))?;
                }
                (GeneratedCase::Checker { name, input }, Some(checker)) => {
                    packs.add(&pack, format!("{name}#gen/all"), &input, checker.clone())?;
                }
                (GeneratedCase::Checker { name, .. }, None) => {
                    tracing::debug!(pack = %pack, test = %name, "generated test needs a catch-all checker, skipping");
                }
            }
        }
    }
    Ok(())
}

/// Packs in first-seen order, merged by name.
struct PackBuilder {
    program: Arc<Program>,
    time_limit: Option<Duration>,
    packs: Vec<TestPack>,
}

impl PackBuilder {
    fn new(program: Arc<Program>, time_limit: Option<Duration>) -> Self {
        Self {
            program,
            time_limit,
            packs: Vec::new(),
        }
    }

    fn ensure(&mut self, pack: &str) -> &mut TestPack {
        let idx = match self.packs.iter().position(|p| p.name() == pack) {
            Some(idx) => idx,
            None => {
                self.packs.push(TestPack::new(pack, Vec::new()));
                self.packs.len() - 1
            }
        };
        &mut self.packs[idx]
    }

    fn add(&mut self, pack: &str, name: String, input: &str, expectation: Expectation) -> Result<(), FixtureError> {
        let kind = expectation.kind();
        let test = Test::new(Arc::clone(&self.program), name, kind, input, expectation, self.time_limit)?;
        if let Some(old) = self.ensure(pack).upsert(test) {
            tracing::warn!(pack, test = old.name(), "duplicate test name, keeping the later one");
        }
        Ok(())
    }

    fn finish(self) -> Vec<TestPack> {
        self.packs
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used)]
mod tests {
    use judgekit_core::TestKind;

    use super::*;

    fn load(dir: &Path) -> Vec<TestPack> {
        DirectoryLoader
            .discover(dir, Arc::new(Program::new("cat")), Some(Duration::from_secs(1)))
            .unwrap()
    }

    fn names(pack: &TestPack) -> Vec<&str> {
        pack.tests().iter().map(Test::name).collect()
    }

    #[test]
    fn manifest_arity_decides_kind_within_one_pack() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ALLTESTS.sh"), "exit 0").unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"pack1": {"t1": ["5", "10"], "t2": ["7"]}}"#,
        )
        .unwrap();

        let packs = load(dir.path());
        let pack1 = packs.iter().find(|p| p.name() == "pack1").unwrap();
        assert_eq!(names(pack1), ["t1#json", "t2#json/all"]);
        assert_eq!(pack1.tests()[0].kind(), TestKind::Static);
        assert_eq!(pack1.tests()[1].kind(), TestKind::Checker);
    }

    #[test]
    fn single_element_without_catch_all_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"p": {"only": ["7"]}}"#).unwrap();
        let packs = load(dir.path());
        let p = packs.iter().find(|p| p.name() == "p").unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn subdirectory_prefers_its_own_catch_all() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("ALLTESTS.sh"), "exit 0").unwrap();
        fs::create_dir(root.join("own")).unwrap();
        fs::write(root.join("own/ALLTESTS.sh"), "exit 1").unwrap();
        fs::write(root.join("own/x.in"), "1").unwrap();
        fs::create_dir(root.join("inherit")).unwrap();
        fs::write(root.join("inherit/y.in"), "2").unwrap();

        let packs = load(root);
        let own = packs.iter().find(|p| p.name() == "own").unwrap();
        let inherit = packs.iter().find(|p| p.name() == "inherit").unwrap();
        assert_eq!(names(own), ["x#in/all"]);
        assert_eq!(names(inherit), ["y#in/all"]);

        let Expectation::Checker(own_checker) = own.tests()[0].expectation() else {
            panic!("expected a checker");
        };
        assert_eq!(own_checker.check("1", "1"), Ok(false));
        let Expectation::Checker(root_checker) = inherit.tests()[0].expectation() else {
            panic!("expected a checker");
        };
        assert_eq!(root_checker.check("2", "2"), Ok(true));
    }

    #[test]
    fn duplicate_names_replace_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("suite");
        fs::create_dir(&root).unwrap();
        let root_name = dir_name(&root).unwrap();
        assert_eq!(root_name, "suite");
        fs::write(root.join("a.in"), "1").unwrap();
        fs::write(root.join("a.out"), "root").unwrap();
        fs::write(root.join("b.in"), "2").unwrap();
        fs::write(root.join("b.out"), "2").unwrap();
        // A subdirectory sharing the test directory's name feeds the same pack.
        let twin = root.join(&root_name);
        fs::create_dir(&twin).unwrap();
        fs::write(twin.join("a.in"), "1").unwrap();
        fs::write(twin.join("a.out"), "twin").unwrap();

        let packs = load(&root);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].name(), root_name);
        assert_eq!(names(&packs[0]), ["a#in/out", "b#in/out"]);
        assert!(matches!(packs[0].tests()[0].expectation(), Expectation::Static(out) if out == "twin"));
    }

    #[test]
    fn manifest_pack_merges_with_directory_pack() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("suite");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.in"), "1").unwrap();
        fs::write(root.join("a.out"), "1").unwrap();
        fs::write(root.join(MANIFEST_FILE), r#"{"suite": {"m": ["2", "2"]}}"#).unwrap();

        let packs = load(&root);
        assert_eq!(packs.len(), 1);
        assert_eq!(names(&packs[0]), ["a#in/out", "m#json"]);
    }

    #[test]
    fn generator_tests_join_their_packs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("GENERATOR.sh"),
            r#"echo '{"big": [{"name": "n", "kind": "static", "input": "1", "output": "1"}, {"name": "r", "kind": "checker", "input": "2"}], "solo": [{"name": "s", "kind": "checker", "input": "3"}]}'"#,
        )
        .unwrap();
        let packs = load(dir.path());
        let big = packs.iter().find(|p| p.name() == "big").unwrap();
        assert_eq!(names(big), ["n#gen"]);
        let solo = packs.iter().find(|p| p.name() == "solo").unwrap();
        assert!(solo.is_empty());
    }

    #[test]
    fn bad_manifest_is_a_fixture_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"p": {"t": ["1", "2", "3"]}}"#).unwrap();
        let err = DirectoryLoader
            .discover(dir.path(), Arc::new(Program::new("cat")), None)
            .unwrap_err();
        assert!(matches!(err, FixtureError::Manifest { .. }));
    }
}
