//! End-to-end tests: fixture directory in, pack reports and events out.
//!
//! Programs and checkers are small shell scripts run through `sh`, so nothing here needs a compiler.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use judgekit::cli::commands::{RunConfig, prepare};
use judgekit::harness::ScriptChecker;
use judgekit::{
    CheckError, DefaultProgramResolver, DirectoryLoader, Event, Expectation, Interrupts, Program, RecordingReporter,
    RunError, Test, TestKind, TestPack, render_summary, run_packs,
};

const DOUBLER: &str = "read x; echo $((x * 2))\n";

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A suite directory with a doubling program at `suite/sol.sh`.
fn suite() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("suite");
    write(&root.join("sol.sh"), DOUBLER);
    (tmp, root)
}

fn sh(script: &str) -> Arc<Program> {
    Arc::new(Program::new("sh").args(["-c", script]))
}

fn static_test(program: &Arc<Program>, name: &str, input: &str, expected: &str) -> Test {
    Test::new(
        Arc::clone(program),
        name,
        TestKind::Static,
        input,
        Expectation::Static(expected.into()),
        None,
    )
    .unwrap()
}

#[tokio::test]
async fn directory_manifest_and_subdirectories() {
    let (_tmp, root) = suite();
    write(&root.join("a.in"), "3\n");
    write(&root.join("a.out"), "6\n");
    write(&root.join("b.in"), "5");
    write(
        &root.join("b.sh"),
        r#"payload=$(cat); case "$payload" in *'"output":"10"'*) exit 0;; *) echo "expected 10"; exit 1;; esac"#,
    );
    write(&root.join("ALLTESTS.sh"), "cat > /dev/null; exit 0\n");
    write(&root.join("extra/c.in"), "4");
    write(&root.join("extra/c.out"), "9");
    write(&root.join("TESTS.json"), r#"{"pack1": {"t1": ["5", "10"], "t2": ["7"]}}"#);

    let config = RunConfig::from_args(&root.join("sol.sh"), Some(root.as_path()), None, false).unwrap();
    let mut rec = RecordingReporter::default();
    let packs = prepare(&config, &DefaultProgramResolver, &DirectoryLoader, &mut rec).unwrap();

    let layout: Vec<(&str, Vec<&str>)> = packs
        .iter()
        .map(|p| (p.name(), p.tests().iter().map(Test::name).collect()))
        .collect();
    assert_eq!(
        layout,
        vec![
            ("suite", vec!["a#in/out", "b#in/check"]),
            ("extra", vec!["c#in/out"]),
            ("pack1", vec!["t1#json", "t2#json/all"]),
        ]
    );

    let summary = run_packs(&packs, &mut rec, &mut Interrupts::never()).await.unwrap();
    assert_eq!(summary.pack_count(), 3);
    assert_eq!(summary.packs_passed(), 2);
    assert_eq!((summary.tests_passed(), summary.test_count()), (4, 5));

    assert!(rec.events.contains(&Event::Failure(
        "Wrong answer.\nInput:\n4\nExpected output:\n9\nActual output:\n8".into()
    )));
    assert!(rec.events.contains(&Event::Success("[pack1] All tests passed!".into())));
    assert!(rec.events.contains(&Event::Info("[2/3] Running test pack extra...".into())));

    render_summary(&summary, &mut rec);
    assert_eq!(
        rec.last().map(Event::text),
        Some(
            "Passed 2 out of 3 packs (67%).\nThat's 4 out of 5 tests (80%).\n  \
             1 ❯ suite (2/2 - 100% tests passed)\n  \
             2 ❯ extra (0/1 - 0% tests passed)\n  \
             3 ❯ pack1 (2/2 - 100% tests passed)"
        )
    );
}

#[tokio::test]
async fn time_limit_from_file_applies_to_every_test() {
    let (_tmp, root) = suite();
    write(&root.join("slow.sh"), "sleep 2; echo 6\n");
    write(&root.join("TIMELIMIT.txt"), "1\n");
    write(&root.join("a.in"), "3");
    write(&root.join("a.out"), "6");
    write(&root.join("b.in"), "4");
    write(&root.join("b.out"), "8");

    let config = RunConfig::from_args(&root.join("slow.sh"), Some(root.as_path()), None, false).unwrap();
    assert_eq!(config.time_limit, Some(Duration::from_secs(1)));
    let mut rec = RecordingReporter::default();
    let packs = prepare(&config, &DefaultProgramResolver, &DirectoryLoader, &mut rec).unwrap();

    let summary = run_packs(&packs, &mut rec, &mut Interrupts::never()).await.unwrap();
    assert_eq!((summary.tests_passed(), summary.test_count()), (0, 2));
    let timeouts = rec
        .events
        .iter()
        .filter(|e| **e == Event::Failure("Time limit (1s) exceeded.".into()))
        .count();
    assert_eq!(timeouts, 2);
}

#[tokio::test]
async fn interrupt_ends_only_the_running_pack() {
    let slow = TestPack::new("slow", vec![static_test(&sh("sleep 5; echo 1"), "s", "", "1")]);
    let fast = TestPack::new("fast", vec![static_test(&sh("echo 1"), "f", "", "1")]);
    let packs = vec![slow, fast];

    let (handle, mut interrupts) = Interrupts::channel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.interrupt();
    });

    let start = Instant::now();
    let mut rec = RecordingReporter::default();
    let summary = run_packs(&packs, &mut rec, &mut interrupts).await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(5));

    assert_eq!(summary.packs[0].ran, 0);
    assert_eq!(summary.packs[1].passed, 1);
    assert!(rec.events.contains(&Event::Warning("Interrupted!".into())));
    assert!(rec.events.contains(&Event::Warning("[slow] Ran only 0 out of 1 tests (0 passed).".into())));
    assert!(rec.events.contains(&Event::Success("[fast] All tests passed!".into())));
}

#[tokio::test]
async fn interrupt_during_checking_does_not_leak_into_the_next_pack() {
    let (handle, mut interrupts) = Interrupts::channel();
    let interrupting = move |_: &str, _: &str| -> Result<bool, CheckError> {
        handle.interrupt();
        Ok(true)
    };
    let checked = Test::new(
        sh("echo 1"),
        "a#in/check",
        TestKind::Checker,
        "",
        Expectation::checker(interrupting),
        None,
    )
    .unwrap();
    let packs = vec![
        TestPack::new("A", vec![checked]),
        TestPack::new("B", vec![static_test(&sh("echo 1"), "b", "", "1")]),
    ];

    let mut rec = RecordingReporter::default();
    let summary = run_packs(&packs, &mut rec, &mut interrupts).await.unwrap();
    assert_eq!((summary.packs[0].ran, summary.packs[0].passed), (1, 1));
    assert_eq!((summary.packs[1].ran, summary.packs[1].total), (1, 1));
    assert!(!rec.events.contains(&Event::Warning("Interrupted!".into())));
    assert!(rec.events.contains(&Event::Success("[B] All tests passed!".into())));
}

#[tokio::test]
async fn checker_fault_aborts_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    let checker_path = tmp.path().join("broken.sh");
    write(&checker_path, "cat > /dev/null; exit 2\n");

    let broken = Test::new(
        sh("echo 1"),
        "x#in/check",
        TestKind::Checker,
        "1",
        Expectation::checker(ScriptChecker::new(Program::new("sh").arg(&checker_path))),
        None,
    )
    .unwrap();
    let packs = vec![
        TestPack::new("first", vec![broken]),
        TestPack::new("second", vec![static_test(&sh("echo 1"), "y", "", "1")]),
    ];

    let mut rec = RecordingReporter::default();
    let err = run_packs(&packs, &mut rec, &mut Interrupts::never()).await.unwrap_err();
    assert!(matches!(err, RunError::CheckerFault { ref test, .. } if test == "x#in/check"));
    assert!(!rec.events.iter().any(|e| e.text().contains("second")));
}

#[tokio::test]
async fn checker_message_is_shown_on_rejection() {
    let (_tmp, root) = suite();
    write(&root.join("a.in"), "5");
    write(&root.join("ALLTESTS.sh"), "cat > /dev/null; echo 'not a multiple of 3'; exit 1\n");

    let config = RunConfig::from_args(&root.join("sol.sh"), None, None, false).unwrap();
    let mut rec = RecordingReporter::default();
    let packs = prepare(&config, &DefaultProgramResolver, &DirectoryLoader, &mut rec).unwrap();
    assert_eq!(packs[0].tests()[0].name(), "a#in/all");

    run_packs(&packs, &mut rec, &mut Interrupts::never()).await.unwrap();
    assert!(rec.events.contains(&Event::Failure(
        "Wrong answer.\nInput:\n5\nActual output:\n10\nChecker message:\nnot a multiple of 3".into()
    )));
}
