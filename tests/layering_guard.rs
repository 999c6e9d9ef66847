//! Layering guardrails to keep the semantic core free of IO.
//!
//! `judgekit_core` decides what a pass is and how results add up; it must never grow a dependency on the async
//! runtime, process handling or serialization. This test scans its `Cargo.toml` and fails if one of those crates
//! appears in `[dependencies]`.

const FORBIDDEN: &[&str] = &["tokio", "serde", "serde_json", "tracing", "miette", "clap"];

#[test]
fn core_does_not_depend_on_io_crates() {
    let manifest = include_str!("../crates/judgekit_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            // Any new section after `[dependencies]` ends the scan window.
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let name = line.split(['=', '#', ' ']).next().unwrap_or("").trim();
        if FORBIDDEN.contains(&name) {
            panic!("`{name}` must not appear in judgekit_core's [dependencies]; the core stays IO-free");
        }
    }
}

#[test]
fn harness_depends_on_core() {
    let manifest = include_str!("../Cargo.toml");
    assert!(
        manifest.lines().any(|l| l.trim_start().starts_with("judgekit_core")),
        "the root package must use judgekit_core for its verification rules"
    );
}
