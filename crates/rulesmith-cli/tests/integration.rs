#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rulesmith(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rulesmith").unwrap();
    cmd.current_dir(dir.path())
        .env("RULESMITH_ROOT", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_project(dir: &TempDir) {
    rulesmith(dir).arg("init").assert().success();
}

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn read(dir: &TempDir, rel: &str) -> String {
    std::fs::read_to_string(dir.path().join(rel)).unwrap()
}

const TODO: &str = "\
# TODO

## Plan
- [x] Outline release
- [ ] Write changelog
- [ ] Tag release
";

// ---------------------------------------------------------------------------
// rulesmith init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_scaffolding() {
    let dir = TempDir::new().unwrap();
    rulesmith(&dir).arg("init").assert().success();

    assert!(dir.path().join(".rulesmith/config.yaml").exists());
    assert!(dir.path().join("rules/general.md").exists());
    assert!(read(&dir, "TODO.md").contains("- [ ] Run the test suite"));
}

#[test]
fn init_is_idempotent_and_keeps_edits() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(&dir, "TODO.md", TODO);
    rulesmith(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
    assert_eq!(read(&dir, "TODO.md"), TODO);
}

// ---------------------------------------------------------------------------
// rulesmith compose
// ---------------------------------------------------------------------------

#[test]
fn compose_to_stdout_in_requested_order() {
    let dir = TempDir::new().unwrap();
    write(&dir, "rules/general.md", "A\n");
    write(&dir, "rules/typescript.md", "B\n");

    rulesmith(&dir)
        .args(["compose", "general", "typescript", "--stdout"])
        .assert()
        .success()
        .stdout("A\n\nB\n");

    rulesmith(&dir)
        .args(["compose", "typescript", "general", "--stdout"])
        .assert()
        .success()
        .stdout("B\n\nA\n");
}

#[test]
fn compose_writes_output_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "rules/general.md", "A\n");
    write(&dir, "rules/typescript.md", "B\n");

    rulesmith(&dir)
        .args(["compose", "general", "typescript", "-o", "out/CLAUDE.md"])
        .assert()
        .success();
    assert_eq!(read(&dir, "out/CLAUDE.md"), "A\n\nB\n");
}

#[test]
fn compose_defaults_come_from_config() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    rulesmith(&dir).arg("compose").assert().success();
    let out = read(&dir, ".cursorrules");
    assert!(out.starts_with("# General"));
    assert_eq!(out, read(&dir, "rules/general.md"));
}

#[test]
fn compose_unknown_document_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "rules/general.md", "A\n");

    rulesmith(&dir)
        .args(["compose", "general", "python", "-o", "out.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("rule document not found: python"));
    assert!(!dir.path().join("out.md").exists());
}

#[test]
fn compose_missing_rules_dir_fails() {
    let dir = TempDir::new().unwrap();
    rulesmith(&dir)
        .args(["compose", "general", "--stdout"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("rules directory not found"));
}

#[test]
fn compose_section_preserves_surrounding_text() {
    let dir = TempDir::new().unwrap();
    write(&dir, "rules/general.md", "A\n");
    write(&dir, "rules/rust.md", "R\n");
    write(&dir, "CLAUDE.md", "# Project\n\nHand-written notes.\n");

    rulesmith(&dir)
        .args(["compose", "general", "-o", "CLAUDE.md", "--section"])
        .assert()
        .success()
        .stdout(predicate::str::contains("appended"));
    assert_eq!(
        read(&dir, "CLAUDE.md"),
        "# Project\n\nHand-written notes.\n\n<!-- rulesmith:start -->\nA\n<!-- rulesmith:end -->\n"
    );

    rulesmith(&dir)
        .args(["compose", "general", "rust", "-o", "CLAUDE.md", "--section"])
        .assert()
        .success()
        .stdout(predicate::str::contains("replaced"));
    assert_eq!(
        read(&dir, "CLAUDE.md"),
        "# Project\n\nHand-written notes.\n\n<!-- rulesmith:start -->\nA\n\nR\n<!-- rulesmith:end -->\n"
    );
}

// ---------------------------------------------------------------------------
// rulesmith rules
// ---------------------------------------------------------------------------

#[test]
fn rules_list_shows_documents() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(&dir, "rules/typescript.md", "B\n");

    rulesmith(&dir)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("general"))
        .stdout(predicate::str::contains("typescript"));
}

#[test]
fn rules_show_unknown_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    rulesmith(&dir)
        .args(["rules", "show", "nope"])
        .assert()
        .code(1);
}

// ---------------------------------------------------------------------------
// rulesmith bump
// ---------------------------------------------------------------------------

#[test]
fn bump_feature_is_minor() {
    let dir = TempDir::new().unwrap();
    write(&dir, "commits.txt", "fix: null check\nfeat: add export button\n");

    rulesmith(&dir)
        .args(["bump", "2.3.1", "--from-commits", "commits.txt"])
        .assert()
        .success()
        .stdout("2.4.0\n");
}

#[test]
fn bump_breaking_is_major() {
    let dir = TempDir::new().unwrap();
    write(&dir, "commits.txt", "feat!: remove legacy API\n");

    rulesmith(&dir)
        .args(["bump", "1.0.0", "--from-commits", "commits.txt"])
        .assert()
        .success()
        .stdout("2.0.0\n");
}

#[test]
fn bump_reads_nul_separated_stdin() {
    let dir = TempDir::new().unwrap();
    rulesmith(&dir)
        .args(["bump", "v0.3.9", "--from-commits", "-", "--tag"])
        .write_stdin("refactor: split parser\n\nBREAKING CHANGE: new AST\n\0docs: typo\n\0")
        .assert()
        .success()
        .stdout("v1.0.0\n");
}

#[test]
fn bump_empty_history_is_patch() {
    let dir = TempDir::new().unwrap();
    write(&dir, "commits.txt", "");

    rulesmith(&dir)
        .args(["bump", "0.1.0", "--from-commits", "commits.txt"])
        .assert()
        .success()
        .stdout("0.1.1\n");
}

#[test]
fn bump_json_explains_plan() {
    let dir = TempDir::new().unwrap();
    write(&dir, "commits.txt", "fix: a\nfeat(ui): b\nchore: c\n");

    let output = rulesmith(&dir)
        .args(["bump", "1.2.3", "--from-commits", "commits.txt", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["next"], "1.3.0");
    assert_eq!(value["bump"], "minor");
    assert_eq!(value["features"], 1);
    assert_eq!(value["fixes"], 1);
    assert_eq!(value["other"], 1);
}

#[test]
fn bump_invalid_version_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "commits.txt", "feat: x\n");

    rulesmith(&dir)
        .args(["bump", "1.2", "--from-commits", "commits.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid version '1.2'"));
}

#[test]
fn bump_overflowing_version_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "commits.txt", "feat!: x\n");

    rulesmith(&dir)
        .args(["bump", "18446744073709551615.0.0", "--from-commits", "commits.txt"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot be bumped"));
}

// ---------------------------------------------------------------------------
// rulesmith ledger
// ---------------------------------------------------------------------------

#[test]
fn ledger_mark_done_rewrites_item() {
    let dir = TempDir::new().unwrap();
    write(&dir, "TODO.md", TODO);

    rulesmith(&dir)
        .args([
            "ledger",
            "mark-done",
            "Write changelog",
            "--at",
            "2026-05-01T12:00:00Z",
            "--note",
            "CHANGELOG.md",
        ])
        .assert()
        .success();

    assert_eq!(
        read(&dir, "TODO.md"),
        "# TODO\n\n## Plan\n- [x] Outline release\n\
         - [x] Write changelog (done: 2026-05-01T12:00:00Z; CHANGELOG.md)\n\
         - [ ] Tag release\n"
    );
}

#[test]
fn ledger_mark_done_unknown_item_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, "TODO.md", TODO);

    rulesmith(&dir)
        .args(["ledger", "mark-done", "Write change"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("checklist item not found"));
    assert_eq!(read(&dir, "TODO.md"), TODO);
}

#[test]
fn ledger_mark_blocked_with_custom_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "docs/PLAN.md", TODO);

    rulesmith(&dir)
        .args([
            "ledger",
            "--file",
            "docs/PLAN.md",
            "mark-blocked",
            "Tag release",
            "waiting",
            "for",
            "CI",
        ])
        .assert()
        .success();
    assert!(read(&dir, "docs/PLAN.md").contains("- [?] Tag release (waiting for CI)\n"));
}

#[test]
fn ledger_cannot_block_done_item() {
    let dir = TempDir::new().unwrap();
    write(&dir, "TODO.md", TODO);

    rulesmith(&dir)
        .args(["ledger", "mark-blocked", "Outline release", "late"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid transition"));
}

#[test]
fn ledger_rejects_unbalanced_reason_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "TODO.md", TODO);

    rulesmith(&dir)
        .args(["ledger", "mark-blocked", "Tag release", "waiting", "(on", "ops"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unbalanced parentheses"));
    assert_eq!(read(&dir, "TODO.md"), TODO);

    rulesmith(&dir)
        .args(["ledger", "mark-done", "Tag release", "--note", "closes (#3)"])
        .assert()
        .success();
    rulesmith(&dir)
        .args(["ledger", "next"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write changelog"));
    assert!(read(&dir, "TODO.md").contains("; closes (#3))\n"));
}

#[test]
fn ledger_add_next_and_list() {
    let dir = TempDir::new().unwrap();
    write(&dir, "TODO.md", TODO);

    rulesmith(&dir)
        .args(["ledger", "add", "Release", "Publish", "crate"])
        .assert()
        .success();
    assert!(read(&dir, "TODO.md").ends_with("- [ ] Tag release\n\n## Release\n- [ ] Publish crate\n"));

    rulesmith(&dir)
        .args(["ledger", "next"])
        .assert()
        .success()
        .stdout("Write changelog\n");

    rulesmith(&dir)
        .args(["ledger", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/4 done, 3 pending, 0 blocked"))
        .stdout(predicate::str::contains("Publish crate"));
}

#[test]
fn ledger_list_json() {
    let dir = TempDir::new().unwrap();
    write(&dir, "TODO.md", "# Work\n- [?] Deploy (no creds)\n");

    let output = rulesmith(&dir)
        .args(["ledger", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["description"], "Deploy");
    assert_eq!(value[0]["state"], "blocked");
    assert_eq!(value[0]["reason"], "no creds");
    assert_eq!(value[0]["section"], "Work");
}

#[test]
fn ledger_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    rulesmith(&dir)
        .args(["ledger", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read ledger"));
}

// ---------------------------------------------------------------------------
// rulesmith config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_after_init() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    rulesmith(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_requires_init() {
    let dir = TempDir::new().unwrap();
    rulesmith(&dir)
        .args(["config", "validate"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(
        &dir,
        ".rulesmith/config.yaml",
        "project:\n  name: app\nledger:\n  path: ''\n",
    );
    rulesmith(&dir)
        .args(["config", "validate"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[error] ledger.path is empty"));
}
