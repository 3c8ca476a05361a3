//! End-to-end session workflows against real temporary repositories

mod common;

use common::{repo_with_file, TestContext, TestContextBuilder};
use predicates::prelude::*;

fn open(context: &TestContext, name: &str) {
    context.kaishaku().args(["open", name]).assert().success();
}

#[test]
fn test_open_detaches_and_writes_records() {
    let context = repo_with_file("notes.txt", "one\n");
    let main_head = context.head().unwrap();

    context
        .kaishaku()
        .args(["open", "exp1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Session 'exp1' started at {main_head}"
        )));

    assert_eq!(context.record("exp1", "session").as_deref(), Some("main"));
    assert_eq!(context.record("exp1", "head"), Some(main_head.clone()));
    assert!(context.record("exp1", "time").is_some());
    assert!(context.record("exp1", "desc").is_none());
    assert_eq!(context.active_session().as_deref(), Some("exp1"));
    assert_eq!(context.current_branch().unwrap(), "HEAD");
    assert_eq!(context.head().unwrap(), main_head);
}

#[test]
fn test_open_at_explicit_ref() {
    let context = repo_with_file("notes.txt", "one\n");
    let first = context.head().unwrap();
    context.create_file("notes.txt", "two\n").unwrap();
    context.commit_all("Second").unwrap();

    context
        .kaishaku()
        .args(["checkout", "exp1", "HEAD~1"])
        .assert()
        .success();

    assert_eq!(context.record("exp1", "head"), Some(first.clone()));
    assert_eq!(context.head().unwrap(), first);
    assert_eq!(context.read_file("notes.txt").unwrap(), "one\n");
}

#[test]
fn test_open_refuses_existing_session_and_detached_head() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");

    // Still detached inside exp1
    context
        .kaishaku()
        .args(["open", "exp2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("detached"));
    assert!(!context.store_dir().join("exp2").exists());

    context.kaishaku().args(["exit", "--force"]).assert().success();
    context
        .kaishaku()
        .args(["open", "exp1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_open_unknown_ref_leaves_no_records() {
    let context = repo_with_file("notes.txt", "one\n");

    context
        .kaishaku()
        .args(["open", "exp1", "no-such-ref"])
        .assert()
        .code(1);

    assert!(!context.store_dir().join("exp1").exists());
    assert_eq!(context.active_session(), None);
    assert_eq!(context.current_branch().unwrap(), "main");
}

#[test]
fn test_exit_with_auto_save_commits_and_keeps_records() {
    let context = TestContextBuilder::new()
        .unwrap()
        .with_git()
        .with_file("notes.txt", "one\n")
        .with_config("kaishaku.auto.save", "1")
        .build()
        .unwrap();
    open(&context, "exp1");
    let session_head = context.head().unwrap();

    context.create_file("notes.txt", "changed\n").unwrap();

    context
        .kaishaku()
        .arg("exit")
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes saved successfully."))
        .stdout(predicate::str::contains(
            "Returned to branch 'main' from session 'exp1'",
        ));

    assert_eq!(context.current_branch().unwrap(), "main");
    assert_eq!(context.active_session(), None);
    assert_eq!(context.record("exp1", "head"), Some(session_head));
    assert!(context.record("exp1", "session").is_some());
    assert_eq!(context.read_file("notes.txt").unwrap(), "one\n");

    // the save commit is only reachable from the reflog once HEAD moves back
    let saved = context.git(&["reflog"]).unwrap();
    assert!(saved.contains("[kaishaku] Save changes from session 'exp1'"));
}

#[test]
fn test_exit_declined_keeps_session() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context.create_file("notes.txt", "changed\n").unwrap();

    context
        .kaishaku()
        .arg("exit")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));

    assert_eq!(context.active_session().as_deref(), Some("exp1"));
    assert_eq!(context.read_file("notes.txt").unwrap(), "changed\n");
}

#[test]
fn test_exit_confirmed_discards_changes() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context.create_file("notes.txt", "changed\n").unwrap();

    context
        .kaishaku()
        .arg("exit")
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes discarded."));

    assert_eq!(context.current_branch().unwrap(), "main");
    assert_eq!(context.read_file("notes.txt").unwrap(), "one\n");
}

#[test]
fn test_exit_keep_stashes_changes() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context.create_file("notes.txt", "changed\n").unwrap();

    context
        .kaishaku()
        .args(["exit", "--keep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Changes stashed successfully."));

    let stashes = context.git(&["stash", "list"]).unwrap();
    assert!(stashes.contains("kaishaku: auto-stash from session 'exp1'"));
    assert_eq!(context.current_branch().unwrap(), "main");
}

#[test]
fn test_exit_without_session_fails() {
    let context = repo_with_file("notes.txt", "one\n");

    context
        .kaishaku()
        .arg("exit")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No active kaishaku session."));
}

#[test]
fn test_resume_returns_to_session_commit() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context.create_file("notes.txt", "experiment\n").unwrap();
    let experiment = context.commit_all("Experiment").unwrap();
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();

    // head record still names the commit the session was opened at
    let opened_at = context.record("exp1", "head").unwrap();
    assert_ne!(opened_at, experiment);

    context
        .kaishaku()
        .args(["switch", "exp1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to session 'exp1'"));

    assert_eq!(context.active_session().as_deref(), Some("exp1"));
    assert_eq!(context.head().unwrap(), opened_at);
    assert_eq!(context.record("exp1", "session").as_deref(), Some("main"));
}

#[test]
fn test_resume_unknown_session() {
    let context = repo_with_file("notes.txt", "one\n");

    context
        .kaishaku()
        .args(["resume", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn test_branch_off_promotes_session() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");

    context
        .kaishaku()
        .args(["branch-off", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Created branch 'feature' from session 'exp1'",
        ));

    assert_eq!(context.current_branch().unwrap(), "feature");
    assert_eq!(context.record("exp1", "head").as_deref(), Some("HEAD"));

    // Sentinel sessions resume onto whatever HEAD currently is
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();
    context
        .kaishaku()
        .args(["resume", "exp1"])
        .assert()
        .success();
    assert_eq!(context.current_branch().unwrap(), "main");
}

#[test]
fn test_save_back_clean_merge() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context.create_file("added.txt", "new work\n").unwrap();
    context.commit_all("Add work").unwrap();

    context
        .kaishaku()
        .args(["save-back", "tmp-save"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Successfully saved changes from session 'exp1' to branch 'main'",
        ));

    assert_eq!(context.current_branch().unwrap(), "main");
    assert!(context.file_exists("added.txt"));
    assert!(!context.git_succeeds(&["rev-parse", "--verify", "--quiet", "refs/heads/tmp-save"]));
    assert_eq!(context.record("exp1", "head").as_deref(), Some("HEAD"));
}

#[test]
fn test_save_back_conflict_keeps_temp_branch() {
    let context = repo_with_file("notes.txt", "base\n");
    context.create_file("notes.txt", "main change\n").unwrap();
    context.commit_all("Main change").unwrap();

    context
        .kaishaku()
        .args(["open", "exp1", "HEAD~1"])
        .assert()
        .success();
    context.create_file("notes.txt", "session change\n").unwrap();
    context.commit_all("Session change").unwrap();

    context
        .kaishaku()
        .args(["save", "tmp-save"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tmp-save"));

    assert_eq!(context.current_branch().unwrap(), "tmp-save");
    assert!(context.git_succeeds(&["rev-parse", "--verify", "--quiet", "refs/heads/tmp-save"]));
    assert_eq!(context.read_file("notes.txt").unwrap(), "session change\n");
}

#[test]
fn test_save_back_refuses_existing_branch() {
    let context = repo_with_file("notes.txt", "one\n");
    context.git(&["branch", "taken"]).unwrap();
    open(&context, "exp1");

    context
        .kaishaku()
        .args(["save-back", "taken"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(context.current_branch().unwrap(), "HEAD");
}

#[test]
fn test_abort_active_session() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");

    context
        .kaishaku()
        .arg("abort")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted session 'exp1'"));

    assert!(!context.store_dir().join("exp1").exists());
    assert_eq!(context.active_session(), None);
    assert_eq!(context.current_branch().unwrap(), "main");
}

#[test]
fn test_abort_removes_corrupted_session() {
    let context = repo_with_file("notes.txt", "one\n");
    std::fs::create_dir_all(context.store_dir().join("broken")).unwrap();
    std::fs::write(context.store_dir().join("broken").join("session"), "main\n").unwrap();

    context
        .kaishaku()
        .args(["abort", "broken"])
        .assert()
        .success();

    assert!(!context.store_dir().join("broken").exists());
}

#[test]
fn test_rename_round_trip_preserves_records() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();

    let before: Vec<Option<String>> = ["session", "head", "time"]
        .iter()
        .map(|field| context.record("exp1", field))
        .collect();

    context
        .kaishaku()
        .args(["rename", "exp1", "exp2"])
        .assert()
        .success()
        .stdout("Renamed session 'exp1' to 'exp2'\n");
    assert!(!context.store_dir().join("exp1").exists());

    context
        .kaishaku()
        .args(["rename", "exp2", "exp1"])
        .assert()
        .success();

    let after: Vec<Option<String>> = ["session", "head", "time"]
        .iter()
        .map(|field| context.record("exp1", field))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_rename_active_session_fails() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");

    context
        .kaishaku()
        .args(["rename", "exp1", "exp2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot rename active session"));
}

#[test]
fn test_list_skips_corrupted_sessions() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();
    open(&context, "exp2");
    std::fs::remove_file(context.store_dir().join("exp1").join("head")).unwrap();

    context
        .kaishaku()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("kaishaku sessions:"))
        .stdout(predicate::str::contains("  * exp2"))
        .stdout(predicate::str::contains("exp1").not())
        .stderr(predicate::str::contains(
            "Session 'exp1' appears to be corrupted",
        ));
}

#[test]
fn test_list_json() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");

    let output = context.kaishaku().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["active"], "exp1");
    assert_eq!(json["sessions"][0]["name"], "exp1");
    assert_eq!(json["sessions"][0]["original_ref"], "main");
    assert_eq!(json["sessions"][0]["head_ref_exists"], true);
}

#[test]
fn test_status_reports_active_session() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context.create_file("notes.txt", "changed\n").unwrap();

    context
        .kaishaku()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Active session: exp1"))
        .stdout(predicate::str::contains("  Original branch: main"))
        .stdout(predicate::str::contains("Initial commit"))
        .stdout(predicate::str::contains(" M notes.txt"))
        .stdout(predicate::str::contains("  confirm_exit: yes"));

    let output = context
        .kaishaku()
        .args(["status", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["active"]["name"], "exp1");
    assert_eq!(json["config"]["auto_save"], false);
}

#[test]
fn test_purge_skips_active_session() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "old1");
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();
    open(&context, "old2");
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();
    open(&context, "current");

    context
        .kaishaku()
        .args(["purge", "current"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot purge active session"));

    context
        .kaishaku()
        .arg("clean")
        .assert()
        .success()
        .stdout("2 session(s) cleaned.\n");

    assert!(context.store_dir().join("current").exists());
    assert!(!context.store_dir().join("old1").exists());
    assert!(!context.store_dir().join("old2").exists());
}

#[test]
fn test_recover_recreates_missing_original_branch() {
    let context = repo_with_file("notes.txt", "one\n");
    context.git(&["checkout", "-q", "-b", "topic"]).unwrap();
    open(&context, "exp1");
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();
    context.git(&["checkout", "-q", "main"]).unwrap();
    context.git(&["branch", "-D", "topic"]).unwrap();

    context
        .kaishaku()
        .args(["recover", "exp1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Original branch 'topic' not found"))
        .stdout(predicate::str::contains("Recovered session 'exp1'"));

    assert!(context.git_succeeds(&["rev-parse", "--verify", "--quiet", "refs/heads/topic"]));
    assert_eq!(context.active_session().as_deref(), Some("exp1"));
}

#[test]
fn test_dangling_pointer_is_reported_and_cleared_by_abort() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    std::fs::remove_dir_all(context.store_dir().join("exp1")).unwrap();

    context
        .kaishaku()
        .arg("status")
        .assert()
        .success()
        .stderr(predicate::str::contains("no longer exists"));

    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("kaishaku abort exp1"));

    context
        .kaishaku()
        .arg("abort")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared active session 'exp1'"));
    assert_eq!(context.active_session(), None);
}

#[test]
fn test_unknown_head_commit_is_reported_missing() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();

    // well-formed id, but no such object in the repository
    let unknown = "0123456789abcdef0123456789abcdef01234567";
    std::fs::write(
        context.store_dir().join("exp1").join("head"),
        format!("{unknown}\n"),
    )
    .unwrap();
    let time_before = context.record("exp1", "time");

    context
        .kaishaku()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Session HEAD: {unknown} (missing)"
        )))
        .stdout(predicate::str::contains("Original branch: main\n"));

    let output = context.kaishaku().args(["list", "--json"]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sessions"][0]["head_ref_exists"], false);
    assert_eq!(json["sessions"][0]["original_ref_exists"], true);

    context
        .kaishaku()
        .args(["resume", "exp1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no longer exists"));

    assert_eq!(context.active_session(), None);
    assert_eq!(context.record("exp1", "time"), time_before);
    assert_eq!(context.current_branch().unwrap(), "main");
}

#[test]
fn test_recover_refuses_corrupted_session() {
    let context = repo_with_file("notes.txt", "one\n");
    open(&context, "exp1");
    context
        .kaishaku()
        .args(["exit", "--force"])
        .assert()
        .success();
    std::fs::remove_file(context.store_dir().join("exp1").join("head")).unwrap();

    context
        .kaishaku()
        .args(["recover", "exp1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("kaishaku abort exp1"))
        .stderr(predicate::str::contains("kaishaku recover").not());

    context
        .kaishaku()
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Use 'abort' to discard it."));
}
