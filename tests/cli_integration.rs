#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create tempdir"),
        }
    }

    fn initialized() -> Self {
        let env = Self::new();
        env.run_ok(&["init"]);
        env
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("task").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full: Vec<&str> = args.to_vec();
        full.push("--json");
        let output = self.cmd().args(&full).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    fn new_task(&self, args: &[&str]) -> String {
        let mut full = vec!["new"];
        full.extend_from_slice(args);
        let v = self.run_ok(&full);
        v["data"]["task"]["id"].as_str().expect("task id").to_string()
    }

    fn task_file(&self) -> PathBuf {
        self.dir.path().join(".task").join("task.json")
    }

    fn write_store(&self, content: &str) {
        fs::write(self.task_file(), content).expect("write task file");
    }

    fn listed_ids(&self, args: &[&str]) -> Vec<String> {
        let mut full = vec!["list"];
        full.extend_from_slice(args);
        let v = self.run_ok(&full);
        v["data"]["tasks"]
            .as_array()
            .expect("tasks array")
            .iter()
            .map(|t| t["id"].as_str().unwrap().to_string())
            .collect()
    }
}

fn task_line(id: &str, title: &str, kind: &str, status: &str, updated: &str, labels: &str) -> String {
    format!(
        r#"{{"id":"{id}","created_at":"2024-01-01T00:00:00Z","updated_at":"{updated}","title":"{title}","description":null,"type":"{kind}","status":"{status}","labels":{labels},"notes":[]}}"#
    )
}

// ─── init ──────────────────────────────────────────────────────────

#[test]
fn init_creates_an_empty_store() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".task/task.json") || path.ends_with(".task\\task.json"));
    let content = fs::read(env.task_file()).unwrap();
    assert!(content.is_empty(), "store file should be zero bytes");
}

#[test]
fn init_twice_is_an_error() {
    let env = TestEnv::initialized();
    let v = env.run_err(&["init"]);
    assert_eq!(v["error"]["code"], "ALREADY_INITIALIZED");
}

#[test]
fn commands_require_init() {
    let env = TestEnv::new();
    let v = env.run_err(&["list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");

    env.cmd()
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task init"));
}

// ─── new ───────────────────────────────────────────────────────────

#[test]
fn new_task_has_defaults() {
    let env = TestEnv::initialized();
    let v = env.run_ok(&["new", "Write the docs"]);
    let task = &v["data"]["task"];

    let id = task["id"].as_str().unwrap();
    assert_eq!(id.len(), 3);
    assert!(id
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));

    assert_eq!(task["title"], "Write the docs");
    assert_eq!(task["type"], "task");
    assert_eq!(task["status"], "todo");
    assert!(task["description"].is_null());
    assert_eq!(task["labels"], serde_json::json!([]));
    assert_eq!(task["notes"], serde_json::json!([]));
    assert_eq!(task["created_at"], task["updated_at"]);
}

#[test]
fn new_task_with_flags() {
    let env = TestEnv::initialized();
    let v = env.run_ok(&[
        "new", "Fix crash", "-t", "bug", "-d", "stack trace attached", "-l", "urgent", "-l",
        "backend",
    ]);
    let task = &v["data"]["task"];
    assert_eq!(task["type"], "bug");
    assert_eq!(task["description"], "stack trace attached");
    assert_eq!(task["labels"], serde_json::json!(["urgent", "backend"]));
}

#[test]
fn new_task_ids_are_unique() {
    let env = TestEnv::initialized();
    let mut ids: Vec<String> = (0..10)
        .map(|i| {
            let title = format!("Task {i}");
            env.new_task(&[title.as_str()])
        })
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
}

#[test]
fn new_rejects_invalid_type_without_writing() {
    let env = TestEnv::initialized();
    let v = env.run_err(&["new", "Oops", "-t", "chore"]);
    assert_eq!(v["error"]["code"], "INVALID_ENUM");
    let content = fs::read(env.task_file()).unwrap();
    assert!(content.is_empty(), "invalid type must not create a task");
}

#[test]
fn new_rejects_empty_title() {
    let env = TestEnv::initialized();
    let v = env.run_err(&["new", "   "]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── show ──────────────────────────────────────────────────────────

#[test]
fn show_returns_the_full_record() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Inspect me", "-t", "feature", "-l", "one"]);
    let v = env.run_ok(&["show", &id]);
    let task = &v["data"]["task"];
    assert_eq!(task["id"], id.as_str());
    assert_eq!(task["title"], "Inspect me");
    assert_eq!(task["type"], "feature");
    assert_eq!(task["labels"], serde_json::json!(["one"]));
}

#[test]
fn show_unknown_id_is_an_error() {
    let env = TestEnv::initialized();
    let v = env.run_err(&["show", "zzz"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── list: sorting and filtering ───────────────────────────────────

#[test]
fn list_sorts_by_updated_at_descending() {
    let env = TestEnv::initialized();
    env.write_store(&format!(
        "{}\n{}\n{}\n",
        task_line("old", "Oldest", "task", "todo", "2024-01-01T00:00:00Z", "[]"),
        task_line("new", "Newest", "task", "todo", "2024-03-01T00:00:00Z", "[]"),
        task_line("mid", "Middle", "task", "todo", "2024-02-01T00:00:00Z", "[]"),
    ));
    assert_eq!(env.listed_ids(&[]), ["new", "mid", "old"]);
}

#[test]
fn list_filters_are_conjunctive() {
    let env = TestEnv::initialized();
    env.write_store(&format!(
        "{}\n{}\n{}\n",
        task_line("aaa", "One", "task", "todo", "2024-01-01T00:00:00Z", r#"["frontend"]"#),
        task_line("bbb", "Two", "bug", "progress", "2024-01-02T00:00:00Z", r#"["backend"]"#),
        task_line("ccc", "Three", "feature", "todo", "2024-01-03T00:00:00Z", r#"["frontend"]"#),
    ));

    let mut by_status = env.listed_ids(&["-s", "todo"]);
    by_status.sort();
    assert_eq!(by_status, ["aaa", "ccc"]);

    assert_eq!(env.listed_ids(&["-t", "bug"]), ["bbb"]);

    let mut by_label = env.listed_ids(&["-l", "frontend"]);
    by_label.sort();
    assert_eq!(by_label, ["aaa", "ccc"]);

    let mut combined = env.listed_ids(&["-s", "todo", "-l", "frontend"]);
    combined.sort();
    assert_eq!(combined, ["aaa", "ccc"]);

    assert!(env.listed_ids(&["-s", "todo", "-t", "bug"]).is_empty());
}

#[test]
fn list_rejects_invalid_filter_values() {
    let env = TestEnv::initialized();
    let v = env.run_err(&["list", "-s", "doing"]);
    assert_eq!(v["error"]["code"], "INVALID_ENUM");
    let v = env.run_err(&["list", "-t", "chore"]);
    assert_eq!(v["error"]["code"], "INVALID_ENUM");
}

// ─── update ────────────────────────────────────────────────────────

#[test]
fn update_applies_every_flag() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Before"]);
    let v = env.run_ok(&[
        "update", &id, "-n", "After", "-d", "now described", "-s", "progress", "-t", "feature",
        "-l", "x", "-l", "y",
    ]);
    let task = &v["data"]["task"];
    assert_eq!(task["title"], "After");
    assert_eq!(task["description"], "now described");
    assert_eq!(task["status"], "progress");
    assert_eq!(task["type"], "feature");
    assert_eq!(task["labels"], serde_json::json!(["x", "y"]));
}

#[test]
fn update_labels_replace_the_set() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Labeled", "-l", "old1", "-l", "old2"]);
    let v = env.run_ok(&["update", &id, "-l", "new"]);
    assert_eq!(v["data"]["task"]["labels"], serde_json::json!(["new"]));
}

#[test]
fn update_with_invalid_status_rejects_the_whole_operation() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Keep me intact"]);
    let v = env.run_err(&["update", &id, "-n", "Changed", "-s", "bogus"]);
    assert_eq!(v["error"]["code"], "INVALID_ENUM");

    // the valid flag must not have been applied
    let v = env.run_ok(&["show", &id]);
    assert_eq!(v["data"]["task"]["title"], "Keep me intact");
    assert_eq!(v["data"]["task"]["status"], "todo");
}

#[test]
fn update_unknown_id_is_an_error() {
    let env = TestEnv::initialized();
    let v = env.run_err(&["update", "zzz", "-n", "Nope"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

// ─── note ──────────────────────────────────────────────────────────

#[test]
fn note_from_argument() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Annotated"]);
    let v = env.run_ok(&["note", &id, "first note"]);
    let note_id = v["data"]["note_id"].as_str().unwrap();
    assert!(note_id.starts_with(&format!("{id}-")));
    assert_eq!(note_id.len(), id.len() + 4);

    let v = env.run_ok(&["show", &id]);
    let notes = v["data"]["task"]["notes"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["content"], "first note");
    assert_eq!(notes[0]["id"], note_id);
}

#[test]
fn note_from_stdin() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Piped"]);
    let output = env
        .cmd()
        .args(["note", &id, "--json"])
        .write_stdin("a note\nwith two lines\n")
        .output()
        .expect("run");
    let v: Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(v["success"], true, "{v}");

    let v = env.run_ok(&["show", &id]);
    assert_eq!(
        v["data"]["task"]["notes"][0]["content"],
        "a note\nwith two lines"
    );
}

#[test]
fn notes_append_in_order() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Multi"]);
    env.run_ok(&["note", &id, "one"]);
    env.run_ok(&["note", &id, "two"]);
    let v = env.run_ok(&["show", &id]);
    let notes = v["data"]["task"]["notes"].as_array().unwrap();
    assert_eq!(notes[0]["content"], "one");
    assert_eq!(notes[1]["content"], "two");
}

#[test]
fn note_requires_content() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Silent"]);
    let v = env.run_err(&["note", &id]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── delete and clean ──────────────────────────────────────────────

#[test]
fn delete_removes_the_task() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Doomed"]);
    env.run_ok(&["delete", &id]);
    let v = env.run_err(&["show", &id]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn delete_unknown_id_is_an_error() {
    let env = TestEnv::initialized();
    let v = env.run_err(&["delete", "zzz"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn clean_removes_exactly_the_closed_tasks() {
    let env = TestEnv::initialized();
    env.write_store(&format!(
        "{}\n{}\n{}\n{}\n{}\n",
        task_line("aaa", "A", "task", "todo", "2024-01-01T00:00:00Z", "[]"),
        task_line("bbb", "B", "task", "done", "2024-01-01T00:00:00Z", "[]"),
        task_line("ccc", "C", "task", "abandon", "2024-01-01T00:00:00Z", "[]"),
        task_line("ddd", "D", "task", "progress", "2024-01-01T00:00:00Z", "[]"),
        task_line("eee", "E", "task", "blocked", "2024-01-01T00:00:00Z", "[]"),
    ));

    let v = env.run_ok(&["clean"]);
    assert_eq!(v["data"]["deleted"], 2);
    for id in ["aaa", "ddd", "eee"] {
        env.run_ok(&["show", id]);
    }
    for id in ["bbb", "ccc"] {
        let v = env.run_err(&["show", id]);
        assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
    }

    // second pass finds nothing and changes nothing
    let v = env.run_ok(&["clean"]);
    assert_eq!(v["data"]["deleted"], 0);
    assert_eq!(env.listed_ids(&[]).len(), 3);
}

// ─── storage formats ───────────────────────────────────────────────

#[test]
fn legacy_array_format_loads() {
    let env = TestEnv::initialized();
    env.write_store(
        r#"[
  {
    "id": "abc",
    "created_at": "2024-01-01T00:00:00Z",
    "updated_at": "2024-01-02T00:00:00Z",
    "title": "Legacy Task",
    "description": "from the old format",
    "type": "task",
    "status": "todo",
    "labels": ["legacy"],
    "notes": null
  }
]"#,
    );

    let v = env.run_ok(&["show", "abc"]);
    let task = &v["data"]["task"];
    assert_eq!(task["title"], "Legacy Task");
    assert_eq!(task["labels"], serde_json::json!(["legacy"]));
    // null notes normalize to an empty array
    assert_eq!(task["notes"], serde_json::json!([]));
}

#[test]
fn first_save_migrates_legacy_array_to_jsonl() {
    let env = TestEnv::initialized();
    env.write_store(&format!(
        "[{},\n{}]",
        task_line("abc", "One", "task", "todo", "2024-01-01T00:00:00Z", "[]"),
        task_line("def", "Two", "bug", "progress", "2024-01-02T00:00:00Z", "[]"),
    ));

    // a read-only command leaves the file alone
    env.run_ok(&["list"]);
    assert!(fs::read_to_string(env.task_file())
        .unwrap()
        .trim_start()
        .starts_with('['));

    // any mutating command rewrites it as one JSON object per line
    env.run_ok(&["complete", "abc"]);
    let raw = fs::read_to_string(env.task_file()).unwrap();
    assert!(!raw.trim_start().starts_with('['));
    let lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        let parsed: Value = serde_json::from_str(line).expect("each line is valid JSON");
        assert!(parsed.is_object());
    }

    let mut ids = env.listed_ids(&[]);
    ids.sort();
    assert_eq!(ids, ["abc", "def"]);
}

#[test]
fn corrupt_store_is_a_parse_failure() {
    let env = TestEnv::initialized();
    env.write_store("this is not json\n");
    let v = env.run_err(&["list"]);
    assert_eq!(v["error"]["code"], "PARSE_FAILURE");
}

// ─── aliases ───────────────────────────────────────────────────────

#[test]
fn ready_lists_only_todo_tasks() {
    let env = TestEnv::initialized();
    let todo = env.new_task(&["Open item"]);
    let done = env.new_task(&["Finished item"]);
    env.run_ok(&["complete", &done]);

    let v = env.run_ok(&["ready"]);
    let ids: Vec<&str> = v["data"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, [todo.as_str()]);
}

#[test]
fn status_aliases_set_the_status() {
    let env = TestEnv::initialized();
    for (alias, status) in [
        ("take", "progress"),
        ("complete", "done"),
        ("block", "blocked"),
        ("abandon", "abandon"),
    ] {
        let title = format!("Target of {alias}");
        let id = env.new_task(&[title.as_str()]);
        let v = env.run_ok(&[alias, &id]);
        assert_eq!(v["data"]["task"]["status"], status);

        let v = env.run_ok(&["show", &id]);
        assert_eq!(v["data"]["task"]["status"], status);
    }
}

// ─── edit ──────────────────────────────────────────────────────────

#[test]
fn edit_applies_the_saved_frontmatter() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Editable", "-d", "old body", "-l", "keep"]);

    let edited = "\
---
title: Edited title
type: bug
status: progress
labels: [keep, added, keep]
---
new body line one
new body line two
";
    let fixture = env.dir.path().join("edited.md");
    fs::write(&fixture, edited).unwrap();

    let output = env
        .cmd()
        .args(["edit", &id, "--json"])
        .env("EDITOR", format!("cp {}", fixture.display()))
        .output()
        .expect("run");
    let v: Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(v["success"], true, "{v}");

    let task = &v["data"]["task"];
    assert_eq!(task["title"], "Edited title");
    assert_eq!(task["type"], "bug");
    assert_eq!(task["status"], "progress");
    // labels are normalized: duplicates dropped, order kept
    assert_eq!(task["labels"], serde_json::json!(["keep", "added"]));
    assert_eq!(task["description"], "new body line one\nnew body line two");
}

#[test]
fn edit_with_blank_body_clears_the_description() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Editable", "-d", "something"]);

    let fixture = env.dir.path().join("edited.md");
    fs::write(&fixture, "---\ntitle: Editable\n---\n\n").unwrap();

    let output = env
        .cmd()
        .args(["edit", &id, "--json"])
        .env("EDITOR", format!("cp {}", fixture.display()))
        .output()
        .expect("run");
    let v: Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(v["success"], true, "{v}");
    assert!(v["data"]["task"]["description"].is_null());
}

#[test]
fn edit_rejects_invalid_frontmatter_status() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Editable"]);

    let fixture = env.dir.path().join("edited.md");
    fs::write(&fixture, "---\nstatus: doing\n---\n").unwrap();

    let output = env
        .cmd()
        .args(["edit", &id, "--json"])
        .env("EDITOR", format!("cp {}", fixture.display()))
        .output()
        .expect("run");
    let v: Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(v["success"], false, "{v}");
    assert_eq!(v["error"]["code"], "INVALID_ENUM");

    // the task is untouched
    let v = env.run_ok(&["show", &id]);
    assert_eq!(v["data"]["task"]["status"], "todo");
}

#[test]
fn edit_requires_an_editor() {
    let env = TestEnv::initialized();
    let id = env.new_task(&["Editable"]);
    let output = env
        .cmd()
        .args(["edit", &id, "--json"])
        .env_remove("EDITOR")
        .env_remove("VISUAL")
        .output()
        .expect("run");
    let v: Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

// ─── text output and exit codes ────────────────────────────────────

#[test]
fn text_mode_messages() {
    let env = TestEnv::new();
    env.cmd()
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized task tracking"));

    env.cmd()
        .args(["new", "Readable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task"));

    env.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Readable"));

    env.cmd()
        .args(["clean"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No closed tasks to delete"));
}

#[test]
fn errors_exit_nonzero_in_text_mode() {
    let env = TestEnv::initialized();
    env.cmd()
        .args(["show", "zzz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found: zzz"));
}

#[test]
fn version_flag_prints_a_version() {
    let env = TestEnv::new();
    env.cmd()
        .args(["--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("task"));
}
