use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn pagewright(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pagewright"));
    cmd.env_remove("PAGEWRIGHT_ROOT")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

fn init_instance(tmp: &TempDir) -> PathBuf {
    let root = tmp.path().join("site");
    pagewright(&root).arg("init").assert().success();
    root
}

#[test]
fn init_scaffolds_instance_and_refuses_existing_root() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);

    assert!(root.join("_templates/index_template.html").is_file());
    assert!(root.join("index.html").is_file());
    assert!(root.join("static/index.html").is_file());
    let map = fs::read_to_string(root.join("_uri_template_map.json")).unwrap();
    assert!(map.contains("\"/\": \"index_template.html\""));

    pagewright(&root)
        .arg("init")
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn root_can_come_from_environment() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);

    Command::new(assert_cmd::cargo::cargo_bin!("pagewright"))
        .env("PAGEWRIGHT_ROOT", &root)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("index_template.html"));
}

#[test]
fn page_create_list_and_remove() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);

    pagewright(&root)
        .args(["page", "create", "/blog/", "index_template.html"])
        .assert()
        .success()
        .stdout(contains("Created '/blog'"));
    pagewright(&root)
        .args(["page", "create", "/blog/2013", "index_template.html"])
        .assert()
        .success();
    assert!(root.join("blog/2013/index.html").is_file());

    pagewright(&root)
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("/blog/2013").and(contains("stable")));

    pagewright(&root)
        .args(["page", "remove", "/blog"])
        .assert()
        .success()
        .stdout(contains("also unregistered /blog/2013"));
    assert!(!root.join("blog").exists());

    let output = pagewright(&root).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let pages: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        pages,
        serde_json::json!([{ "uri": "/", "template": "index_template.html", "pending": false }])
    );
}

#[test]
fn page_create_rejects_bad_input() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);

    pagewright(&root)
        .args(["page", "create", "blog", "index_template.html"])
        .assert()
        .failure()
        .stderr(contains("must start with a slash"));
    pagewright(&root)
        .args(["page", "create", "/static/x", "index_template.html"])
        .assert()
        .failure();
    pagewright(&root)
        .args(["page", "create", "/about", "missing.html"])
        .assert()
        .failure()
        .stderr(contains("template 'missing.html' not found"));
    pagewright(&root)
        .args(["page", "create", "/", "index_template.html"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
}

#[test]
fn edit_marks_template_pending_once() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);

    pagewright(&root)
        .args(["pending"])
        .assert()
        .success()
        .stdout(contains("No pending template edits."));

    pagewright(&root)
        .args(["edit", "index_template.html"])
        .assert()
        .success();
    assert!(root.join("_templates/index_template.html.old").is_file());

    pagewright(&root)
        .args(["pending"])
        .assert()
        .success()
        .stdout(contains("index_template.html (1 pages)"));
    pagewright(&root)
        .args(["list", "--json"])
        .assert()
        .stdout(contains("\"pending\": true"));

    pagewright(&root)
        .args(["edit", "index_template.html"])
        .assert()
        .failure()
        .stderr(contains("already has a pending edit"));
}

#[test]
fn extract_prints_placeholder_values() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);

    let output = pagewright(&root).args(["extract", "/"]).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let values: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(values["TITLE"], "pagewright Instance Index");
    assert!(values["CONTENT"]
        .as_str()
        .unwrap()
        .starts_with("<h1>pagewright Instance Index</h1>"));
}

#[test]
fn extract_reports_misaligned_page() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);
    fs::write(root.join("index.html"), "<p>hand written</p>\n").unwrap();

    pagewright(&root)
        .args(["extract", "/"])
        .assert()
        .failure()
        .stderr(contains("does not match template"));
}

#[test]
fn missing_root_is_a_clear_error() {
    let tmp = TempDir::new().unwrap();
    pagewright(&tmp.path().join("nowhere"))
        .arg("list")
        .assert()
        .failure()
        .stderr(contains("no pagewright instance"));
}

#[test]
fn templates_lists_status_and_page_counts() {
    let tmp = TempDir::new().unwrap();
    let root = init_instance(&tmp);
    fs::write(root.join("_templates/post.html"), "<article>\nBODY\n</article>\n").unwrap();
    pagewright(&root)
        .args(["page", "create", "/about", "index_template.html"])
        .assert()
        .success();
    pagewright(&root)
        .args(["edit", "post.html"])
        .assert()
        .success();

    let output = pagewright(&root).arg("templates").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let index_row = stdout
        .lines()
        .find(|l| l.contains("index_template.html"))
        .expect("index row");
    assert!(index_row.contains("stable") && index_row.contains(" 2 "), "{index_row}");
    let post_row = stdout.lines().find(|l| l.contains("post.html")).expect("post row");
    assert!(post_row.contains("PENDING") && post_row.contains(" 0 "), "{post_row}");
    assert!(!stdout.contains(".old"), "backups are not templates: {stdout}");
}
