use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;

struct Library {
    _dir: TempDir,
    data_dir: PathBuf,
    remote: PathBuf,
}

impl Library {
    /// A data dir whose config points at a local `books.json`.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("library");
        let remote = dir.path().join("remote");
        fs::create_dir_all(&remote).unwrap();

        let pdf = remote.join("sicp.pdf");
        fs::write(&pdf, "%PDF-1.4").unwrap();
        let records = json!([
            {
                "title": "Structure and Interpretation of Computer Programs",
                "authors": "Harold Abelson, Gerald Jay Sussman",
                "tags": "lisp, classics",
                "image_url": "https://books.example.com/covers/sicp.jpg",
                "pdf_url": Url::from_file_path(&pdf).unwrap().as_str()
            },
            {
                "title": "Pro Git",
                "authors": "Scott Chacon",
                "tags": "git",
                "image_url": "https://books.example.com/covers/progit.jpg",
                "pdf_url": "https://books.example.com/pdf/progit.pdf"
            },
            {
                "title": "Broken",
                "authors": "Nobody",
                "tags": "git",
                "image_url": "not a url",
                "pdf_url": "https://books.example.com/pdf/broken.pdf"
            }
        ]);
        fs::write(remote.join("books.json"), records.to_string()).unwrap();

        let library = Self {
            _dir: dir,
            data_dir,
            remote,
        };
        let url = library.remote_url();
        library
            .hb()
            .args(["config", "remote-url", url.as_str()])
            .assert()
            .success()
            .stdout(predicate::str::contains("remote-url set to"));
        library
    }

    fn remote_url(&self) -> String {
        Url::from_file_path(self.remote.join("books.json"))
            .unwrap()
            .to_string()
    }

    fn hb(&self) -> Command {
        let mut cmd = Command::cargo_bin("hb").unwrap();
        cmd.env("HB_DATA_DIR", &self.data_dir)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}

fn stored_records(path: &Path) -> Vec<serde_json::Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn list_downloads_and_prints_sections() {
    let lib = Library::new();

    lib.hb()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("classics (1)"))
        .stdout(predicate::str::contains("git (1)"))
        .stdout(predicate::str::contains("1.1."))
        .stdout(predicate::str::contains("Pro Git"))
        .stdout(predicate::str::contains("My Favorites").not())
        .stdout(predicate::str::contains("Skipped"));

    assert!(lib.path("books.json").exists());
    assert!(lib.path("state.json").exists());
    assert!(lib.path("Images").is_dir());
    assert!(lib.path("Pdf").is_dir());
}

#[test]
fn no_subcommand_lists() {
    let lib = Library::new();
    lib.hb()
        .assert()
        .success()
        .stdout(predicate::str::contains("Pro Git"));
}

#[test]
fn fav_then_list_shows_favorites_first() {
    let lib = Library::new();

    lib.hb()
        .args(["fav", "pro", "git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to favorites"));

    let output = lib.hb().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let favorites = stdout.find("My Favorites (1)").unwrap();
    let classics = stdout.find("classics (1)").unwrap();
    assert!(favorites < classics);
    assert!(stdout.contains("f1."));

    let records = stored_records(&lib.path("books.json"));
    let pro_git = records
        .iter()
        .find(|r| r["title"] == "Pro Git")
        .unwrap();
    assert_eq!(pro_git["favorite"], json!(true));
}

#[test]
fn unfav_by_favorite_index() {
    let lib = Library::new();
    lib.hb().args(["fav", "3.1"]).assert().success();

    lib.hb()
        .args(["unfav", "f1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed from favorites"));

    lib.hb()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("My Favorites").not());
}

#[test]
fn later_runs_use_the_local_copy() {
    let lib = Library::new();
    lib.hb().arg("list").assert().success();
    fs::remove_file(lib.remote.join("books.json")).unwrap();

    lib.hb()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pro Git"));
}

#[test]
fn unreachable_sources_fail() {
    let lib = Library::new();
    fs::remove_file(lib.remote.join("books.json")).unwrap();

    lib.hb()
        .arg("list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: Unable to get book data"));
}

#[test]
fn section_by_tag_name() {
    let lib = Library::new();
    lib.hb()
        .args(["section", "Lisp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lisp (1)"))
        .stdout(predicate::str::contains("Structure and Interpretation"))
        .stdout(predicate::str::contains("Pro Git").not());
}

#[test]
fn view_without_selector_shows_the_default_book() {
    let lib = Library::new();
    lib.hb()
        .arg("view")
        .assert()
        .success()
        .stdout(predicate::str::contains("Structure and Interpretation"))
        .stdout(predicate::str::contains("Harold Abelson, Gerald Jay Sussman"));
}

#[test]
fn view_unknown_book_fails() {
    let lib = Library::new();
    lib.hb()
        .args(["view", "cobol"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Book not found"));
}

#[test]
fn cache_reports_local_documents() {
    let lib = Library::new();
    lib.hb()
        .args(["cache", "--pdf", "1.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already local"));
}

#[test]
fn status_and_dump() {
    let lib = Library::new();
    lib.hb()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Books:"))
        .stdout(predicate::str::contains(lib.remote_url()));

    lib.hb()
        .arg("dump")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "0 - Section 'My Favorites' (contains 0 books):",
        ))
        .stdout(predicate::str::contains("'Pro Git' by Scott Chacon. (git)"));
}

#[test]
fn refresh_discards_local_favorites() {
    let lib = Library::new();
    lib.hb().args(["fav", "pro", "git"]).assert().success();

    lib.hb()
        .arg("refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded 3 records"));

    lib.hb()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("My Favorites").not());
}

#[test]
fn config_and_init() {
    let lib = Library::new();

    lib.hb()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("images-dir = Images"));

    lib.hb()
        .args(["config", "pdf-dir", "../escape"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plain folder name"));

    lib.hb()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized hackerbooks library"));
    assert!(lib.path("Pdf").is_dir());
}
