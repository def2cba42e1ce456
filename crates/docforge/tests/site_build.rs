//! End-to-end build over a real directory tree.

use docforge::SiteBuilder;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn full_site_build() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write(
        input.path(),
        "home.txt",
        "# Welcome\n\nSee the [guide](/nested/guide) or jump to [setup](/nested/guide#setup).\n",
    );
    write(
        input.path(),
        "nested/guide.txt",
        "# The Guide\n\n## Setup\n\n![logo](../img/logo.png)\n\nBack to [home](../home).\n",
    );
    write(input.path(), "img/logo.png", "png bytes");
    write(input.path(), "old.txt", "# Old Page\n\nNobody links here.\n");

    let builder = SiteBuilder::new(input.path(), output.path()).unwrap();
    let report = builder.build().unwrap();

    assert_eq!(report.documents, 3);
    assert_eq!(report.files, 1);
    assert!(report.file_errors.is_empty());

    // Rendered pages mirror the source layout
    let home = std::fs::read_to_string(output.path().join("home.html")).unwrap();
    assert!(home.contains("<title>Welcome</title>"));
    assert!(home.contains("href=\"nested/guide.html\""));
    assert!(home.contains("href=\"nested/guide.html#setup\""));

    let guide = std::fs::read_to_string(output.path().join("nested/guide.html")).unwrap();
    assert!(guide.contains("<h2 id=\"setup\">"));
    assert!(guide.contains("src=\"../img/logo.png\""));
    assert!(guide.contains("href=\"../home.html\""));

    // Raw files and sources copied verbatim
    assert!(output.path().join("img/logo.png").is_file());
    assert!(output.path().join("home.txt").is_file());

    // The stray page is an orphan, nothing else is
    assert_eq!(
        report.orphans.documents.iter().collect::<Vec<_>>(),
        vec!["/old"]
    );
    assert!(report.orphans.files.is_empty());
}

#[test]
fn broken_links_are_reported_but_still_render() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write(
        input.path(),
        "home.txt",
        "# Home\n\n[gone](/missing) and ![lost](/img/lost.png)\n",
    );

    let builder = SiteBuilder::new(input.path(), output.path()).unwrap();
    let report = builder.build().unwrap();

    // Diagnostics are findings, not a failed run
    assert!(!report.failed());
    let errors = report.file_errors.get("/home").unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.line == 3));

    let home = std::fs::read_to_string(output.path().join("home.html")).unwrap();
    assert!(home.contains("class=\"broken\""));
}

#[test]
fn report_serializes_to_json() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write(input.path(), "home.txt", "# Home\n");
    write(input.path(), "old.txt", "stray\n");

    let builder = SiteBuilder::new(input.path(), output.path()).unwrap();
    let report = builder.build().unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["documents"], 2);
    assert_eq!(value["orphans"]["documents"][0], "/old");
}

#[test]
fn configured_root_and_ignore_pattern() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    write(
        input.path(),
        "site.yaml",
        "root: /index\nignore_orphans: \"^/drafts/\"\n",
    );
    write(input.path(), "index.txt", "# Index\n\n[a](/a)\n");
    write(input.path(), "a.txt", "# A\n");
    write(input.path(), "drafts/wip.txt", "unfinished\n");

    let builder = SiteBuilder::new(input.path(), output.path()).unwrap();
    let report = builder.build().unwrap();

    assert!(report.orphans.is_empty());
    assert!(!report.failed());
}
