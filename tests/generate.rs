//! End-to-end generation over a temporary site

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use statusblog::error::BuildError;
use statusblog::Blog;
use tempfile::TempDir;
use walkdir::WalkDir;

const CONFIG: &str = r#"
title: Status Code 417
author:
  name: JFE
  summary: "Hello! Dis my blog:"
description: A starter blog
site_url: https://www.statuscode417.com/
social:
  github: john-law
about:
  - Engineer.
  - Based in Lisbon.
"#;

fn site(posts: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("_config.yml"), CONFIG).unwrap();
    for (rel, raw) in posts {
        let path = dir.path().join("content/blog").join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, raw).unwrap();
    }
    dir
}

fn post(title: &str, date: &str) -> String {
    format!(
        "---\ntitle: {}\ndate: {}\n---\n\nSome words about {}.\n",
        title, date, title
    )
}

fn read(dir: &Path, rel: &str) -> String {
    fs::read_to_string(dir.join("public").join(rel)).unwrap()
}

/// Every file under `public/` with its bytes
fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let public = dir.join("public");
    WalkDir::new(&public)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(&public).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn writes_index_about_and_posts() {
    let dir = site(&[
        ("hello-world/index.md", &post("Hello World", "2024-01-01")),
        ("second.md", &post("Second", "2024-02-01")),
    ]);
    let blog = Blog::new(dir.path()).unwrap();
    let report = blog.generate(false).unwrap();
    assert_eq!(report.pages, 4);

    let public = dir.path().join("public");
    assert!(public.join("index.html").is_file());
    assert!(public.join("about/index.html").is_file());
    assert!(public.join("hello-world/index.html").is_file());
    assert!(public.join("second/index.html").is_file());

    let about = read(dir.path(), "about/index.html");
    assert!(about.contains(r#"<li class="about-item">Based in Lisbon.</li>"#));

    let hello = read(dir.path(), "hello-world/index.html");
    assert!(hello.contains("<h1>Hello World</h1>"));
    assert!(hello.contains("January 01, 2024"));
    assert!(hello.contains("<title>Hello World | Status Code 417</title>"));
    assert!(hello.contains("Back to posts"));
}

#[test]
fn index_lists_newest_first() {
    let dir = site(&[
        ("a.md", &post("Post A", "2024-01-01")),
        ("b.md", &post("Post B", "2024-03-01")),
        ("c.md", &post("Post C", "2024-02-01")),
    ]);
    Blog::new(dir.path()).unwrap().generate(false).unwrap();

    let index = read(dir.path(), "index.html");
    let b = index.find(r#"<a href="/b/">Post B</a>"#).unwrap();
    let c = index.find(r#"<a href="/c/">Post C</a>"#).unwrap();
    let a = index.find(r#"<a href="/a/">Post A</a>"#).unwrap();
    assert!(b < c && c < a);
}

#[test]
fn bio_links_to_github_handle() {
    let dir = site(&[("a.md", &post("A", "2024-01-01"))]);
    Blog::new(dir.path()).unwrap().generate(false).unwrap();

    for page in ["index.html", "about/index.html", "a/index.html"] {
        let html = read(dir.path(), page);
        assert!(html.contains(r#"href="https://github.com/john-law""#));
        assert!(html.contains(r#"href="/about""#));
        assert!(html.contains(r#"<p class="summary">Hello! Dis my blog:</p>"#));
    }
}

#[test]
fn regeneration_is_byte_identical() {
    let dir = site(&[
        ("a.md", &post("A", "2024-01-01")),
        (
            "trip/index.md",
            "---\ndate: 2023-06-01\n---\n![Beach](beach.png)\n\n```rust\nfn main() {}\n```\n",
        ),
    ]);
    fs::write(dir.path().join("content/blog/trip/beach.png"), b"png").unwrap();
    let blog = Blog::new(dir.path()).unwrap();

    blog.generate(false).unwrap();
    let first = snapshot(dir.path());
    blog.clean().unwrap();
    blog.generate(false).unwrap();
    let second = snapshot(dir.path());

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn slug_collision_fails_and_names_both_files() {
    let dir = site(&[
        ("hello.md", &post("One", "2024-01-01")),
        ("hello/index.md", &post("Two", "2024-01-02")),
    ]);
    let err = Blog::new(dir.path()).unwrap().generate(false).unwrap_err();

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::SlugCollision { slug, .. }) => assert_eq!(slug, "hello"),
        other => panic!("unexpected error: {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains("hello.md"));
    assert!(message.contains("index.md"));
    assert!(!dir.path().join("public").exists());
}

#[test]
fn reserved_slug_fails() {
    let dir = site(&[("about.md", &post("About me", "2024-01-01"))]);
    let err = Blog::new(dir.path()).unwrap().generate(false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::ReservedSlug { .. })
    ));
}

#[test]
fn strict_mode_turns_skips_into_failure() {
    let dir = site(&[
        ("good.md", &post("Good", "2024-01-01")),
        ("bad.md", &post("Bad", "not a date")),
    ]);
    let blog = Blog::new(dir.path()).unwrap();

    assert!(blog.generate(true).is_err());
    assert!(!dir.path().join("public").exists());

    let report = blog.generate(false).unwrap();
    assert_eq!(report.pages, 3);
    assert!(!dir.path().join("public/bad").exists());
}

#[test]
fn missing_description_uses_excerpt() {
    let dir = site(&[(
        "plain.md",
        "---\ndate: 2024-01-01\n---\n# Heading\n\nHello world, this is the body.\n",
    )]);
    Blog::new(dir.path()).unwrap().generate(false).unwrap();

    let html = read(dir.path(), "plain/index.html");
    assert!(html.contains("<title>plain | Status Code 417</title>"));
    assert!(html.contains(r#"<meta name="description" content="Heading Hello world, this is the body.">"#));
}

#[test]
fn regenerate_unpublishes_excluded_and_renamed_posts() {
    let dir = site(&[
        ("good.md", &post("Good", "2024-01-01")),
        ("later.md", &post("Later", "2024-02-01")),
        ("old-name.md", &post("Renamed", "2024-03-01")),
    ]);
    let blog = Blog::new(dir.path()).unwrap();
    blog.generate(false).unwrap();
    let public = dir.path().join("public");
    assert!(public.join("later/index.html").is_file());
    assert!(public.join("old-name/index.html").is_file());

    let content = dir.path().join("content/blog");
    fs::write(content.join("later.md"), post("Later", "someday")).unwrap();
    fs::rename(content.join("old-name.md"), content.join("new-name.md")).unwrap();
    blog.generate(false).unwrap();

    assert!(!public.join("later").exists());
    assert!(!public.join("old-name").exists());
    assert!(public.join("new-name/index.html").is_file());

    let files: Vec<PathBuf> = snapshot(dir.path()).into_keys().collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("about/index.html"),
            PathBuf::from("good/index.html"),
            PathBuf::from("index.html"),
            PathBuf::from("new-name/index.html"),
        ]
    );
}
