//! End-to-end build through the library API.
//!
//! Writes a small content tree to a temp dir, then runs the same steps as
//! `quire build`: load config, scan, generate.

use quire::config::{load_config, load_redirects};
use quire::generate::{GenerateOptions, GenerateReport, generate};
use quire::scan::{ScanResult, scan};
use quire::types::PageKind;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
title = "Field Notes"
base_url = "https://notes.example/"
twitter = "fieldnotes"
"#;

const POST: &str = "---
title: Hello
tags: [intro]
date: 2024-03-01
---
Opening paragraph.

## First Steps {#first-steps}

### Details {#details}

## Wrapping Up {#wrapping-up}
";

fn write(root: &Path, path: &str, content: &str) {
    let target = root.join(path);
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    fs::write(target, content).unwrap();
}

fn site(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let content = tmp.path().join("content");
    write(&content, "config.toml", CONFIG);
    for (path, body) in files {
        write(&content, path, body);
    }
    tmp
}

fn build(tmp: &TempDir) -> (ScanResult, GenerateReport) {
    let source = tmp.path().join("content");
    let output = tmp.path().join("out");
    let config = load_config(&source).unwrap();
    let redirects = load_redirects(&source).unwrap();
    let result = scan(&source, &output, &config).unwrap();
    let report = generate(
        &result,
        &config,
        &redirects,
        &GenerateOptions { source, output },
    )
    .unwrap();
    (result, report)
}

fn read(tmp: &TempDir, path: &str) -> String {
    fs::read_to_string(tmp.path().join("out").join(path)).unwrap()
}

#[test]
fn blog_post_in_category() {
    let tmp = site(&[("1_blog/_notes/post.md", POST)]);
    let (result, _) = build(&tmp);

    assert!(tmp.path().join("out/blog/notes/post.html").is_file());

    let blog = &result.site.sections[0];
    assert_eq!(blog.title, "Blog");
    assert_eq!(blog.index, 1);

    let notes = &result.site.categories[0];
    assert_eq!(notes.title, "Notes");
    assert_eq!(notes.parent, "");
    assert_eq!(notes.section, "blog");

    let html = read(&tmp, "blog/notes/post.html");
    assert!(html.contains(r#"<nav class="toc"><h2>Contents</h2><ul>"#));
    assert!(html.contains(r##"<a href="#details">Details</a>"##));
    assert!(html.contains(r#"<link rel="canonical" href="https://notes.example/blog/notes/post">"#));

    let sitemap = read(&tmp, "sitemap.xml");
    assert!(sitemap.contains(concat!(
        "    <loc>https://notes.example/blog/notes/post</loc>\n",
        "    <lastmod>2024-03-01</lastmod>\n",
        "    <changefreq>monthly</changefreq>\n",
        "    <priority>0.5</priority>\n",
    )));
}

#[test]
fn synthetic_index_pages_written_and_listed() {
    let tmp = site(&[
        ("1_blog/_notes/post.md", POST),
        ("2_work/_clients/_acme/case-study.md", "---\ntitle: Case Study\n---\nBody"),
    ]);
    let (result, report) = build(&tmp);

    assert_eq!(report.content_pages, 2);
    assert_eq!(report.section_pages, 2);
    assert_eq!(report.category_pages, 3);

    let section = read(&tmp, "work/index.html");
    assert!(section.contains("https://notes.example/work/clients/index.html"));
    assert!(section.contains("https://notes.example/work/clients/acme/case-study.html"));

    let category = read(&tmp, "work/clients/acme/index.html");
    assert!(category.contains("Case Study"));

    let sitemap = read(&tmp, "sitemap.xml");
    assert!(sitemap.contains(concat!(
        "    <loc>https://notes.example/work/index</loc>\n",
        "    <changefreq>weekly</changefreq>\n",
        "    <priority>1.0</priority>\n",
    )));
    assert!(sitemap.contains(concat!(
        "    <loc>https://notes.example/work/clients/acme/index</loc>\n",
        "    <changefreq>weekly</changefreq>\n",
        "    <priority>0.8</priority>\n",
    )));

    let kinds: Vec<PageKind> = result.site.pages.iter().map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![
            PageKind::Content,
            PageKind::Content,
            PageKind::SectionIndex,
            PageKind::SectionIndex,
            PageKind::CategoryIndex,
            PageKind::CategoryIndex,
            PageKind::CategoryIndex,
        ]
    );
}

#[test]
fn menu_on_every_page_in_section_order() {
    let tmp = site(&[
        ("10_archive/_old/a.md", "a"),
        ("2_work/_clients/b.md", "b"),
        ("index.md", "---\ntitle: Home\n---\nWelcome"),
    ]);
    build(&tmp);

    let home = read(&tmp, "index.html");
    let work = home.find(">Work<").unwrap();
    let archive = home.find(">Archive<").unwrap();
    assert!(work < archive);
    assert!(read(&tmp, "archive/old/a.html").contains(r#"<ul class="menu">"#));
}

#[test]
fn root_index_canonical_is_base_url() {
    let tmp = site(&[("index.md", "Welcome")]);
    build(&tmp);
    let home = read(&tmp, "index.html");
    assert!(home.contains(r#"<link rel="canonical" href="https://notes.example">"#));
    assert!(read(&tmp, "sitemap.xml").contains("<loc>https://notes.example</loc>"));
}

#[test]
fn redirects_and_static_files() {
    let tmp = site(&[
        ("1_blog/_notes/post.md", POST),
        ("1_blog/_notes/figure.svg", "<svg/>"),
        (
            "redirects.toml",
            "[[redirect]]\nfrom = \"/2019/hello\"\nto = \"https://notes.example/blog/notes/post\"\n",
        ),
    ]);
    let (_, report) = build(&tmp);

    assert_eq!(read(&tmp, "blog/notes/figure.svg"), "<svg/>");
    assert_eq!(report.redirects.len(), 1);
    let redirect = read(&tmp, "2019/hello/index.html");
    assert!(redirect.contains("url=https://notes.example/blog/notes/post"));
    assert!(!tmp.path().join("out/redirects.toml").exists());
    assert!(!tmp.path().join("out/config.toml").exists());
}

#[test]
fn rebuild_is_identical() {
    let tmp = site(&[
        ("1_blog/_notes/post.md", POST),
        ("1_blog/_notes/second.md", "---\ntitle: Second\n---\n"),
        ("2_work/_clients/_acme/case.md", "x"),
    ]);
    build(&tmp);
    let first = read(&tmp, "blog/index.html");
    let first_menu = read(&tmp, "work/clients/acme/case.html");
    build(&tmp);
    assert_eq!(first, read(&tmp, "blog/index.html"));
    assert_eq!(first_menu, read(&tmp, "work/clients/acme/case.html"));
}

#[test]
fn missing_config_fails_before_writing() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("content"), "index.md", "hi");
    assert!(load_config(&tmp.path().join("content")).is_err());
    assert!(!tmp.path().join("out").exists());
}

#[test]
fn rebuild_with_output_inside_source_written_differently() {
    let tmp = site(&[("index.md", "home"), ("logo.png", "png")]);
    fs::create_dir_all(tmp.path().join("x")).unwrap();
    let source = tmp.path().join("content");
    let output = tmp.path().join("x/../content/out");
    let config = load_config(&source).unwrap();

    for _ in 0..2 {
        let result = scan(&source, &output, &config).unwrap();
        assert_eq!(result.static_files.len(), 1);
        generate(
            &result,
            &config,
            &Default::default(),
            &GenerateOptions {
                source: source.clone(),
                output: output.clone(),
            },
        )
        .unwrap();
    }
    assert_eq!(
        fs::read_to_string(source.join("out/logo.png")).unwrap(),
        "png"
    );
    assert!(!source.join("out/out").exists());
}

#[test]
fn hand_written_html_beside_markdown_fails_scan() {
    let tmp = site(&[("about.md", "rendered"), ("about.html", "hand written")]);
    let source = tmp.path().join("content");
    let config = load_config(&source).unwrap();
    let err = scan(&source, &tmp.path().join("out"), &config).unwrap_err();
    assert!(err.to_string().contains("about.html"));
}
