use site::{ConfigCatalog, DiskSource, LoadError, SiteSource};
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn disk_source_walks_recursively_and_filters_by_suffix() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "index.html", "<p>home</p>");
    write(&dir, "posts/a.html", "<p>a</p>");
    write(&dir, "posts/deep/b.html", "<p>b</p>");
    write(&dir, "posts/notes.txt", "skip me");
    write(&dir, "style.css", "p {}");

    let source = DiskSource::new(dir.path(), ".html");
    let pages = source.load().unwrap();

    let root = dir.path().to_string_lossy().replace('\\', "/");
    let keys: Vec<String> = pages.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            format!("{root}/index.html"),
            format!("{root}/posts/a.html"),
            format!("{root}/posts/deep/b.html"),
        ]
    );
    assert_eq!(pages[&format!("{root}/posts/deep/b.html")], "<p>b</p>");
    assert!(source.describe().ends_with("(*.html)"));
}

#[test]
fn disk_source_reports_missing_root() {
    let dir = TempDir::new().expect("temp dir");
    let missing = dir.path().join("nope");
    let err = DiskSource::new(&missing, ".html").load().unwrap_err();
    match err {
        LoadError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn disk_source_follows_symlinked_directories() {
    let dir = TempDir::new().expect("temp dir");
    let shared = TempDir::new().expect("temp dir");
    write(&shared, "shared.html", "<p>shared</p>");
    std::os::unix::fs::symlink(shared.path(), dir.path().join("linked")).unwrap();

    let pages = DiskSource::new(dir.path(), ".html").load().unwrap();
    let root = dir.path().to_string_lossy().replace('\\', "/");
    assert_eq!(pages[&format!("{root}/linked/shared.html")], "<p>shared</p>");
}

#[test]
fn manifest_round_trips_through_disk() {
    let dir = TempDir::new().expect("temp dir");
    write(
        &dir,
        "paywall.csv",
        "name, path, id, price, currency, cutoffClassname\nPost, /posts/a.html, a1, 2.5, USD, CUT\n",
    );
    let catalog = ConfigCatalog::from_file(&dir.path().join("paywall.csv")).unwrap();
    let record = catalog.get("posts/a.html").unwrap();
    assert_eq!(record.price_minor, 250);
    assert_eq!(record.cutoff_class, "CUT");
}

#[test]
fn manifest_paths_match_root_qualified_page_keys() {
    let dir = TempDir::new().expect("temp dir");
    write(&dir, "_site/posts/intro.html", "<p>intro</p>");
    let site = dir.path().join("_site");
    let pages = DiskSource::new(&site, ".html").load().unwrap();
    let root = site.to_string_lossy().replace('\\', "/");

    let catalog = ConfigCatalog::from_csv(&format!(
        "name, path, id, price, currency, cutoffClassname\n\
         Intro, {root}/posts/intro.html, intro-1, 4.99, EUR, PAYWALLED\n\
         Other, /posts/other.html, other-1, 1.00, EUR, PAYWALLED\n"
    ))
    .unwrap();
    let key = pages.keys().next().unwrap();
    assert_eq!(catalog.get(key).unwrap().id, "intro-1");
    assert_eq!(catalog.get(key).unwrap().price_minor, 499);
    assert!(catalog.get(&format!("{root}/posts/other.html")).is_none());
}
