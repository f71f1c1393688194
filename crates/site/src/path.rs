//! Path keys shared by the manifest, the site loaders, and the catalog.

/// Key form of a path: `\` separators become `/` and leading `/` are dropped.
pub fn normalize_key(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.trim_start_matches('/').to_string()
}

/// Whether `path` names a file.
///
/// The path must not end in `/`, and after lexical cleaning (`.` dropped, `..` applied) it must
/// be non-empty with a last segment that is a real name rather than `..`. NUL bytes are rejected
/// outright.
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || path.ends_with('/') || path.contains('\0') {
        return false;
    }
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            name => segments.push(name),
        }
    }
    segments.last().is_some_and(|last| *last != "..")
}
