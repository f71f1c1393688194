//! TOML case manifests for fixture-driven tests.
//!
//! ```toml
//! format = "cases-v1"
//!
//! [[case]]
//! id = "implied-body"
//! input = "<p>x"
//! expected = "<html><head></head><body><p>x</p></body></html>"
//! ```
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const CASES_FORMAT_V1: &str = "cases-v1";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub id: String,
    pub input: String,
    #[serde(default)]
    pub expected: Option<String>,
    /// Expected [`crate::outline::dom_outline`] lines.
    #[serde(default)]
    pub outline: Option<Vec<String>>,
    /// Free-form per-case parameters (class names, flags) for the test that owns the manifest.
    #[serde(default)]
    pub params: toml::Table,
}

impl Case {
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(toml::Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaseManifest {
    format: String,
    #[serde(rename = "case", default)]
    cases: Vec<Case>,
}

/// Parse a manifest, checking the format tag and that case ids are unique and non-empty.
pub fn parse_cases(source: &str, origin: &str) -> Result<Vec<Case>, String> {
    let manifest: CaseManifest =
        toml::from_str(source).map_err(|err| format!("invalid case manifest {origin}: {err}"))?;
    if manifest.format != CASES_FORMAT_V1 {
        return Err(format!(
            "unsupported case manifest format '{}' in {origin}; expected '{CASES_FORMAT_V1}'",
            manifest.format
        ));
    }
    let mut seen = BTreeSet::new();
    for case in &manifest.cases {
        if case.id.trim().is_empty() {
            return Err(format!("case with empty id in {origin}"));
        }
        if !seen.insert(case.id.as_str()) {
            return Err(format!("duplicate case id '{}' in {origin}", case.id));
        }
    }
    Ok(manifest.cases)
}

/// Load a manifest from disk. Panics with context on any problem; meant for tests.
pub fn load_cases(path: &Path) -> Vec<Case> {
    let source = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read case manifest {path:?}: {err}"));
    parse_cases(&source, &path.display().to_string()).unwrap_or_else(|err| panic!("{err}"))
}

/// Restrict cases to ids containing the value of `env_key`, when set.
pub fn filter_cases(cases: Vec<Case>, env_key: &str) -> Vec<Case> {
    match std::env::var(env_key).ok() {
        Some(filter) => cases
            .into_iter()
            .filter(|case| case.id.contains(&filter))
            .collect(),
        None => cases,
    }
}
