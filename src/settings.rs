//! Runtime settings, read from a TOML file.
//!
//! ```toml
//! [site]
//! root = "_site"
//! manifest = "paywall.csv"
//!
//! [fragments]
//! dir = "static"
//!
//! [compiler]
//! nav_class = "navbar-nav navbar-nav-scroll ms-auto"
//! missing_marker = "reject"
//! ```
//!
//! Every key is optional.
use std::path::{Path, PathBuf};

use paywall::{CompilerSettings, FragmentNames, MissingMarkerPolicy};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub fragments: FragmentSection,
    #[serde(default)]
    pub compiler: CompilerSection,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Prefix removed from catalog keys; the site root unless set explicitly.
    pub fn strip_prefix(&self) -> String {
        self.site
            .strip_prefix
            .clone()
            .unwrap_or_else(|| self.site.root.to_string_lossy().replace('\\', "/"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Directory holding the generated pages.
    pub root: PathBuf,
    pub suffix: String,
    /// Paywall manifest (CSV). Without one every page is open.
    pub manifest: Option<PathBuf>,
    pub strip_prefix: Option<String>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            root: PathBuf::from("_site"),
            suffix: ".html".to_string(),
            manifest: None,
            strip_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FragmentSection {
    pub dir: PathBuf,
    pub pay_prompt: String,
    pub login_prompt: String,
    pub login_script: String,
    pub nav_login_control: String,
}

impl Default for FragmentSection {
    fn default() -> Self {
        let names = FragmentNames::default();
        Self {
            dir: PathBuf::from("static"),
            pay_prompt: names.pay_prompt,
            login_prompt: names.login_prompt,
            login_script: names.login_script,
            nav_login_control: names.nav_login_control,
        }
    }
}

impl FragmentSection {
    pub fn names(&self) -> FragmentNames {
        FragmentNames {
            pay_prompt: self.pay_prompt.clone(),
            login_prompt: self.login_prompt.clone(),
            login_script: self.login_script.clone(),
            nav_login_control: self.nav_login_control.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    #[default]
    Open,
    Reject,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSection {
    pub nav_class: String,
    pub nav_item_tag: String,
    pub nav_item_class: String,
    pub missing_marker: MarkerPolicy,
}

impl Default for CompilerSection {
    fn default() -> Self {
        let defaults = CompilerSettings::default();
        Self {
            nav_class: defaults.nav_class,
            nav_item_tag: defaults.nav_item_tag,
            nav_item_class: defaults.nav_item_class,
            missing_marker: MarkerPolicy::default(),
        }
    }
}

impl CompilerSection {
    pub fn to_settings(&self) -> CompilerSettings {
        CompilerSettings {
            nav_class: self.nav_class.clone(),
            nav_item_tag: self.nav_item_tag.clone(),
            nav_item_class: self.nav_item_class.clone(),
            missing_marker: match self.missing_marker {
                MarkerPolicy::Open => MissingMarkerPolicy::TreatAsOpen,
                MarkerPolicy::Reject => MissingMarkerPolicy::Reject,
            },
        }
    }
}
