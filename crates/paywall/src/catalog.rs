//! All compiled pages of a site, keyed by path.
//!
//! Built once, then only read: every render borrows the catalog immutably, so any number of
//! threads can render from one catalog without locking.
use crate::compiler::{CompilerSettings, SharedFragments, compile_page};
use crate::error::{CatalogError, RenderError};
use crate::gate::AccessGate;
use crate::unit::{ArticleInfo, RenderableUnit};
use crate::viewer::ViewerState;
use rayon::prelude::*;
use site::{ConfigCatalog, Pages, normalize_key};
use std::collections::BTreeMap;
use std::io::Write;

/// Keys carry no leading `/`; every lookup normalizes its argument the same way.
#[derive(Clone, Debug, Default)]
pub struct PaywallCatalog {
    units: BTreeMap<String, RenderableUnit>,
}

impl PaywallCatalog {
    /// Compile every page. Pages compile in parallel; the first failure aborts the build.
    pub fn build(
        pages: &Pages,
        config: &ConfigCatalog,
        fragments: &SharedFragments,
        settings: &CompilerSettings,
    ) -> Result<Self, CatalogError> {
        log::info!(
            target: "paywall.catalog",
            "building catalog: {} pages, {} manifest records",
            pages.len(),
            config.len()
        );

        let compiled = pages
            .par_iter()
            .map(|(path, markup)| {
                let unit = compile_page(path, markup, config.get(path), fragments, settings)?;
                Ok((normalize_key(path), unit))
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let mut catalog = Self::default();
        for (key, unit) in compiled {
            catalog.insert(key, unit);
        }
        for record in config.iter() {
            if !catalog.contains(&record.path) {
                log::warn!(
                    target: "paywall.catalog",
                    "manifest names `{}` but the site has no such page",
                    record.path
                );
            }
        }

        log::info!(
            target: "paywall.catalog",
            "catalog ready: {} pages, {} gated",
            catalog.len(),
            catalog.gated_count()
        );
        Ok(catalog)
    }

    /// Add or replace a unit.
    pub fn insert(&mut self, path: impl AsRef<str>, unit: RenderableUnit) {
        let key = normalize_key(path.as_ref());
        if self.units.insert(key, unit).is_some() {
            log::warn!(target: "paywall.catalog", "duplicate page `{}` replaced", path.as_ref());
        }
    }

    /// Remove `prefix` from the front of every key that starts with it. Returns how many keys
    /// were rewritten.
    pub fn strip_prefix(&mut self, prefix: &str) -> usize {
        let prefix = normalize_key(prefix);
        if prefix.is_empty() {
            return 0;
        }
        let mut rewritten = 0;
        let units = std::mem::take(&mut self.units);
        for (key, unit) in units {
            let stripped = key.strip_prefix(prefix.as_str()).map(str::to_string);
            if stripped.is_some() {
                rewritten += 1;
            }
            self.insert(stripped.unwrap_or(key), unit);
        }
        log::debug!(
            target: "paywall.catalog",
            "stripped `{prefix}` from {rewritten} of {} keys",
            self.units.len()
        );
        rewritten
    }

    pub fn contains(&self, path: &str) -> bool {
        self.units.contains_key(&normalize_key(path))
    }

    pub fn lookup(&self, path: &str) -> Option<&RenderableUnit> {
        self.units.get(&normalize_key(path))
    }

    /// Catalog key serving a request route: `/` is `index.html`, a directory route ends in
    /// `index.html`, and a last segment without an extension gets `.html` appended.
    pub fn resolve(&self, route: &str) -> Option<&str> {
        let mut key = normalize_key(route);
        if key.is_empty() || key.ends_with('/') {
            key.push_str("index.html");
        } else {
            let last = key.rsplit('/').next().unwrap_or_default();
            if !last.contains('.') {
                key.push_str(".html");
            }
        }
        self.units.get_key_value(&key).map(|(key, _)| key.as_str())
    }

    pub fn render_to_string(&self, path: &str, viewer: &ViewerState) -> Result<String, RenderError> {
        let mut out = Vec::new();
        self.render_to_sink(path, viewer, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn render_to_sink<W: Write + ?Sized>(
        &self,
        path: &str,
        viewer: &ViewerState,
        sink: &mut W,
    ) -> Result<(), RenderError> {
        let unit = self
            .lookup(path)
            .ok_or_else(|| RenderError::NotFound(path.to_string()))?;
        if unit.is_gated() {
            log::trace!(
                target: "paywall.render",
                "{path}: {:?}",
                AccessGate::select(viewer)
            );
        }
        unit.render(viewer, sink)
            .map_err(|source| RenderError::Template {
                path: path.to_string(),
                source,
            })
    }

    /// True when the page exists and has gated content.
    pub fn has_paywall(&self, path: &str) -> bool {
        self.lookup(path).is_some_and(RenderableUnit::is_gated)
    }

    pub fn article(&self, path: &str) -> Option<&ArticleInfo> {
        self.lookup(path)?.article()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RenderableUnit)> {
        self.units.iter().map(|(key, unit)| (key.as_str(), unit))
    }

    pub fn gated_count(&self) -> usize {
        self.units.values().filter(|unit| unit.is_gated()).count()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
