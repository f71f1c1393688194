//! Turn one page's markup into a [`RenderableUnit`].
//!
//! 1. parse the page
//! 2. append the login/logout control to the navigation list
//! 3. for configured pages: cut at the cutoff marker, then append the login script to `body`
//! 4. serialize and compile the result as a template
use crate::error::CatalogError;
use crate::gate::AccessGate;
use crate::splitter::split;
use crate::template::PageTemplate;
use crate::unit::{ArticleInfo, RenderableUnit};
use html::{
    InnerContent, Node, append_child_with_content, append_subtree, find_first_element,
    locate_by_class, parse, serialize,
};
use site::{ConfigRecord, FileReader, LoadError};
use std::path::Path;
use std::sync::Arc;

/// Markup shared by every page of a site. Cloning shares the underlying strings.
#[derive(Clone, Debug, Default)]
pub struct SharedFragments {
    /// Shown to logged-in viewers who have not paid.
    pub pay_prompt: Arc<str>,
    /// Shown to anonymous viewers.
    pub login_prompt: Arc<str>,
    /// Appended to the body of configured pages.
    pub login_script: Arc<str>,
    /// Content of the list item added to the navigation list.
    pub nav_login_control: Arc<str>,
}

/// File names of the shared fragments inside a fragments directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentNames {
    pub pay_prompt: String,
    pub login_prompt: String,
    pub login_script: String,
    pub nav_login_control: String,
}

impl Default for FragmentNames {
    fn default() -> Self {
        Self {
            pay_prompt: "paywall.html".to_string(),
            login_prompt: "registerwall.html".to_string(),
            login_script: "login_github.html".to_string(),
            nav_login_control: "navbar_login_button.html".to_string(),
        }
    }
}

impl SharedFragments {
    pub fn new(
        pay_prompt: &str,
        login_prompt: &str,
        login_script: &str,
        nav_login_control: &str,
    ) -> Self {
        Self {
            pay_prompt: Arc::from(pay_prompt),
            login_prompt: Arc::from(login_prompt),
            login_script: Arc::from(login_script),
            nav_login_control: Arc::from(nav_login_control),
        }
    }

    pub fn from_dir(
        reader: &impl FileReader,
        dir: &Path,
        names: &FragmentNames,
    ) -> Result<Self, LoadError> {
        let read = |name: &str| -> Result<String, LoadError> {
            reader.read_to_string(&dir.join(name).to_string_lossy())
        };
        Ok(Self::new(
            &read(&names.pay_prompt)?,
            &read(&names.login_prompt)?,
            &read(&names.login_script)?,
            &read(&names.nav_login_control)?,
        ))
    }
}

/// What to do with a configured page whose cutoff marker is missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingMarkerPolicy {
    /// Log a warning and serve the page ungated.
    #[default]
    TreatAsOpen,
    /// Fail the build.
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerSettings {
    /// Exact class value of the navigation list.
    pub nav_class: String,
    pub nav_item_tag: String,
    pub nav_item_class: String,
    pub missing_marker: MissingMarkerPolicy,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            nav_class: "navbar-nav navbar-nav-scroll ms-auto".to_string(),
            nav_item_tag: "li".to_string(),
            nav_item_class: "nav-item".to_string(),
            missing_marker: MissingMarkerPolicy::default(),
        }
    }
}

pub fn compile_page(
    path: &str,
    markup: &str,
    record: Option<&ConfigRecord>,
    fragments: &SharedFragments,
    settings: &CompilerSettings,
) -> Result<RenderableUnit, CatalogError> {
    let mutation = |source| CatalogError::Mutation {
        path: path.to_string(),
        source,
    };

    let mut root = parse(markup).map_err(|source| CatalogError::Parse {
        path: path.to_string(),
        source,
    })?;

    let nav = locate_by_class(&root, &settings.nav_class).ok_or_else(|| {
        CatalogError::Structure {
            path: path.to_string(),
            missing: format!("navigation list with class `{}`", settings.nav_class),
        }
    })?;
    append_child_with_content(
        &mut root,
        &nav,
        &settings.nav_item_tag,
        vec![("class".to_string(), Some(settings.nav_item_class.clone()))],
        InnerContent::Raw(fragments.nav_login_control.to_string()),
    )
    .map_err(mutation)?;

    let mut walled = None;
    if let Some(record) = record {
        let outcome = split(root, &record.cutoff_class, || {
            Node::raw(AccessGate::placeholder_directive())
        })
        .map_err(mutation)?;
        root = outcome.root;
        walled = outcome.walled;

        if walled.is_none() {
            match settings.missing_marker {
                MissingMarkerPolicy::TreatAsOpen => log::warn!(
                    target: "paywall.compile",
                    "{path}: cutoff marker `{}` not found, serving the page open",
                    record.cutoff_class
                ),
                MissingMarkerPolicy::Reject => {
                    return Err(CatalogError::MissingMarker {
                        path: path.to_string(),
                        class: record.cutoff_class.clone(),
                    });
                }
            }
        }

        let body = find_first_element(&root, "body").ok_or_else(|| CatalogError::Structure {
            path: path.to_string(),
            missing: "body element".to_string(),
        })?;
        append_subtree(&mut root, &body, Node::raw(fragments.login_script.to_string()))
            .map_err(mutation)?;
    }

    let source = serialize(&root);
    let template = PageTemplate::compile(&source).map_err(|source| CatalogError::Compile {
        path: path.to_string(),
        source,
    })?;
    log::debug!(
        target: "paywall.compile",
        "{path}: {} bytes compiled, gated: {}",
        source.len(),
        walled.is_some()
    );

    Ok(RenderableUnit::new(
        template,
        walled,
        Arc::clone(&fragments.pay_prompt),
        Arc::clone(&fragments.login_prompt),
        record.map(ArticleInfo::from),
    ))
}
