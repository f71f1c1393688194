//! Build-time and render-time failures.
use thiserror::Error;

/// Why a catalog could not be built. Every variant names the page that caused it.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: html::ParseError,
    },
    #[error("{path}: no {missing}")]
    Structure { path: String, missing: String },
    #[error("{path}: template does not compile: {source}")]
    Compile {
        path: String,
        #[source]
        source: handlebars::TemplateError,
    },
    #[error("{path}: cutoff marker with class `{class}` not found")]
    MissingMarker { path: String, class: String },
    #[error("{path}: {source}")]
    Mutation {
        path: String,
        #[source]
        source: html::MutationError,
    },
}

impl CatalogError {
    /// The page the error is about.
    pub fn path(&self) -> &str {
        match self {
            CatalogError::Parse { path, .. }
            | CatalogError::Structure { path, .. }
            | CatalogError::Compile { path, .. }
            | CatalogError::MissingMarker { path, .. }
            | CatalogError::Mutation { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no page at `{0}`")]
    NotFound(String),
    #[error("{path}: {source}")]
    Template {
        path: String,
        #[source]
        source: handlebars::RenderError,
    },
}
