//! Paywalled static pages.
//!
//! Each page of a site is parsed once, cut at its cutoff marker when the manifest gates it, and
//! compiled into a template whose placeholder picks the walled content, a pay prompt or a login
//! prompt for the viewer at hand. The resulting [`PaywallCatalog`] is immutable and shared by all
//! renders.
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod gate;
pub mod splitter;
pub mod template;
pub mod unit;
pub mod viewer;

pub use crate::catalog::PaywallCatalog;
pub use crate::compiler::{
    CompilerSettings, FragmentNames, MissingMarkerPolicy, SharedFragments, compile_page,
};
pub use crate::error::{CatalogError, RenderError};
pub use crate::gate::{AccessGate, Variant};
pub use crate::splitter::{SplitOutcome, split};
pub use crate::template::PageTemplate;
pub use crate::unit::{ArticleInfo, RenderableUnit};
pub use crate::viewer::ViewerState;
