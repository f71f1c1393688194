//! Site inputs: the paywall manifest and the page loaders.
pub mod config;
pub mod error;
pub mod path;
pub mod price;
pub mod source;

pub use crate::config::{ConfigCatalog, ConfigRecord};
pub use crate::error::{ConfigError, LoadError, PriceError};
pub use crate::path::{is_valid_path, normalize_key};
pub use crate::price::{Currency, format_price_minor, parse_price_minor};
pub use crate::source::{
    DiskReader, DiskSource, FileReader, FixedReader, ListSource, MemorySource, Pages, SiteSource,
};
