//! The paywall manifest: which pages are gated, at what price, and where the gate starts.
//!
//! ```text
//! name, path, id, price, currency, cutoffClassname
//! Intro, _site/posts/intro.html, intro-1, 4.99, EUR, PAYWALLED
//! ```
//!
//! Paths are matched against page keys as loaded, so they include the site root
//! (`_site/...` for a [`crate::DiskSource`] rooted at `_site`). A leading `/` is ignored.
//!
//! Fields are comma separated and trimmed; a field may be double-quoted to contain commas
//! (`""` inside quotes is a literal quote). Blank lines are skipped.
use crate::error::ConfigError;
use crate::path::{is_valid_path, normalize_key};
use crate::price::{Currency, parse_price_minor};
use std::collections::HashMap;
use std::path::Path;

pub const HEADER: &[&str] = &["name", "path", "id", "price", "currency", "cutoffClassname"];

/// One gated page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigRecord {
    pub name: String,
    /// Path as written in the manifest.
    pub path: String,
    pub id: String,
    pub price_minor: u64,
    pub currency: Currency,
    /// Class attribute value of the element after which content is gated.
    pub cutoff_class: String,
}

impl ConfigRecord {
    /// Validate and build a record from raw manifest fields.
    pub fn new(
        name: &str,
        path: &str,
        id: &str,
        price: &str,
        currency: &str,
        cutoff_class: &str,
        line: usize,
    ) -> Result<Self, ConfigError> {
        if !is_valid_path(path) {
            return Err(ConfigError::Path {
                line,
                value: path.to_string(),
            });
        }
        let price_minor = parse_price_minor(price).map_err(|source| ConfigError::Price {
            line,
            value: price.to_string(),
            source,
        })?;
        let currency = currency.parse::<Currency>().map_err(|()| ConfigError::Currency {
            line,
            value: currency.to_string(),
        })?;
        Ok(Self {
            name: name.to_string(),
            path: path.to_string(),
            id: id.to_string(),
            price_minor,
            currency,
            cutoff_class: cutoff_class.to_string(),
        })
    }
}

/// Manifest records in file order, indexed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct ConfigCatalog {
    records: Vec<ConfigRecord>,
    by_key: HashMap<String, usize>,
}

impl ConfigCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_csv(&source)?;
        log::debug!(
            target: "site.config",
            "loaded {} manifest records from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn from_csv(source: &str) -> Result<Self, ConfigError> {
        let mut catalog = Self::default();
        let mut header_seen = false;

        for (index, raw_line) in source.lines().enumerate() {
            let line = index + 1;
            if raw_line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(raw_line, line)?;
            if !header_seen {
                if fields.len() != HEADER.len() || fields.iter().zip(HEADER).any(|(f, h)| f != h) {
                    return Err(ConfigError::Header {
                        found: fields,
                        expected: HEADER,
                    });
                }
                header_seen = true;
                continue;
            }
            let [name, path, id, price, currency, cutoff_class] = fields.as_slice() else {
                return Err(ConfigError::FieldCount {
                    line,
                    expected: HEADER.len(),
                    found: fields.len(),
                });
            };
            let record = ConfigRecord::new(name, path, id, price, currency, cutoff_class, line)?;
            catalog.insert(record, line)?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, record: ConfigRecord, line: usize) -> Result<(), ConfigError> {
        let key = normalize_key(&record.path);
        if self.by_key.contains_key(&key) {
            return Err(ConfigError::DuplicatePath {
                line,
                path: record.path,
            });
        }
        self.by_key.insert(key, self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// Record for `path`; a leading `/` on either side is ignored.
    pub fn get(&self, path: &str) -> Option<&ConfigRecord> {
        let index = *self.by_key.get(&normalize_key(path))?;
        self.records.get(index)
    }

    pub fn record_at(&self, index: usize) -> Option<&ConfigRecord> {
        self.records.get(index)
    }

    /// Manifest paths in file order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.path.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn split_fields(line_text: &str, line: usize) -> Result<Vec<String>, ConfigError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line_text.chars().peekable();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if in_quotes {
        return Err(ConfigError::UnterminatedQuote { line });
    }
    fields.push(current.trim().to_string());
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PriceError;

    const SAMPLE: &str = "name, path, id, price, currency, cutoffClassname
  test, /test/whatever, abcd, 12.34, EUR, PAYWALLED
  test2, /test/whatever2, abcd2, 12.3, USD, CUT
";

    #[test]
    fn parses_records_in_order() {
        let catalog = ConfigCatalog::from_csv(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        let first = catalog.record_at(0).unwrap();
        assert_eq!(
            first,
            &ConfigRecord {
                name: "test".to_string(),
                path: "/test/whatever".to_string(),
                id: "abcd".to_string(),
                price_minor: 1234,
                currency: Currency::Eur,
                cutoff_class: "PAYWALLED".to_string(),
            }
        );
        assert_eq!(catalog.record_at(1).unwrap().price_minor, 1230);
        assert!(catalog.record_at(2).is_none());
        assert_eq!(
            catalog.paths().collect::<Vec<_>>(),
            vec!["/test/whatever", "/test/whatever2"]
        );
    }

    #[test]
    fn get_ignores_leading_slash() {
        let catalog = ConfigCatalog::from_csv(SAMPLE).unwrap();
        assert_eq!(catalog.get("test/whatever2").unwrap().id, "abcd2");
        assert_eq!(catalog.get("/test/whatever").unwrap().id, "abcd");
        assert!(catalog.get("test/other").is_none());
    }

    #[test]
    fn header_must_match_exactly() {
        let err = ConfigCatalog::from_csv("name, path, id, price, currency, cutoff\n").unwrap_err();
        assert!(matches!(err, ConfigError::Header { .. }));
        let err = ConfigCatalog::from_csv("name, path\n").unwrap_err();
        assert!(matches!(err, ConfigError::Header { .. }));
    }

    #[test]
    fn header_only_manifest_is_empty() {
        let catalog = ConfigCatalog::from_csv(&format!("{}\n\n", HEADER.join(","))).unwrap();
        assert!(catalog.is_empty());
        assert!(ConfigCatalog::from_csv("").unwrap().is_empty());
    }

    #[test]
    fn row_errors_carry_line_numbers() {
        let header = HEADER.join(", ");
        let cases = [
            ("a, /p, id, 1.00, EUR", "line 2: expected 6 fields, found 5"),
            ("a, /p, id, 1.00, GBP, CUT", "line 2: unsupported currency `GBP`"),
            ("a, , id, 1.00, EUR, CUT", "line 2: invalid path ``"),
            ("a, /p, id, abc, EUR, CUT", "line 2: invalid price `abc`"),
        ];
        for (row, message) in cases {
            let err = ConfigCatalog::from_csv(&format!("{header}\n{row}\n")).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
        let err = ConfigCatalog::from_csv(&format!("{header}\na, /p, id, x, EUR, CUT\n")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Price {
                source: PriceError::InvalidMajor(_),
                ..
            }
        ));
    }

    #[test]
    fn duplicate_paths_are_rejected_after_normalization() {
        let header = HEADER.join(",");
        let err = ConfigCatalog::from_csv(&format!(
            "{header}\na,/p.html,1,1,EUR,CUT\n\nb,p.html,2,1,EUR,CUT\n"
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "line 4: duplicate path `p.html`");
    }

    #[test]
    fn quoted_fields_may_contain_commas() {
        let header = HEADER.join(",");
        let catalog = ConfigCatalog::from_csv(&format!(
            "{header}\n\"Tips, tricks\",/t.html,t,\"1.50\",USD,\"say \"\"hi\"\"\"\n"
        ))
        .unwrap();
        let record = catalog.record_at(0).unwrap();
        assert_eq!(record.name, "Tips, tricks");
        assert_eq!(record.price_minor, 150);
        assert_eq!(record.cutoff_class, "say \"hi\"");

        let err = ConfigCatalog::from_csv(&format!("{header}\n\"open,/t,t,1,USD,C\n")).unwrap_err();
        assert!(matches!(err, ConfigError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let err = ConfigCatalog::from_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
