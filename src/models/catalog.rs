//! File catalog: which files are benchmarked and where they live on each endpoint

use crate::error::{AppError, ErrorContext, Result};
use crate::types::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Relative paths of one file, keyed by access method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Path on the path-based mirrors
    pub http: String,

    /// Path on the direct-download alias service, if the file has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<String>,
}

impl FileSpec {
    /// A file reachable only through the mirrors
    pub fn http_only<S: Into<String>>(http: S) -> Self {
        Self {
            http: http.into(),
            download: None,
        }
    }

    /// A file also reachable through the download alias
    pub fn with_alias<S: Into<String>, T: Into<String>>(http: S, download: T) -> Self {
        Self {
            http: http.into(),
            download: Some(download.into()),
        }
    }

    /// Relative path for a method, `None` when the file has no such mapping
    pub fn path_for(&self, method: Method) -> Option<&str> {
        match method {
            Method::Http => Some(self.http.as_str()),
            Method::Download => self.download.as_deref(),
        }
    }

    /// Whether the file is available through the download alias
    pub fn has_download_alias(&self) -> bool {
        self.download.is_some()
    }
}

/// A named catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(flatten)]
    pub spec: FileSpec,
}

/// Ordered, immutable table of files to benchmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        let entries = crate::defaults::DEFAULT_CATALOG
            .iter()
            .map(|&(name, http, download)| CatalogEntry {
                name: name.to_string(),
                spec: FileSpec {
                    http: http.to_string(),
                    download: download.map(String::from),
                },
            })
            .collect();
        Self { entries }
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from its JSON array form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid catalog file {}", path.display()))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a file by identifier
    pub fn get(&self, name: &str) -> Option<&FileSpec> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.spec)
    }

    /// Check the catalog invariants
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(AppError::validation("Catalog must contain at least one file"));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            if entry.name.trim().is_empty() {
                return Err(AppError::validation("Catalog file identifier cannot be empty"));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(AppError::validation(format!("Duplicate catalog file identifier: {}", entry.name)));
            }
            check_csv_safe("file identifier", &entry.name)?;

            if entry.spec.http.trim().is_empty() {
                return Err(AppError::validation(format!("File '{}' has an empty http path", entry.name)));
            }
            check_csv_safe("http path", &entry.spec.http)?;

            if let Some(download) = &entry.spec.download {
                if download.trim().is_empty() {
                    return Err(AppError::validation(format!("File '{}' has an empty download path", entry.name)));
                }
                check_csv_safe("download path", download)?;
            }
        }

        Ok(())
    }
}

// CSV rows are written without quoting, so separators cannot appear in fields.
fn check_csv_safe(what: &str, value: &str) -> Result<()> {
    if value.contains([',', '\r', '\n']) {
        return Err(AppError::validation(format!(
            "Catalog {} '{}' must not contain commas or line breaks",
            what,
            value.escape_debug()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.validate().is_ok());

        let names: Vec<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["4hhb", "5hhf", "1d8w", "ls-lR", "current_file_holdings"]);
    }

    #[test]
    fn test_every_default_entry_has_http_path() {
        for entry in Catalog::default().iter() {
            assert!(entry.spec.path_for(Method::Http).is_some(), "{} lacks http", entry.name);
        }
    }

    #[test]
    fn test_path_for_method() {
        let spec = FileSpec::with_alias("data/pdb4hhb.ent.gz", "4hhb.pdb.gz");
        assert_eq!(spec.path_for(Method::Http), Some("data/pdb4hhb.ent.gz"));
        assert_eq!(spec.path_for(Method::Download), Some("4hhb.pdb.gz"));
        assert!(spec.has_download_alias());

        let plain = FileSpec::http_only("ls-lR");
        assert_eq!(plain.path_for(Method::Download), None);
        assert!(!plain.has_download_alias());
    }

    #[test]
    fn test_json_preserves_order_and_optional_alias() {
        let catalog = Catalog::from_json_str(
            r#"[
                {"name": "zeta", "http": "z/zeta.gz"},
                {"name": "alpha", "http": "a/alpha.gz", "download": "alpha.gz"}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.entries()[0].name, "zeta");
        assert_eq!(catalog.entries()[1].name, "alpha");
        assert_eq!(catalog.get("zeta"), Some(&FileSpec::http_only("z/zeta.gz")));
        assert!(catalog.get("alpha").unwrap().has_download_alias());
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_json_requires_http_path() {
        let result = Catalog::from_json_str(r#"[{"name": "x", "download": "x.gz"}]"#);
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        assert!(Catalog::new(vec![]).validate().is_err());

        let duplicate = Catalog::new(vec![
            CatalogEntry { name: "a".into(), spec: FileSpec::http_only("a") },
            CatalogEntry { name: "a".into(), spec: FileSpec::http_only("b") },
        ]);
        assert!(duplicate.validate().is_err());

        let comma = Catalog::new(vec![CatalogEntry {
            name: "a,b".into(),
            spec: FileSpec::http_only("a"),
        }]);
        assert!(comma.validate().is_err());

        let empty_http = Catalog::new(vec![CatalogEntry {
            name: "a".into(),
            spec: FileSpec::http_only("  "),
        }]);
        assert!(empty_http.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "one", "http": "one.gz"}}]"#).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert_eq!(err.category(), "IO");
        assert!(err.to_string().contains("Failed to read catalog file"));
    }
}
