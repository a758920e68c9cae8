//! Optional mapping from challenge module ids to human labels.
//!
//! Some deployments group challenges into modules; a step bound to a category
//! label can then also be satisfied by module solves carrying that label. The
//! mapping lives outside this service, so it is modeled as an injected
//! capability with a no-op default.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CareerError;

/// Resolves module ids to the labels steps match against.
///
/// Ids absent from the returned map are dropped from the aggregation; they
/// never fail a progress run.
pub trait ModuleCatalog: Send + Sync {
    fn resolve(&self, ids: &[i64]) -> HashMap<i64, String>;
}

/// Default catalog: resolves nothing, so module solves never contribute to
/// category counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModules;

impl ModuleCatalog for NoModules {
    fn resolve(&self, _ids: &[i64]) -> HashMap<i64, String> {
        HashMap::new()
    }
}

/// Catalog backed by a JSON object of `{"<module id>": "<label>"}`.
#[derive(Debug, Clone, Default)]
pub struct StaticModuleCatalog {
    labels: HashMap<i64, String>,
}

impl StaticModuleCatalog {
    pub fn new(labels: HashMap<i64, String>) -> Self {
        Self { labels }
    }

    pub fn from_file(path: &Path) -> Result<Self, CareerError> {
        let raw = std::fs::read_to_string(path)?;
        let labels: HashMap<i64, String> = serde_json::from_str(&raw)?;
        Ok(Self { labels })
    }
}

impl ModuleCatalog for StaticModuleCatalog {
    fn resolve(&self, ids: &[i64]) -> HashMap<i64, String> {
        ids.iter()
            .filter_map(|id| self.labels.get(id).map(|label| (*id, label.clone())))
            .collect()
    }
}

/// Builds the configured catalog. A missing or malformed file logs a warning
/// and falls back to [`NoModules`]; it never aborts startup.
pub fn load_or_default(path: Option<&Path>) -> Arc<dyn ModuleCatalog> {
    let Some(path) = path else {
        return Arc::new(NoModules);
    };
    match StaticModuleCatalog::from_file(path) {
        Ok(catalog) => {
            debug!("Loaded module catalog from {}", path.display());
            Arc::new(catalog)
        }
        Err(e) => {
            warn!("Module catalog {} unavailable: {}", path.display(), e);
            Arc::new(NoModules)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn static_catalog_resolves_known_ids_only() {
        let catalog = StaticModuleCatalog::new(HashMap::from([
            (1, "web".to_string()),
            (2, "crypto".to_string()),
        ]));
        let resolved = catalog.resolve(&[1, 2, 99]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get(&1).map(String::as_str), Some("web"));
        assert!(!resolved.contains_key(&99));
    }

    #[test]
    fn no_modules_resolves_nothing() {
        assert!(NoModules.resolve(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn from_file_parses_string_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"7": "forensics", "8": "pwn"}}"#).unwrap();

        let catalog = StaticModuleCatalog::from_file(file.path()).unwrap();
        let resolved = catalog.resolve(&[7, 8]);
        assert_eq!(resolved.get(&7).map(String::as_str), Some("forensics"));
        assert_eq!(resolved.get(&8).map(String::as_str), Some("pwn"));
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let catalog = load_or_default(Some(Path::new("/nonexistent/modules.json")));
        assert!(catalog.resolve(&[1]).is_empty());
    }
}
