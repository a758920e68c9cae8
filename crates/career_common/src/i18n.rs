//! Locale bundles for the dashboard UI.
//!
//! Strings live in `<dir>/<locale>/translations.json` as a flat string map.
//! A broken or absent bundle must never fail a page render, so every failure
//! path lands on an empty map.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::CareerError;

/// Loads per-locale UI strings from a bundle directory.
#[derive(Debug, Clone)]
pub struct Translations {
    dir: PathBuf,
    fallback: String,
}

impl Translations {
    pub fn new(dir: impl Into<PathBuf>, fallback: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            fallback: fallback.into(),
        }
    }

    /// The string map for `locale`, normalized to its bare language code.
    ///
    /// A locale without a bundle is served the fallback bundle. A bundle
    /// that exists but cannot be read or parsed yields an empty map with a
    /// warning, not an error.
    pub fn for_locale(&self, locale: &str) -> HashMap<String, String> {
        let mut code = normalize_locale(locale);
        if code.is_empty() {
            code = self.fallback.clone();
        }

        let mut file = self.bundle_path(&code);
        if !file.exists() {
            file = self.bundle_path(&self.fallback);
        }

        match read_bundle(&file) {
            Ok(map) => map,
            Err(e) => {
                warn!("Unable to load translations for locale {}: {}", code, e);
                HashMap::new()
            }
        }
    }

    fn bundle_path(&self, code: &str) -> PathBuf {
        self.dir.join(code).join("translations.json")
    }
}

fn read_bundle(path: &Path) -> Result<HashMap<String, String>, CareerError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Reduce a locale tag to its bare language code: `en-US`, `en_US` and `EN`
/// all become `en`.
pub fn normalize_locale(raw: &str) -> String {
    raw.split(['-', '_'])
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// The first concrete tag of an `Accept-Language` header value, quality
/// weight stripped. Wildcards and empty headers yield `None`.
pub fn locale_from_accept_language(header: &str) -> Option<String> {
    let first = header.split(',').next()?;
    let tag = first.split(';').next().unwrap_or("").trim();
    if tag.is_empty() || tag == "*" {
        return None;
    }
    Some(tag.to_string())
}
