//! # Trope Catalog
//!
//! Fixed table mapping trope identifiers to severity, penalty, and register
//! metadata. Consumed read-only by the scoring engine:
//!
//! - Loads from JSON config (`config/tropes.json` by default,
//!   `TROPE_CATALOG_PATH` overrides).
//! - Falls back to the compiled-in seed when the file is absent.
//! - Validated at load: non-empty, unique ids, penalties >= 0.
//! - Occurrence ids are checked against the catalog before scoring; an
//!   unknown id is a deployment defect (the catalog and the prompt that
//!   produced the critique ship as a matched pair), not user error.
//!
//! Occurrence penalties are NOT re-looked-up here. The occurrence list is
//! the source of truth for penalty values; the catalog only vouches that
//! the id exists.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::critique::{TropeOccurrence, TropeSeverity};
use crate::error::ScoreError;

pub const DEFAULT_TROPE_CATALOG_PATH: &str = "config/tropes.json";
pub const ENV_TROPE_CATALOG_PATH: &str = "TROPE_CATALOG_PATH";

static SEED_JSON: &str = include_str!("../config/tropes.json");

static SEED: Lazy<TropeCatalog> = Lazy::new(|| {
    TropeCatalog::from_json_str(SEED_JSON).expect("embedded trope catalog is valid")
});

/// How a cataloged trope registers with audiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TropeRegister {
    Trigger,
    Teachable,
    Mockery,
    Dual,
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub severity: TropeSeverity,
    pub penalty: f64,
    pub register: TropeRegister,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    tropes: Vec<CatalogEntry>,
}

/// The loaded, validated catalog. Immutable after construction; safe to
/// share across any number of concurrent scoring calls.
#[derive(Debug, Clone)]
pub struct TropeCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl TropeCatalog {
    /// Parse and validate a JSON catalog document.
    pub fn from_json_str(raw: &str) -> Result<Self, ScoreError> {
        let file: CatalogFile = serde_json::from_str(raw)
            .map_err(|e| ScoreError::Configuration(format!("unparseable trope catalog: {e}")))?;

        let mut entries = BTreeMap::new();
        for entry in file.tropes {
            if entry.id.is_empty() {
                return Err(ScoreError::Configuration(
                    "trope catalog entry with empty id".to_string(),
                ));
            }
            if !entry.penalty.is_finite() || entry.penalty < 0.0 {
                return Err(ScoreError::Configuration(format!(
                    "trope '{}' has invalid penalty {}",
                    entry.id, entry.penalty
                )));
            }
            let id = entry.id.clone();
            if entries.insert(id.clone(), entry).is_some() {
                return Err(ScoreError::Configuration(format!(
                    "duplicate trope id in catalog: {id}"
                )));
            }
        }

        if entries.is_empty() {
            return Err(ScoreError::Configuration(
                "trope catalog is empty".to_string(),
            ));
        }

        Ok(Self { entries })
    }

    /// Load from a JSON file. A missing file falls back to the compiled-in
    /// seed; a present-but-broken file is a hard configuration error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScoreError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(raw) => Self::from_json_str(&raw),
            Err(_) => {
                warn!(
                    path = %path.as_ref().display(),
                    "trope catalog file not readable; using embedded seed"
                );
                Ok(Self::seed())
            }
        }
    }

    /// Resolve the active catalog: env override path, default path, seed.
    pub fn load_active() -> Result<Self, ScoreError> {
        let path = std::env::var(ENV_TROPE_CATALOG_PATH)
            .unwrap_or_else(|_| DEFAULT_TROPE_CATALOG_PATH.to_string());
        Self::load_from_file(path)
    }

    /// The compiled-in seed catalog.
    pub fn seed() -> Self {
        SEED.clone()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Confirm every occurrence references a cataloged id.
    pub fn check_occurrences(&self, occurrences: &[TropeOccurrence]) -> Result<(), ScoreError> {
        for occ in occurrences {
            if !self.entries.contains_key(&occ.id) {
                return Err(ScoreError::Configuration(format!(
                    "detected trope '{}' is not in the catalog",
                    occ.id
                )));
            }
        }
        Ok(())
    }
}
