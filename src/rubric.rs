//! # Rubric Profiles
//!
//! A rubric profile bundles everything version-dependent about scoring:
//! the profile name, whether the narrative-dignity criterion is live, the
//! grading table, and the eligibility/confidence thresholds. Two profiles
//! ship compiled in:
//!
//! - `classic-v1`: four criteria, six grade bands.
//! - `refined-v2`: five criteria, thirteen bands, stricter thresholds.
//!
//! Profiles load from TOML (`config/rubric.toml` by default,
//! `RUBRIC_CONFIG_PATH` overrides). A missing file falls back to the
//! classic seed; a present-but-invalid file is a configuration error.
//! `RubricHandle` adds mtime-based hot reload for long-running callers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ScoreError;
use crate::score::grade;

pub const DEFAULT_RUBRIC_CONFIG_PATH: &str = "config/rubric.toml";
pub const ENV_RUBRIC_CONFIG_PATH: &str = "RUBRIC_CONFIG_PATH";

static CLASSIC_TOML: &str = include_str!("../config/rubric.toml");
static REFINED_TOML: &str = include_str!("../config/rubric_refined.toml");

static CLASSIC: Lazy<RubricConfig> = Lazy::new(|| {
    RubricConfig::from_toml_str(CLASSIC_TOML).expect("embedded classic rubric is valid")
});
static REFINED: Lazy<RubricConfig> = Lazy::new(|| {
    RubricConfig::from_toml_str(REFINED_TOML).expect("embedded refined rubric is valid")
});

/// One row of the grading table. Minimums are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub min: f64,
    pub grade: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DignitySettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityThresholds {
    /// Finals strictly below this are caution-list candidates.
    pub caution_below: f64,
    /// Finals at or above this are distinction-list candidates.
    pub distinction_min: f64,
    /// Distinction additionally requires this many recorded analyses.
    pub distinction_min_analyses: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceSettings {
    /// Pseudo-count `m` for Bayesian shrinkage toward the global mean.
    pub bayesian_m: f64,
    /// Cohorts below this vote count report no score.
    pub min_cohort_votes: u32,
    /// Per-vote weight of the critic cohort (audience is 1).
    pub critic_weight: f64,
}

/// A full, validated rubric profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricConfig {
    pub version: String,
    pub dignity: DignitySettings,
    pub eligibility: EligibilityThresholds,
    pub confidence: ConfidenceSettings,
    pub bands: Vec<GradeBand>,
}

impl RubricConfig {
    /// The compiled-in classic profile. Default when nothing is configured.
    pub fn classic() -> Self {
        CLASSIC.clone()
    }

    /// The compiled-in refined profile.
    pub fn refined() -> Self {
        REFINED.clone()
    }

    /// Parse and validate a TOML profile document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ScoreError> {
        let config: RubricConfig = toml::from_str(raw)
            .map_err(|e| ScoreError::Configuration(format!("unparseable rubric profile: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks. Run on every load path, including the seeds.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.version.is_empty() {
            return Err(ScoreError::Configuration(
                "rubric profile has no version".to_string(),
            ));
        }
        grade::validate_bands(&self.bands)?;
        for (name, value) in [
            ("eligibility.caution_below", self.eligibility.caution_below),
            ("eligibility.distinction_min", self.eligibility.distinction_min),
        ] {
            if !value.is_finite() || !(0.0..=10.0).contains(&value) {
                return Err(ScoreError::Configuration(format!(
                    "{name} must be within 0..=10, found {value}"
                )));
            }
        }
        if !self.confidence.bayesian_m.is_finite() || self.confidence.bayesian_m <= 0.0 {
            return Err(ScoreError::Configuration(format!(
                "confidence.bayesian_m must be positive, found {}",
                self.confidence.bayesian_m
            )));
        }
        if self.confidence.min_cohort_votes == 0 {
            return Err(ScoreError::Configuration(
                "confidence.min_cohort_votes must be at least 1".to_string(),
            ));
        }
        if !self.confidence.critic_weight.is_finite() || self.confidence.critic_weight < 1.0 {
            return Err(ScoreError::Configuration(format!(
                "confidence.critic_weight must be at least 1, found {}",
                self.confidence.critic_weight
            )));
        }
        Ok(())
    }

    /// Load from a TOML file. A missing file falls back to the classic
    /// seed; a present-but-broken file is a hard configuration error.
    pub fn load_or_seed<P: AsRef<Path>>(path: P) -> Result<Self, ScoreError> {
        match fs::read_to_string(path.as_ref()) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(_) => {
                warn!(
                    path = %path.as_ref().display(),
                    "rubric profile file not readable; using classic seed"
                );
                Ok(Self::classic())
            }
        }
    }

    /// Resolve the active profile: env override path, default path, seed.
    pub fn load_active() -> Result<Self, ScoreError> {
        let path = std::env::var(ENV_RUBRIC_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_RUBRIC_CONFIG_PATH.to_string());
        Self::load_or_seed(path)
    }
}

/// Hot-reload wrapper: reloads when the profile file mtime changes.
///
/// A reload that fails to parse or validate keeps the previous profile in
/// place, so a half-written file can never take scoring down.
#[derive(Debug)]
pub struct RubricHandle {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: RubricConfig,
    last_modified: Option<SystemTime>,
}

impl RubricHandle {
    /// Create with a path (defaults to `config/rubric.toml` if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RUBRIC_CONFIG_PATH));
        let config = RubricConfig::load_or_seed(&path).unwrap_or_else(|e| {
            warn!(error = %e, "initial rubric load failed; using classic seed");
            RubricConfig::classic()
        });
        let last_modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
        Self {
            path,
            inner: RwLock::new(State {
                config,
                last_modified,
            }),
        }
    }

    /// Get the latest profile, reloading if the file changed.
    pub fn current(&self) -> RubricConfig {
        // Fast path: compare mtime under the read lock only.
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().unwrap();
                guard.last_modified != Some(mtime)
            }
            // If the file is gone we keep what we have; no reload.
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().unwrap().config.clone();
        }

        // Slow path: reload with write lock, double-checking the mtime.
        let mut guard = self.inner.write().unwrap();
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    match fs::read_to_string(&self.path)
                        .map_err(|e| ScoreError::Configuration(e.to_string()))
                        .and_then(|raw| RubricConfig::from_toml_str(&raw))
                    {
                        Ok(config) => {
                            guard.config = config;
                            guard.last_modified = Some(mtime);
                        }
                        Err(e) => {
                            warn!(error = %e, "rubric reload failed; keeping previous profile");
                        }
                    }
                }
            }
        }
        guard.config.clone()
    }
}
