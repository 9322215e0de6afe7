// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod catalog;
pub mod community;
pub mod critique;
pub mod eligibility;
pub mod error;
pub mod history;
pub mod keys;
pub mod ledger;
pub mod metrics;
pub mod roster;
pub mod rubric;

// The deterministic scoring pipeline (criteria, tropes, grading)
pub mod score;

// ---- Re-exports for stable public API ----
pub use crate::catalog::TropeCatalog;
pub use crate::community::{Cohort, VoteRule, VoteValue};
pub use crate::critique::{CastingFlag, Critique, TropeOccurrence, TropeSeverity};
pub use crate::error::ScoreError;
pub use crate::roster::Roster;
pub use crate::rubric::{RubricConfig, RubricHandle};
pub use crate::score::{score_critique, ScoreReport};
