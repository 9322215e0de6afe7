//! In-memory log of recent scoring events for quick diagnostics.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::score::ScoreReport;

#[derive(Debug, Clone)]
pub struct ScoreEvent {
    pub at: DateTime<Utc>,
    pub character_key: String,
    pub final_score: f64,
    pub grade: String,
}

#[derive(Debug)]
pub struct ScoreHistory {
    inner: Mutex<Vec<ScoreEvent>>,
    cap: usize,
}

impl ScoreHistory {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, character_key: &str, report: &ScoreReport) {
        let entry = ScoreEvent {
            at: Utc::now(),
            character_key: character_key.to_string(),
            final_score: report.final_score,
            grade: report.grade.clone(),
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<ScoreEvent> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("history mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::tropes::TropeBreakdown;
    use crate::score::{CriterionScores, ScoreReport};

    fn report(final_score: f64) -> ScoreReport {
        ScoreReport {
            rubric_version: "classic-v1".to_string(),
            criteria: CriterionScores {
                individuality: 2.0,
                cultural_identity: 2.0,
                trope_interrogation: 2.0,
                narrative_impact: 2.0,
                narrative_dignity: None,
            },
            tropes: TropeBreakdown {
                raw_penalty: 0.0,
                capped_penalty: 0.0,
                subversion_bonus: 0.0,
                adjusted_score: 2.0,
                counted: 0,
                subversion_count: 0,
            },
            base_score: 8.0,
            final_score,
            grade: "A".to_string(),
            grade_label: "Strong pass".to_string(),
        }
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let history = ScoreHistory::with_capacity(3);
        for i in 0..5 {
            history.push(&format!("c{i}|m"), &report(f64::from(i)));
        }
        assert_eq!(history.len(), 3);
        let snapshot = history.snapshot_last_n(10);
        let keys: Vec<_> = snapshot.iter().map(|e| e.character_key.as_str()).collect();
        assert_eq!(keys, ["c2|m", "c3|m", "c4|m"]);
    }

    #[test]
    fn snapshot_returns_newest_tail() {
        let history = ScoreHistory::with_capacity(100);
        for i in 0..10 {
            history.push("k|m", &report(f64::from(i)));
        }
        let snapshot = history.snapshot_last_n(2);
        assert_eq!(snapshot.len(), 2);
        assert!((snapshot[0].final_score - 8.0).abs() < 1e-9);
        assert!((snapshot[1].final_score - 9.0).abs() < 1e-9);
    }

    #[test]
    fn empty_history_yields_empty_snapshot() {
        let history = ScoreHistory::with_capacity(10);
        assert!(history.is_empty());
        assert!(history.snapshot_last_n(5).is_empty());
    }
}
