//! Per-character vote ledger.
//!
//! One vote per (voter, rule): voting again on the same rule replaces the
//! earlier vote, so nobody can stack a cohort by re-submitting. Voter
//! identities are stored only as short anonymized hashes.

use std::collections::BTreeMap;

use crate::community::{Cohort, VoteRule, VoteValue};

/// Anonymize a raw voter identity into a short stable hash.
pub fn anon_voter_id(identity: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredVote {
    pub value: VoteValue,
    pub cohort: Cohort,
}

/// All recorded votes for one character, keyed by (anon voter, rule).
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    votes: BTreeMap<(String, VoteRule), StoredVote>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record or replace a vote. Returns `true` when an earlier vote by the
    /// same voter on the same rule was replaced.
    pub fn upsert(
        &mut self,
        voter: &str,
        rule: VoteRule,
        value: VoteValue,
        cohort: Cohort,
    ) -> bool {
        self.votes
            .insert((voter.to_string(), rule), StoredVote { value, cohort })
            .is_some()
    }

    /// Remove a voter's vote on one rule. Returns `true` when a vote was
    /// actually removed.
    pub fn withdraw(&mut self, voter: &str, rule: VoteRule) -> bool {
        self.votes.remove(&(voter.to_string(), rule)).is_some()
    }

    /// All votes on one rule, in ledger order.
    pub fn votes_for(&self, rule: VoteRule) -> Vec<(Cohort, VoteValue)> {
        self.votes
            .iter()
            .filter(|((_, r), _)| *r == rule)
            .map(|(_, v)| (v.cohort, v.value))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
