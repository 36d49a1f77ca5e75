//! The read-only view of the Viterbi search the transition functor
//! consumes: who reached whom.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use crate::candidate::CandidateId;

/// Predecessor lookup into the surrounding Viterbi search.
///
/// `None` is the invalid sentinel: the candidate has not been reached
/// by any left state yet (or is in the first layer).
pub trait ViterbiLookup {
    fn predecessor(&self, id: CandidateId) -> Option<CandidateId>;
}

impl<V> ViterbiLookup for &V
where
    V: ViterbiLookup,
{
    #[inline]
    fn predecessor(&self, id: CandidateId) -> Option<CandidateId> {
        (**self).predecessor(id)
    }
}

/// The minimal predecessor store a forward-pass driver maintains.
///
/// Interior mutability lets the driver keep recording predecessors
/// while the costing model holds a shared reference; the matcher is
/// single-threaded cooperative, so no lock is involved.
#[derive(Debug, Default)]
pub struct PredecessorTable {
    table: RefCell<FxHashMap<CandidateId, CandidateId>>,
}

impl PredecessorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `of` was reached from `predecessor`.
    pub fn assign(&self, of: CandidateId, predecessor: CandidateId) {
        self.table.borrow_mut().insert(of, predecessor);
    }
}

impl ViterbiLookup for PredecessorTable {
    #[inline]
    fn predecessor(&self, id: CandidateId) -> Option<CandidateId> {
        self.table.borrow().get(&id).copied()
    }
}
