//! In-memory question cache
//!
//! Holds at most one [`QuestionSet`]. Every operation replaces or reads the
//! whole value under a short-lived lock, so readers never observe a partially
//! built set. Each invalidation bumps an epoch; a lazy rebuild that read the
//! epoch before an invalidation cannot repopulate the cache afterwards.

use crate::types::QuestionSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Slot {
    epoch: u64,
    questions: Option<Arc<QuestionSet>>,
}

/// Process-wide cache of the most recently parsed question set
#[derive(Debug, Default)]
pub struct QuestionCache {
    slot: RwLock<Slot>,
}

impl QuestionCache {
    /// Create a cold cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Current question set, `None` when cold
    pub fn get(&self) -> Option<Arc<QuestionSet>> {
        self.read().questions.clone()
    }

    /// Current epoch and question set, read atomically
    pub fn snapshot(&self) -> (u64, Option<Arc<QuestionSet>>) {
        let slot = self.read();
        (slot.epoch, slot.questions.clone())
    }

    /// Whether a question set is held
    pub fn is_warm(&self) -> bool {
        self.read().questions.is_some()
    }

    /// Replace the cached set unconditionally
    pub fn set(&self, questions: QuestionSet) -> Arc<QuestionSet> {
        let questions = Arc::new(questions);
        self.write().questions = Some(questions.clone());
        questions
    }

    /// Replace the cached set only if no invalidation happened since `epoch`
    ///
    /// Returns the stored set, or `None` when the epoch is stale.
    pub fn populate_if(&self, epoch: u64, questions: QuestionSet) -> Option<Arc<QuestionSet>> {
        let mut slot = self.write();
        if slot.epoch != epoch {
            return None;
        }
        let questions = Arc::new(questions);
        slot.questions = Some(questions.clone());
        Some(questions)
    }

    /// Drop the cached set and start a new epoch
    ///
    /// Returns the new epoch.
    pub fn invalidate(&self) -> u64 {
        let mut slot = self.write();
        slot.questions = None;
        slot.epoch = slot.epoch.wrapping_add(1);
        slot.epoch
    }

    // A panic while holding the lock cannot leave a half-written slot: every
    // writer assigns whole fields.
    fn read(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slot> {
        self.slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
