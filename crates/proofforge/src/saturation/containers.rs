//! The three clause pools of the given-clause loop and the store tags
//! that track which pool a clause is in.

use crate::logic::Clause;
use indexmap::IndexSet;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::VecDeque;

/// Where a stored clause currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseStore {
    Unprocessed,
    Passive,
    Active,
    Deleted,
}

impl ClauseStore {
    /// Transitions the saturation loop may perform
    pub fn can_move_to(self, next: ClauseStore) -> bool {
        use ClauseStore::*;
        matches!(
            (self, next),
            (Unprocessed, Passive)
                | (Unprocessed, Deleted)
                | (Passive, Active)
                | (Passive, Deleted)
                | (Active, Deleted)
        )
    }
}

/// Store tag of every clause in the arena
#[derive(Debug, Default)]
pub struct StoreTags {
    tags: Vec<ClauseStore>,
}

impl StoreTags {
    /// Tag a freshly stored clause; ids must be registered in order
    pub fn register(&mut self, id: usize) {
        assert_eq!(id, self.tags.len(), "clause ids must be registered in order");
        self.tags.push(ClauseStore::Unprocessed);
    }

    pub fn get(&self, id: usize) -> ClauseStore {
        self.tags[id]
    }

    /// Moving along an edge not allowed by `ClauseStore::can_move_to` is a logic error.
    pub fn transition(&mut self, id: usize, next: ClauseStore) {
        let current = self.tags[id];
        assert!(
            current.can_move_to(next),
            "illegal store transition of clause {}: {:?} -> {:?}",
            id,
            current,
            next
        );
        self.tags[id] = next;
    }

    pub fn count(&self, store: ClauseStore) -> usize {
        self.tags.iter().filter(|t| **t == store).count()
    }
}

/// Clauses waiting for immediate simplification, in arrival order
#[derive(Debug, Default)]
pub struct UnprocessedContainer {
    queue: VecDeque<usize>,
}

impl UnprocessedContainer {
    pub fn push(&mut self, id: usize) {
        self.queue.push_back(id);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Age/weight queue.
///
/// Keeps one queue ordered by age and one by weight over the same clauses.
/// With ratio `a:w`, a balance counter makes `a` out of every `a + w` picks
/// come from the age queue. Ties are broken by the smaller id.
#[derive(Debug)]
pub struct PassiveContainer {
    by_age: PriorityQueue<usize, Reverse<(usize, usize)>>,
    by_weight: PriorityQueue<usize, Reverse<(usize, usize, usize)>>,
    age_ratio: u32,
    weight_ratio: u32,
    balance: i64,
}

impl PassiveContainer {
    pub fn new(age_ratio: u32, weight_ratio: u32) -> Self {
        assert!(age_ratio > 0 || weight_ratio > 0, "age/weight ratio 0:0");
        PassiveContainer {
            by_age: PriorityQueue::new(),
            by_weight: PriorityQueue::new(),
            age_ratio,
            weight_ratio,
            balance: 0,
        }
    }

    pub fn add(&mut self, clause: &Clause) {
        let id = clause.number();
        self.by_age.push(id, Reverse((clause.age, id)));
        self.by_weight.push(id, Reverse((clause.weight(), clause.age, id)));
    }

    /// Pick the next clause
    pub fn pop_selected(&mut self) -> Option<usize> {
        if self.by_age.is_empty() {
            return None;
        }
        let use_age = self.weight_ratio == 0 || (self.age_ratio > 0 && self.balance <= 0);
        let id = if use_age {
            self.balance += i64::from(self.weight_ratio);
            let (id, _) = self.by_age.pop()?;
            self.by_weight.remove(&id);
            id
        } else {
            self.balance -= i64::from(self.age_ratio);
            let (id, _) = self.by_weight.pop()?;
            self.by_age.remove(&id);
            id
        };
        Some(id)
    }

    pub fn remove(&mut self, id: usize) -> bool {
        let removed = self.by_age.remove(&id).is_some();
        self.by_weight.remove(&id);
        removed
    }

    pub fn len(&self) -> usize {
        self.by_age.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_age.is_empty()
    }
}

/// Clauses that took part in generating inferences, in activation order
#[derive(Debug, Default)]
pub struct ActiveContainer {
    clauses: IndexSet<usize>,
}

impl ActiveContainer {
    pub fn add(&mut self, id: usize) {
        let fresh = self.clauses.insert(id);
        assert!(fresh, "clause {} is already active", id);
    }

    pub fn remove(&mut self, id: usize) {
        let present = self.clauses.shift_remove(&id);
        assert!(present, "clause {} is not active", id);
    }

    pub fn contains(&self, id: usize) -> bool {
        self.clauses.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.clauses.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
