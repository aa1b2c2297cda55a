//! Lightweight run counters shared by every search algorithm.
//!
//! These exist purely for instrumentation — comparing how many steps/memory
//! operations/comparisons different algorithms or backends spend on the same
//! query. Nothing in the core reads them back to make decisions.

/// Reports an estimate of the heap memory a structure occupies, for
/// diagnostics and the adjacency-matrix size warning.
pub trait Sizable {
    fn size_of(&self) -> usize;
}

/// Step / memory-operation / comparison counters accumulated during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    pub steps: u64,
    pub memops: u64,
    pub comparisons: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Increase number of steps (edges considered).
    pub fn step(&mut self, t: u64) {
        self.steps += t;
    }

    /// Increase number of memory operations. General rule: every write to a
    /// `dist`/`prev`/`visited` array counts as one.
    pub fn mem(&mut self, t: u64) {
        self.memops += t;
    }

    /// Increase number of comparisons (conditional checks).
    pub fn comp(&mut self, t: u64) {
        self.comparisons += t;
    }
}
