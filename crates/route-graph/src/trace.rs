//! Append-only trace ledger, recording which vertices a search visited and
//! in what order, for animation/playback by a caller.
//!
//! The ledger is a single flat buffer of entries, segmented by `-1`
//! sentinels: each segment starts with the parent vertex a search step
//! expanded from, followed by the children it discovered from that vertex.
//! A segment with no children is just the parent on its own (the next `-1`
//! immediately follows). This mirrors exactly how the reference
//! implementation renders "edges discovered so far" without needing a
//! richer tree structure.

use route_core::{Sizable, VertexId};

const SEPARATOR: i64 = -1;

/// Append-only, replayable record of a search's visitation order.
#[derive(Debug, Default)]
pub struct Trace {
    entries: Vec<i64>,
    current_segment: usize,
    cursor: usize,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new segment: `v` becomes the parent of whatever
    /// [`child`](Self::child) calls follow, until the next `parent` call.
    pub fn parent(&mut self, v: VertexId) -> &mut Self {
        if !self.entries.is_empty() {
            self.entries.push(SEPARATOR);
        }
        self.entries.push(v.0 as i64);
        self
    }

    /// Record `v` as a child discovered from the current segment's parent.
    pub fn child(&mut self, v: VertexId) -> &mut Self {
        self.entries.push(v.0 as i64);
        self
    }

    /// Clear every recorded entry and reset the read cursor.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.current_segment = 0;
        self.cursor = 0;
    }

    /// Parent vertex of the segment currently being read.
    pub fn current(&self) -> VertexId {
        VertexId(self.entries[self.current_segment] as u32)
    }

    /// Next child in the current segment, advancing the read cursor.
    pub fn next(&mut self) -> VertexId {
        let v = self.entries[self.cursor];
        self.cursor += 1;
        VertexId(v as u32)
    }

    /// Advance past the current segment's trailing separator and start
    /// reading the next one.
    pub fn skip(&mut self) {
        self.cursor += 1;
        self.current_segment = self.cursor;
    }

    /// `true` if there is another child to read in the current segment.
    pub fn has_next(&self) -> bool {
        self.cursor < self.entries.len().saturating_sub(1) && self.entries[self.cursor] >= 0
    }

    /// `true` once the read cursor has reached the end of the ledger.
    pub fn consumed(&self) -> bool {
        self.cursor + 4 >= self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Sizable for Trace {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>() + self.entries.len() * std::mem::size_of::<i64>()
    }
}
