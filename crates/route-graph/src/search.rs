//! Graph search algorithms: [`Dijkstra`], [`AStar`], [`Bfs`], [`Dfs`].
//!
//! Every algorithm records a [`Trace`] of parent/child expansions as it
//! runs (for animated playback) and a [`Counter`] of steps/memory-ops/
//! comparisons (for diagnostics), and produces a `prev` table that
//! [`Search::reconstruct`] walks backwards from target to source. Each also
//! implements [`Sizable`], aggregating its `prev`/distance/visited tables
//! and its frontier container (heap, queue or stack, kept as a struct field
//! rather than a local so its capacity survives past `run()`).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use route_core::{Counter, Sizable, VertexId};

use crate::graph::Graph;
use crate::trace::Trace;
use crate::weights::Weight;

/// Common contract every search algorithm implements.
pub trait Search {
    /// Run the search from `source` toward `target`.
    ///
    /// `break_on_found`: stop as soon as `target` is settled, rather than
    /// exploring the whole reachable graph. Always safe for Dijkstra/A*
    /// (correctness follows from settling nodes in non-decreasing cost
    /// order); for BFS it only gives a shortest-hop-count path; for DFS it
    /// gives *a* path, not necessarily a short one.
    fn run(&mut self, source: VertexId, target: VertexId, break_on_found: bool);

    /// Reconstruct the path from `source` to `target` after [`run`](Self::run).
    ///
    /// Returns the path discovered so far and `true` if it actually reaches
    /// `source` (i.e. a route exists); if `target` was never settled, the
    /// returned path is truncated at the point reconstruction ran out of
    /// `prev` links, and the flag is `false`.
    fn reconstruct(&self, source: VertexId, target: VertexId) -> (Vec<VertexId>, bool) {
        reconstruct_from(self.prev(), source, target)
    }

    fn trace(&self) -> &Trace;
    fn counter(&self) -> &Counter;
    fn prev(&self) -> &[VertexId];
}

fn reconstruct_from(prev: &[VertexId], source: VertexId, target: VertexId) -> (Vec<VertexId>, bool) {
    let mut path = Vec::new();
    let mut u = target;

    loop {
        if u == source {
            path.push(u);
            break;
        }
        if u == VertexId::INVALID {
            path.reverse();
            return (path, false);
        }
        path.push(u);
        u = prev[u.index()];
    }

    path.reverse();
    (path, true)
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Dijkstra's algorithm with a pluggable [`Weight`] function.
///
/// Termination is checked at **pop time**: a candidate popped off the heap
/// that equals `target` is accepted immediately, rather than stopping as
/// soon as `target` is merely pushed. Pop-time termination is required for
/// correctness when duplicate heap entries for the same vertex exist (a
/// push-time check can accept a non-optimal distance).
pub struct Dijkstra<'g> {
    graph: &'g Graph,
    weight: &'g dyn Weight,
    prev: Vec<VertexId>,
    distance: Vec<f32>,
    visited: Vec<bool>,
    pq: BinaryHeap<Reverse<(ordered_f32::OrderedF32, VertexId)>>,
    trace: Trace,
    counter: Counter,
}

impl<'g> Dijkstra<'g> {
    pub fn new(graph: &'g Graph, weight: &'g dyn Weight) -> Self {
        let n = graph.size();
        Self {
            graph,
            weight,
            prev: vec![VertexId::INVALID; n],
            distance: vec![f32::MAX; n],
            visited: vec![false; n],
            pq: BinaryHeap::new(),
            trace: Trace::new(),
            counter: Counter::new(),
        }
    }
}

impl Search for Dijkstra<'_> {
    fn run(&mut self, source: VertexId, target: VertexId, break_on_found: bool) {
        self.distance[source.index()] = 0.0;

        self.pq.push(Reverse((ordered_f32::OrderedF32(0.0), source)));
        self.counter.mem(2);

        while let Some(Reverse((d, current))) = self.pq.pop() {
            let d = d.0;
            self.counter.mem(1);
            self.counter.comp(1);

            if self.visited[current.index()] {
                continue;
            }

            if break_on_found && current == target {
                self.visited[current.index()] = true;
                break;
            }

            self.visited[current.index()] = true;
            self.counter.mem(1);
            self.trace.parent(current);

            let prev_of_current = self.prev[current.index()];
            let prev_opt = if prev_of_current == VertexId::INVALID {
                None
            } else {
                Some(prev_of_current)
            };

            for neighbor in self.graph.adjacent(current) {
                self.trace.child(neighbor);
                self.counter.step(1);
                self.counter.mem(1);

                let w = self.weight.get(self.graph, current, neighbor, prev_opt);

                self.counter.comp(1);
                if d + w < self.distance[neighbor.index()] {
                    self.distance[neighbor.index()] = d + w;
                    self.prev[neighbor.index()] = current;
                    self.pq.push(Reverse((ordered_f32::OrderedF32(d + w), neighbor)));
                    self.counter.mem(3);
                }
            }
        }
    }

    fn trace(&self) -> &Trace {
        &self.trace
    }

    fn counter(&self) -> &Counter {
        &self.counter
    }

    fn prev(&self) -> &[VertexId] {
        &self.prev
    }
}

impl Sizable for Dijkstra<'_> {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.prev.capacity() * std::mem::size_of::<VertexId>()
            + self.distance.capacity() * std::mem::size_of::<f32>()
            + self.visited.capacity() * std::mem::size_of::<bool>()
            + self.pq.capacity() * std::mem::size_of::<Reverse<(ordered_f32::OrderedF32, VertexId)>>()
            + self.trace.size_of()
    }
}

/// Small wrapper giving `f32` a total order so it can sit inside a
/// `BinaryHeap`. Edge weights here are never `NaN`, so `partial_cmp`
/// unwrapping is safe.
mod ordered_f32 {
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct OrderedF32(pub f32);

    impl Eq for OrderedF32 {}

    impl PartialOrd for OrderedF32 {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for OrderedF32 {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
        }
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

/// A* search: a [`Weight`] for edge cost plus a separate [`Weight`] used as
/// the admissible heuristic.
///
/// Unlike [`Dijkstra`], this has no `visited` set — a vertex can be
/// re-opened (pushed again) whenever a cheaper `g_score` is found, which is
/// simpler than maintaining a closed set and correct as long as the
/// heuristic never overestimates.
pub struct AStar<'g> {
    graph: &'g Graph,
    weight: &'g dyn Weight,
    heuristic: &'g dyn Weight,
    prev: Vec<VertexId>,
    g_score: Vec<f32>,
    open_set: BinaryHeap<Reverse<(ordered_f32::OrderedF32, VertexId)>>,
    trace: Trace,
    counter: Counter,
}

impl<'g> AStar<'g> {
    pub fn new(graph: &'g Graph, weight: &'g dyn Weight, heuristic: &'g dyn Weight) -> Self {
        let n = graph.size();
        Self {
            graph,
            weight,
            heuristic,
            prev: vec![VertexId::INVALID; n],
            g_score: vec![-1.0; n],
            open_set: BinaryHeap::new(),
            trace: Trace::new(),
            counter: Counter::new(),
        }
    }
}

impl Search for AStar<'_> {
    fn run(&mut self, source: VertexId, target: VertexId, break_on_found: bool) {
        let h0 = self.heuristic.get(self.graph, source, target, Some(source));
        self.open_set.push(Reverse((ordered_f32::OrderedF32(h0), source)));
        self.g_score[source.index()] = 0.0;
        self.counter.mem(2);

        while let Some(Reverse((_, current))) = self.open_set.pop() {
            self.counter.mem(1);
            self.counter.comp(1);

            if break_on_found && current == target {
                return;
            }

            self.trace.parent(current);

            let prev_of_current = self.prev[current.index()];
            let prev_opt = if prev_of_current == VertexId::INVALID {
                None
            } else {
                Some(prev_of_current)
            };

            for neighbor in self.graph.adjacent(current) {
                self.counter.step(1);

                let w = self.weight.get(self.graph, current, neighbor, prev_opt);
                let tentative_g = self.g_score[current.index()] + w;
                self.counter.mem(2);

                self.counter.comp(1);
                if self.g_score[neighbor.index()] < 0.0 || tentative_g < self.g_score[neighbor.index()] {
                    self.trace.child(neighbor);

                    self.prev[neighbor.index()] = current;
                    self.g_score[neighbor.index()] = tentative_g;

                    let f_score = tentative_g + self.heuristic.get(self.graph, source, target, prev_opt);
                    self.open_set.push(Reverse((ordered_f32::OrderedF32(f_score), neighbor)));
                    self.counter.mem(3);
                }
            }
        }
    }

    fn trace(&self) -> &Trace {
        &self.trace
    }

    fn counter(&self) -> &Counter {
        &self.counter
    }

    fn prev(&self) -> &[VertexId] {
        &self.prev
    }
}

impl Sizable for AStar<'_> {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.prev.capacity() * std::mem::size_of::<VertexId>()
            + self.g_score.capacity() * std::mem::size_of::<f32>()
            + self.open_set.capacity() * std::mem::size_of::<Reverse<(ordered_f32::OrderedF32, VertexId)>>()
            + self.trace.size_of()
    }
}

// ── BFS ───────────────────────────────────────────────────────────────────────

/// Breadth-first search: shortest path by hop count, ignoring edge weights.
pub struct Bfs<'g> {
    graph: &'g Graph,
    prev: Vec<VertexId>,
    visited: Vec<bool>,
    queue: VecDeque<VertexId>,
    trace: Trace,
    counter: Counter,
}

impl<'g> Bfs<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let n = graph.size();
        Self {
            graph,
            prev: vec![VertexId::INVALID; n],
            visited: vec![false; n],
            queue: VecDeque::new(),
            trace: Trace::new(),
            counter: Counter::new(),
        }
    }
}

impl Search for Bfs<'_> {
    fn run(&mut self, source: VertexId, target: VertexId, break_on_found: bool) {
        self.queue.push_back(source);
        self.visited[source.index()] = true;
        self.counter.mem(2);

        while let Some(current) = self.queue.pop_front() {
            self.counter.mem(1);
            self.trace.parent(current);

            self.counter.comp(2);
            if break_on_found && current == target {
                break;
            }

            for neighbor in self.graph.adjacent(current) {
                self.counter.step(1);

                self.counter.comp(1);
                if !self.visited[neighbor.index()] {
                    self.trace.child(neighbor);

                    self.visited[neighbor.index()] = true;
                    self.prev[neighbor.index()] = current;
                    self.queue.push_back(neighbor);
                    self.counter.mem(3);
                }
            }
        }
    }

    fn trace(&self) -> &Trace {
        &self.trace
    }

    fn counter(&self) -> &Counter {
        &self.counter
    }

    fn prev(&self) -> &[VertexId] {
        &self.prev
    }
}

impl Sizable for Bfs<'_> {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.prev.capacity() * std::mem::size_of::<VertexId>()
            + self.visited.capacity() * std::mem::size_of::<bool>()
            + self.queue.capacity() * std::mem::size_of::<VertexId>()
            + self.trace.size_of()
    }
}

// ── DFS ───────────────────────────────────────────────────────────────────────

/// Depth-first search: *a* path to target, with no shortest-path guarantee.
pub struct Dfs<'g> {
    graph: &'g Graph,
    prev: Vec<VertexId>,
    visited: Vec<bool>,
    stack: Vec<VertexId>,
    trace: Trace,
    counter: Counter,
}

impl<'g> Dfs<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let n = graph.size();
        Self {
            graph,
            prev: vec![VertexId::INVALID; n],
            visited: vec![false; n],
            stack: Vec::new(),
            trace: Trace::new(),
            counter: Counter::new(),
        }
    }
}

impl Search for Dfs<'_> {
    fn run(&mut self, source: VertexId, target: VertexId, break_on_found: bool) {
        self.stack.push(source);
        self.visited[source.index()] = true;
        self.counter.mem(2);

        while let Some(current) = self.stack.pop() {
            self.counter.mem(1);
            self.trace.parent(current);

            self.counter.comp(2);
            if break_on_found && current == target {
                break;
            }

            for neighbor in self.graph.adjacent(current) {
                self.counter.step(1);

                self.counter.comp(1);
                if !self.visited[neighbor.index()] {
                    self.trace.child(neighbor);

                    self.visited[neighbor.index()] = true;
                    self.prev[neighbor.index()] = current;
                    self.stack.push(neighbor);
                    self.counter.mem(3);
                }
            }
        }
    }

    fn trace(&self) -> &Trace {
        &self.trace
    }

    fn counter(&self) -> &Counter {
        &self.counter
    }

    fn prev(&self) -> &[VertexId] {
        &self.prev
    }
}

impl Sizable for Dfs<'_> {
    fn size_of(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.prev.capacity() * std::mem::size_of::<VertexId>()
            + self.visited.capacity() * std::mem::size_of::<bool>()
            + self.stack.capacity() * std::mem::size_of::<VertexId>()
            + self.trace.size_of()
    }
}
