//! Open and closed sets for one search.
//!
//! Nodes live in a flat table indexed like the grid. The open set is a
//! min-heap of `(rank, seq)` entries with lazy deletion: improving a node
//! pushes a fresh entry with a new sequence number and the node remembers
//! which sequence is live, so older entries are skipped when popped.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::strategy::Rank;

/// Where a cell stands in the search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    Unseen,
    Open,
    Closed,
}

/// Per-cell search record.
#[derive(Copy, Clone, Debug)]
pub struct Node {
    pub g: f64,
    pub h: f64,
    pub f: f64,
    /// Index of the predecessor on the best known path, `None` for the
    /// start.
    pub parent: Option<usize>,
    pub mark: Mark,
    /// Sequence number of this node's live heap entry.
    seq: u64,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: None,
            mark: Mark::Unseen,
            seq: 0,
        }
    }
}

/// What [`SearchFrontier::push`] did with a candidate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pushed {
    Inserted,
    Improved,
    Ignored,
}

impl Pushed {
    #[inline]
    pub fn changed(self) -> bool {
        self != Self::Ignored
    }
}

// ---------------------------------------------------------------------------
// Heap entry
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug)]
struct Entry {
    rank: Rank,
    /// Monotonically increasing; lower means inserted earlier.
    seq: u64,
    idx: usize,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Natural order: smaller rank first, then earlier insertion. The heap
    // wraps entries in `Reverse` to pop the smallest.
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank).then(self.seq.cmp(&other.seq))
    }
}

// ---------------------------------------------------------------------------
// SearchFrontier
// ---------------------------------------------------------------------------

/// The open set (priority queue with decrease-key) and closed set of a
/// single search. A cell is never open and closed at the same time, and a
/// closed cell is never reopened.
#[derive(Clone, Debug)]
pub struct SearchFrontier {
    nodes: Vec<Node>,
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
    open_len: usize,
    /// Closed cells in the order they were finalized.
    closed: Vec<usize>,
}

impl SearchFrontier {
    /// An empty frontier over `len` cells.
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![Node::default(); len],
            heap: BinaryHeap::new(),
            next_seq: 0,
            open_len: 0,
            closed: Vec::new(),
        }
    }

    /// Forget every node, keeping allocations.
    pub fn clear(&mut self) {
        self.nodes.fill(Node::default());
        self.heap.clear();
        self.next_seq = 0;
        self.open_len = 0;
        self.closed.clear();
    }

    #[inline]
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    #[inline]
    pub fn mark(&self, idx: usize) -> Mark {
        self.nodes[idx].mark
    }

    #[inline]
    pub fn is_closed(&self, idx: usize) -> bool {
        self.nodes[idx].mark == Mark::Closed
    }

    /// Number of cells currently open.
    #[inline]
    pub fn open_len(&self) -> usize {
        self.open_len
    }

    #[inline]
    pub fn is_open_empty(&self) -> bool {
        self.open_len == 0
    }

    /// Closed cells in finalization order.
    #[inline]
    pub fn closed(&self) -> &[usize] {
        &self.closed
    }

    /// Offer `idx` with cost-so-far `g`.
    ///
    /// An unseen cell is inserted. An open cell is updated only if `g` is
    /// strictly lower than its recorded cost. Closed cells are never
    /// touched.
    pub fn push(
        &mut self,
        idx: usize,
        g: f64,
        h: f64,
        f: f64,
        rank: Rank,
        parent: Option<usize>,
    ) -> Pushed {
        let node = &mut self.nodes[idx];
        let outcome = match node.mark {
            Mark::Closed => return Pushed::Ignored,
            Mark::Open if g >= node.g => return Pushed::Ignored,
            Mark::Open => Pushed::Improved,
            Mark::Unseen => Pushed::Inserted,
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        *node = Node {
            g,
            h,
            f,
            parent,
            mark: Mark::Open,
            seq,
        };
        if outcome == Pushed::Inserted {
            self.open_len += 1;
        }
        self.heap.push(Reverse(Entry { rank, seq, idx }));
        outcome
    }

    /// Pop the best open node, close it and return its index.
    ///
    /// Stale entries left behind by improvements are discarded on the way.
    pub fn pop(&mut self) -> Option<usize> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            let node = &mut self.nodes[entry.idx];
            if node.mark != Mark::Open || node.seq != entry.seq {
                continue;
            }
            node.mark = Mark::Closed;
            self.open_len -= 1;
            self.closed.push(entry.idx);
            return Some(entry.idx);
        }
        None
    }

    /// Recompute `h`, `f` and the rank of every open node and rebuild the
    /// heap. Sequence numbers are kept, so insertion order still breaks
    /// ties.
    pub fn reprioritize(&mut self, mut rescore: impl FnMut(usize, &Node) -> (f64, f64, Rank)) {
        let mut entries = Vec::with_capacity(self.open_len);
        for (idx, node) in self.nodes.iter_mut().enumerate() {
            if node.mark != Mark::Open {
                continue;
            }
            let (h, f, rank) = rescore(idx, node);
            node.h = h;
            node.f = f;
            entries.push(Reverse(Entry {
                rank,
                seq: node.seq,
                idx,
            }));
        }
        self.heap = BinaryHeap::from(entries);
    }

    /// Live open nodes in the order they would be popped.
    pub fn open_entries(&self) -> Vec<(usize, &Node)> {
        let mut live: Vec<&Entry> = self
            .heap
            .iter()
            .map(|Reverse(e)| e)
            .filter(|e| {
                let n = &self.nodes[e.idx];
                n.mark == Mark::Open && n.seq == e.seq
            })
            .collect();
        live.sort();
        live.into_iter()
            .map(|e| (e.idx, &self.nodes[e.idx]))
            .collect()
    }

    /// Follow parent links from `idx` back to the root and return the chain
    /// root-first.
    pub fn path_to(&self, idx: usize) -> Vec<usize> {
        let mut path = vec![idx];
        let mut cur = self.nodes[idx].parent;
        while let Some(p) = cur {
            // Parents always point at closed nodes, which never change, so
            // the chain cannot loop. Bound it anyway.
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(p);
            cur = self.nodes[p].parent;
        }
        path.reverse();
        path
    }
}
