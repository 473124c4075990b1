use std::collections::VecDeque;

use serde::Serialize;
use signa_types::{render_sequence, Symbol};
use tracing::debug;

/// Immutable copy of the evidence window, safe to hand to other tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BufferSnapshot {
    pub symbols: Vec<Symbol>,
    /// Global index of `symbols[0]` (or of the next symbol when empty).
    pub first_index: u64,
    /// Global index the next appended symbol will receive.
    pub next_index: u64,
    pub capacity: usize,
}

impl BufferSnapshot {
    pub fn literal(&self) -> String {
        render_sequence(&self.symbols)
    }
}

/// Append-only evidence log of confirmed symbols.
///
/// Holds at most `capacity` symbols; overflow drops the oldest. Every
/// appended symbol gets the next value of a session-wide counter, so indices
/// survive truncation and clearing unchanged.
#[derive(Clone, Debug)]
pub struct SequenceBuffer {
    symbols: VecDeque<Symbol>,
    capacity: usize,
    first_index: u64,
    next_index: u64,
    truncated: u64,
}

impl SequenceBuffer {
    /// Create an empty buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            symbols: VecDeque::with_capacity(capacity),
            capacity,
            first_index: 0,
            next_index: 0,
            truncated: 0,
        }
    }

    /// Append a symbol and return the global index it was assigned.
    pub fn append(&mut self, symbol: Symbol) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        self.symbols.push_back(symbol);

        if self.symbols.len() > self.capacity {
            self.symbols.pop_front();
            self.first_index += 1;
            self.truncated += 1;
            debug!(first_index = self.first_index, "evidence window truncated");
        }
        index
    }

    /// Drop every retained symbol. The index counter keeps running.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.first_index = self.next_index;
    }

    /// Global index of the most recently appended symbol still retained.
    pub fn last_index(&self) -> Option<u64> {
        if self.symbols.is_empty() {
            None
        } else {
            Some(self.next_index - 1)
        }
    }

    /// Retained symbols paired with their global indices, oldest first.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (u64, Symbol)> + '_ {
        (self.first_index..).zip(self.symbols.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    pub fn first_index(&self) -> u64 {
        self.first_index
    }

    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total symbols dropped by window truncation (clears not counted).
    pub fn truncated(&self) -> u64 {
        self.truncated
    }

    pub fn literal(&self) -> String {
        self.symbols.iter().map(|s| s.as_char()).collect()
    }

    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            symbols: self.symbols.iter().copied().collect(),
            first_index: self.first_index,
            next_index: self.next_index,
            capacity: self.capacity,
        }
    }
}
