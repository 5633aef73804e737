use std::collections::VecDeque;

use crate::{
    behavior::{
        kind::ChannelKind,
        model::{Instruction, RequestId},
    },
    foundation::{arena::Arena, arena::Handle, time::TIME_EPSILON},
};

/// One scheduled instruction as seen by its channel queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueueEntry {
    /// Arena handle of the instruction.
    pub handle: Handle,
    /// Owning request.
    pub request: RequestId,
    /// Absolute start.
    pub start_global: f64,
    /// Absolute end.
    pub end_global: f64,
}

/// Per-channel queue of projected instructions, ascending by `start_global`.
///
/// Entries with equal starts keep insertion order, which is also their dispatch order.
#[derive(Clone, Debug)]
pub struct ChannelQueue {
    kind: ChannelKind,
    entries: VecDeque<QueueEntry>,
}

impl ChannelQueue {
    /// Empty queue for `kind`.
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            entries: VecDeque::new(),
        }
    }

    /// Channel served by this queue.
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// Start of the head entry.
    pub fn next_start(&self) -> Option<f64> {
        self.entries.front().map(|e| e.start_global)
    }

    /// Position a new entry starting at `start_global` takes: scanning from the tail, right after
    /// the first entry whose start is `<=` it.
    pub fn insertion_index(&self, start_global: f64) -> usize {
        self.entries
            .iter()
            .rposition(|e| e.start_global <= start_global)
            .map_or(0, |i| i + 1)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    pub(crate) fn insert_at(&mut self, index: usize, entry: QueueEntry) {
        self.entries.insert(index, entry);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Option<QueueEntry> {
        self.entries.remove(index)
    }

    /// Pop the head if it is due at `now`.
    pub(crate) fn pop_due(&mut self, now: f64) -> Option<QueueEntry> {
        if self.entries.front()?.start_global <= now {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Rebuild the queue keeping only entries whose instruction is still live in `arena`.
    pub(crate) fn retain_live(&mut self, arena: &Arena<Instruction>) -> usize {
        let before = self.entries.len();
        self.entries = self
            .entries
            .drain(..)
            .filter(|e| arena.contains(e.handle))
            .collect();
        before - self.entries.len()
    }

    /// Indices `i` where entry `i` still runs when entry `i + 1` starts.
    pub fn overlaps(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for i in 1..self.entries.len() {
            let (prev, next) = (&self.entries[i - 1], &self.entries[i]);
            if prev.end_global > next.start_global + TIME_EPSILON {
                out.push(i - 1);
            }
        }
        out
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/queue.rs"]
mod tests;
