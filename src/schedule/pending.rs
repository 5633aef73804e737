use crate::{
    behavior::model::{CompositionMode, Request, RequestId},
    foundation::arena::Handle,
};

/// One accepted request as tracked by the [`PendingStack`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEntry {
    /// Request identifier.
    pub id: RequestId,
    /// Composition mode the request was submitted with.
    pub composition: CompositionMode,
    /// Absolute start.
    pub start_global: f64,
    /// Absolute end.
    pub end_global: f64,
    /// Set once `start_global` has been reached by a tick.
    pub active: bool,
    #[serde(skip)]
    pub(crate) handles: Vec<Handle>,
}

impl PendingEntry {
    /// Return `true` when the entry has started by `now`.
    pub fn is_active_at(&self, now: f64) -> bool {
        self.active || self.start_global <= now
    }
}

/// Requests that are accepted but not yet finished, ordered by `start_global`.
///
/// The stack only tracks composition state. Instructions live in the channel queues; an entry
/// keeps their handles so a `Replace` can purge them.
#[derive(Clone, Debug, Default)]
pub struct PendingStack {
    entries: Vec<PendingEntry>,
}

impl PendingStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in stack order.
    pub fn entries(&self) -> &[PendingEntry] {
        &self.entries
    }

    /// Number of tracked requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Global window `request` takes when composed at `now`.
    ///
    /// | mode | base |
    /// |---|---|
    /// | Merge, Overwrite | `now` |
    /// | Append | tail `end_global`, or `now` on an empty stack |
    /// | Replace | latest `end_global` among active entries, or `now` |
    ///
    /// The window is `[base + request.start, base + request.end]`.
    pub fn resolve(&self, request: &Request, now: f64) -> (f64, f64) {
        let base = match request.composition {
            CompositionMode::Merge | CompositionMode::Overwrite => now,
            CompositionMode::Append => self.entries.last().map_or(now, |e| e.end_global),
            CompositionMode::Replace => self
                .entries
                .iter()
                .filter(|e| e.is_active_at(now))
                .map(|e| e.end_global)
                .fold(now, f64::max),
        };
        (base + request.start, base + request.end)
    }

    /// Remove and return every entry that has not started by `now`.
    pub(crate) fn cancel_inactive(&mut self, now: f64) -> Vec<PendingEntry> {
        let (kept, cancelled): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|e| e.is_active_at(now));
        self.entries = kept;
        cancelled
    }

    /// Track a newly projected request.
    pub(crate) fn insert(&mut self, entry: PendingEntry, now: f64) {
        let at = match entry.composition {
            CompositionMode::Merge => self
                .entries
                .iter()
                .rposition(|e| e.start_global <= entry.start_global)
                .map_or(0, |i| i + 1),
            CompositionMode::Append | CompositionMode::Replace => self.entries.len(),
            CompositionMode::Overwrite => {
                let mut at = self.entries.len();
                while at > 0 {
                    let prev = &self.entries[at - 1];
                    if prev.is_active_at(now) || prev.end_global <= entry.end_global {
                        break;
                    }
                    at -= 1;
                }
                at
            }
        };
        self.entries.insert(at, entry);
    }

    /// Mark entries that have started as active and drop those that have ended.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn tick(&mut self, now: f64) -> usize {
        for e in &mut self.entries {
            if !e.active && e.start_global <= now {
                e.active = true;
            }
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.end_global > now);
        before - self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/pending.rs"]
mod tests;
