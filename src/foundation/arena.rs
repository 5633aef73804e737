/// Generation-tagged handle into an [`Arena`].
///
/// A handle stays valid until its slot is removed; a reused slot carries a newer generation so
/// stale handles never alias a later value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Slot index (diagnostics only).
    pub fn index(self) -> u32 {
        self.index
    }

    /// Slot generation (diagnostics only).
    pub fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Contiguous slot buffer with generational handles and a free list.
#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` when no value is live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `value` and return its handle.
    pub fn insert(&mut self, value: T) -> Handle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            return Handle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle {
            index,
            generation: 0,
        }
    }

    fn slot(&self, h: Handle) -> Option<&Slot<T>> {
        self.slots
            .get(h.index as usize)
            .filter(|s| s.generation == h.generation)
    }

    /// Return `true` when `h` still refers to a live value.
    pub fn contains(&self, h: Handle) -> bool {
        self.slot(h).is_some_and(|s| s.value.is_some())
    }

    /// Borrow the value behind `h`.
    pub fn get(&self, h: Handle) -> Option<&T> {
        self.slot(h).and_then(|s| s.value.as_ref())
    }

    /// Mutably borrow the value behind `h`.
    pub fn get_mut(&mut self, h: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(h.index as usize)
            .filter(|s| s.generation == h.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// Take the value behind `h` out of the arena. Stale handles return `None`.
    pub fn remove(&mut self, h: Handle) -> Option<T> {
        let slot = self
            .slots
            .get_mut(h.index as usize)
            .filter(|s| s.generation == h.generation)?;
        let value = slot.value.take()?;
        self.free.push(h.index);
        self.len -= 1;
        Some(value)
    }

    /// Drop every value. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                self.free.push(i as u32);
            }
        }
        self.len = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/arena.rs"]
mod tests;
