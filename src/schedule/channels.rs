use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use crate::{
    behavior::{kind::ChannelKind, model::Instruction},
    schedule::queue::ChannelQueue,
};

/// Receiver of dispatched instructions for one channel.
///
/// The engine hands each instruction over exactly once, at or after its `start_global`, and never
/// touches it again. Implementors own whatever envelope state they build from it.
pub trait ChannelHandler {
    /// Take ownership of a due instruction.
    fn dispatch(&mut self, instruction: Instruction);
}

impl<F> ChannelHandler for F
where
    F: FnMut(Instruction),
{
    fn dispatch(&mut self, instruction: Instruction) {
        self(instruction)
    }
}

/// A channel renderer shared between the engine and the host.
///
/// The engine keeps one clone as the registered handler; the host keeps another to update and
/// read the renderer every frame.
pub struct Shared<H>(Rc<RefCell<H>>);

impl<H> Shared<H> {
    /// Wrap a renderer.
    pub fn new(inner: H) -> Self {
        Self(Rc::new(RefCell::new(inner)))
    }

    /// Immutable access.
    pub fn borrow(&self) -> std::cell::Ref<'_, H> {
        self.0.borrow()
    }

    /// Mutable access.
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, H> {
        self.0.borrow_mut()
    }
}

impl<H> Clone for Shared<H> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<H: ChannelHandler> ChannelHandler for Shared<H> {
    fn dispatch(&mut self, instruction: Instruction) {
        self.0.borrow_mut().dispatch(instruction);
    }
}

pub(crate) struct ChannelSlot {
    pub(crate) queue: ChannelQueue,
    pub(crate) handler: Box<dyn ChannelHandler>,
}

/// Registered channels in registration order, each with its queue and handler.
#[derive(Default)]
pub(crate) struct ChannelTable {
    slots: Vec<ChannelSlot>,
    index: BTreeMap<ChannelKind, usize>,
}

impl ChannelTable {
    /// Register `kind`, or swap the handler of an already registered kind in place.
    pub(crate) fn register(&mut self, kind: ChannelKind, handler: Box<dyn ChannelHandler>) {
        if let Some(&i) = self.index.get(&kind) {
            self.slots[i].handler = handler;
            return;
        }
        self.index.insert(kind, self.slots.len());
        self.slots.push(ChannelSlot {
            queue: ChannelQueue::new(kind),
            handler,
        });
    }

    pub(crate) fn is_registered(&self, kind: ChannelKind) -> bool {
        self.index.contains_key(&kind)
    }

    pub(crate) fn queue(&self, kind: ChannelKind) -> Option<&ChannelQueue> {
        self.index.get(&kind).map(|&i| &self.slots[i].queue)
    }

    pub(crate) fn queue_mut(&mut self, kind: ChannelKind) -> Option<&mut ChannelQueue> {
        let i = *self.index.get(&kind)?;
        Some(&mut self.slots[i].queue)
    }

    pub(crate) fn queues(&self) -> impl Iterator<Item = &ChannelQueue> {
        self.slots.iter().map(|s| &s.queue)
    }

    pub(crate) fn queues_mut(&mut self) -> impl Iterator<Item = &mut ChannelQueue> {
        self.slots.iter_mut().map(|s| &mut s.queue)
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut ChannelSlot> {
        self.slots.iter_mut()
    }

    pub(crate) fn kinds(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        self.slots.iter().map(|s| s.queue.kind())
    }
}
