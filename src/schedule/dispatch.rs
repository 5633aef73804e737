use crate::{
    behavior::model::Instruction, foundation::arena::Arena, schedule::channels::ChannelTable,
};

/// Hand every instruction due at `now` to its channel handler.
///
/// Channels are visited in registration order; within a channel entries leave in queue order.
/// Each instruction is taken out of `arena` as it is handed over, so it can never be dispatched
/// twice. Returns the number of instructions dispatched.
pub(crate) fn dispatch_due(
    channels: &mut ChannelTable,
    arena: &mut Arena<Instruction>,
    now: f64,
) -> usize {
    let mut fired = 0;
    for slot in channels.slots_mut() {
        while let Some(entry) = slot.queue.pop_due(now) {
            let Some(ins) = arena.remove(entry.handle) else {
                tracing::debug!(kind = %slot.queue.kind(), request = %entry.request, "skipping stale queue entry");
                continue;
            };
            tracing::debug!(
                kind = %ins.kind,
                request = %ins.request,
                start_global = ins.start_global,
                end_global = ins.end_global,
                now,
                "dispatch"
            );
            slot.handler.dispatch(ins);
            fired += 1;
        }
    }
    fired
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/dispatch.rs"]
mod tests;
