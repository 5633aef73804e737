use crate::{
    behavior::model::{CompositionMode, Instruction, Request, resolve_reference},
    foundation::{arena::Arena, arena::Handle, issue::ScheduleIssue, time::TIME_EPSILON},
    schedule::{
        channels::ChannelTable,
        queue::{ChannelQueue, QueueEntry},
    },
};

/// Project every instruction of an accepted request into its channel queue.
///
/// `request.start_global` must already be assigned. Returns the arena handles of the instructions
/// that made it into a queue.
pub(crate) fn project_request(
    request: Request,
    channels: &mut ChannelTable,
    arena: &mut Arena<Instruction>,
    issues: &mut Vec<ScheduleIssue>,
) -> Vec<Handle> {
    let global_start = request.start_global;
    let mut handles = Vec::with_capacity(request.instructions.len());
    for ins in request.instructions {
        let kind = ins.kind;
        let Some(queue) = channels.queue_mut(kind) else {
            tracing::warn!(%kind, request = %ins.request, "no channel registered; dropping instruction");
            issues.push(ScheduleIssue::UnregisteredChannel { kind });
            continue;
        };
        let Some(ins) = resolve_timing(ins, global_start, issues) else {
            continue;
        };
        let placed = match ins.composition {
            CompositionMode::Overwrite => insert_overwrite(queue, arena, ins, issues),
            _ => Some(insert_ordered(queue, arena, ins)),
        };
        handles.extend(placed);
    }
    handles
}

/// Resolve reference timestamps, assign the global window and make the sync points
/// self-relative.
///
/// When `start` is a reference the remaining points are read relative to it. A reference that
/// resolves before the request start is reported; `start` then falls back to the request start
/// and `end` to its unanchored value.
pub(crate) fn resolve_timing(
    mut ins: Instruction,
    global_start: f64,
    issues: &mut Vec<ScheduleIssue>,
) -> Option<Instruction> {
    let kind = ins.kind;

    if let Some(raw) = ins.anchors.start {
        let mut resolved = resolve_reference(raw, global_start);
        if resolved < 0.0 {
            report_negative(&ins, "start", resolved, issues);
            resolved = 0.0;
        }
        ins.sync.translate(resolved - ins.sync.start);
    }
    if let Some(raw) = ins.anchors.end {
        let resolved = resolve_reference(raw, global_start);
        if resolved < 0.0 {
            report_negative(&ins, "end", resolved, issues);
        } else {
            ins.sync.end = resolved;
        }
    }
    ins.sync.enforce_order();

    ins.start_global = global_start + ins.sync.start;
    ins.end_global = global_start + ins.sync.end;
    if ins.start_global < 0.0 || ins.end_global - ins.start_global <= TIME_EPSILON {
        let detail = format!(
            "resolved window [{}, {}] is empty or negative",
            ins.start_global, ins.end_global
        );
        tracing::warn!(%kind, request = %ins.request, "dropping instruction: {detail}");
        issues.push(ScheduleIssue::MalformedInstruction {
            kind,
            dropped: true,
            detail,
        });
        return None;
    }

    ins.sync.rebase();
    Some(ins)
}

fn report_negative(
    ins: &Instruction,
    field: &'static str,
    resolved: f64,
    issues: &mut Vec<ScheduleIssue>,
) {
    tracing::error!(
        kind = %ins.kind,
        request = %ins.request,
        field,
        resolved,
        "reference timestamp resolved to negative time"
    );
    issues.push(ScheduleIssue::NegativeResolvedTime {
        kind: ins.kind,
        field,
        resolved,
    });
}

/// Sorted insertion for merge/append/replace: after every entry starting at or before the
/// newcomer, so equal starts keep submission order. Queued entries are never altered.
fn insert_ordered(
    queue: &mut ChannelQueue,
    arena: &mut Arena<Instruction>,
    ins: Instruction,
) -> Handle {
    let at = queue.insertion_index(ins.start_global);
    let (request, start_global, end_global) = (ins.request, ins.start_global, ins.end_global);
    let handle = arena.insert(ins);
    queue.insert_at(
        at,
        QueueEntry {
            handle,
            request,
            start_global,
            end_global,
        },
    );
    handle
}

/// Slot fitting for overwrite.
///
/// The instruction is dropped when the entry before its slot still runs at its start; otherwise
/// every later entry it overlaps is evicted and reported.
fn insert_overwrite(
    queue: &mut ChannelQueue,
    arena: &mut Arena<Instruction>,
    ins: Instruction,
    issues: &mut Vec<ScheduleIssue>,
) -> Option<Handle> {
    let at = queue.insertion_index(ins.start_global);
    if at > 0
        && let Some(prev) = queue.get(at - 1)
        && prev.end_global > ins.start_global + TIME_EPSILON
    {
        tracing::warn!(
            kind = %ins.kind,
            request = %ins.request,
            start_global = ins.start_global,
            "overwrite found no free slot; dropping instruction"
        );
        issues.push(ScheduleIssue::ProjectionConflict {
            kind: ins.kind,
            request: ins.request,
            start_global: ins.start_global,
        });
        return None;
    }

    while let Some(next) = queue.get(at)
        && next.start_global < ins.end_global - TIME_EPSILON
    {
        if let Some(evicted) = queue.remove_at(at) {
            arena.remove(evicted.handle);
            tracing::warn!(
                kind = %ins.kind,
                request = %evicted.request,
                by = %ins.request,
                start_global = evicted.start_global,
                "evicted by overwrite"
            );
            issues.push(ScheduleIssue::OverwriteEviction {
                kind: ins.kind,
                evicted: evicted.request,
                start_global: evicted.start_global,
            });
        }
    }

    Some(insert_ordered(queue, arena, ins))
}

/// Overlap scan of every queue, reported as invariant violations.
pub(crate) fn check_invariants(channels: &ChannelTable, issues: &mut Vec<ScheduleIssue>) {
    for queue in channels.queues() {
        for index in queue.overlaps() {
            tracing::error!(kind = %queue.kind(), index, "channel queue overlaps");
            issues.push(ScheduleIssue::InvariantViolation {
                kind: queue.kind(),
                index,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/project.rs"]
mod tests;
