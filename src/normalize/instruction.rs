use crate::{
    behavior::{
        kind::ChannelKind,
        model::{Anchors, CompositionMode, Instruction, RequestId, SyncPoints},
        payload::Payload,
        raw::RawInstruction,
    },
    config::RealizerOpts,
    foundation::issue::ScheduleIssue,
};

/// Fill missing sync points from the per-kind defaults, validate the payload and attach the
/// owning request.
///
/// Returns `None` (after recording a dropping [`ScheduleIssue::MalformedInstruction`]) when the
/// instruction cannot be made well-formed: undecodable payload or zero duration.
pub fn normalize_instruction(
    raw: &RawInstruction,
    request: RequestId,
    composition: CompositionMode,
    opts: &RealizerOpts,
    issues: &mut Vec<ScheduleIssue>,
) -> Option<Instruction> {
    let kind = raw.kind;
    if !raw.non_numeric.is_empty() {
        let detail = format!(
            "non-numeric {} replaced by defaults",
            raw.non_numeric.join(", ")
        );
        tracing::warn!(%kind, %request, "{detail}");
        issues.push(ScheduleIssue::MalformedInstruction {
            kind,
            dropped: false,
            detail,
        });
    }

    let payload = match Payload::decode(kind, raw.fields.clone()) {
        Ok(p) => p,
        Err(e) => {
            return drop_malformed(kind, request, format!("invalid payload: {e}"), issues);
        }
    };

    let mut anchors = Anchors::default();
    let start = match raw.timing.start {
        Some(s) if s < 0.0 => {
            anchors.start = Some(s);
            0.0
        }
        Some(s) => s,
        None => 0.0,
    };
    let explicit_end = match raw.timing.end {
        Some(e) if e < 0.0 => {
            anchors.end = Some(e);
            None
        }
        other => other,
    };

    let sync = fill_sync_points(kind, start, explicit_end, raw, &payload, opts);
    if sync.duration() <= 0.0 {
        return drop_malformed(
            kind,
            request,
            format!("zero duration (start {}, end {})", sync.start, sync.end),
            issues,
        );
    }

    Some(Instruction {
        kind,
        request,
        sync,
        anchors,
        payload,
        shift: kind.is_shift() || raw.shift.unwrap_or(false),
        composition,
        start_global: 0.0,
        end_global: 0.0,
    })
}

fn fill_sync_points(
    kind: ChannelKind,
    start: f64,
    explicit_end: Option<f64>,
    raw: &RawInstruction,
    payload: &Payload,
    opts: &RealizerOpts,
) -> SyncPoints {
    let d = opts.timing.get(kind);
    let t = &raw.timing;
    let offset = |v: f64| start + v;

    let (default_relax, default_end) = match payload.text() {
        Some(text) => {
            let len = opts.speech_duration(text);
            (start + len, start + len)
        }
        None => (offset(d.relax), offset(d.end)),
    };

    let mut sync = SyncPoints {
        start,
        ready: t.ready.unwrap_or(offset(d.ready)),
        stroke_start: t.stroke_start.or(d.stroke_start.map(offset)),
        stroke: t.stroke.or(d.stroke.map(offset)),
        stroke_end: t.stroke_end.or(d.stroke_end.map(offset)),
        relax: t.relax.unwrap_or(default_relax),
        end: explicit_end.unwrap_or(default_end),
    };
    sync.enforce_order();
    sync
}

fn drop_malformed(
    kind: ChannelKind,
    request: RequestId,
    detail: String,
    issues: &mut Vec<ScheduleIssue>,
) -> Option<Instruction> {
    tracing::warn!(%kind, %request, "dropping instruction: {detail}");
    issues.push(ScheduleIssue::MalformedInstruction {
        kind,
        dropped: true,
        detail,
    });
    None
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/instruction.rs"]
mod tests;
