use crate::{
    behavior::{
        model::{Request, RequestId},
        raw::RawRequest,
    },
    config::RealizerOpts,
    foundation::{error::RejectReason, issue::ScheduleIssue},
    normalize::instruction::normalize_instruction,
};

/// Normalize every instruction of `raw` and derive the request window.
///
/// `end` is the request delay plus the latest instruction end. A request left with no
/// instructions is rejected with [`RejectReason::EmptyRequest`].
pub fn normalize_request(
    raw: &RawRequest,
    id: RequestId,
    opts: &RealizerOpts,
    issues: &mut Vec<ScheduleIssue>,
) -> Result<Request, RejectReason> {
    for key in &raw.ignored_keys {
        tracing::warn!(request = %id, key = %key, "ignoring unknown request key");
    }

    let instructions: Vec<_> = raw
        .instructions
        .iter()
        .filter_map(|ins| normalize_instruction(ins, id, raw.composition, opts, issues))
        .collect();

    let content_end = instructions
        .iter()
        .map(|ins| ins.sync.end)
        .fold(0.0_f64, f64::max);
    if instructions.is_empty() || content_end <= 0.0 {
        tracing::warn!(request = %id, "rejecting request without content");
        return Err(RejectReason::EmptyRequest);
    }

    let start = raw.start.unwrap_or(0.0).max(0.0);
    Ok(Request {
        id,
        composition: raw.composition,
        start,
        end: start + content_end,
        instructions,
        start_global: 0.0,
        end_global: 0.0,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/request.rs"]
mod tests;
