use crate::behavior::{kind::ChannelKind, model::RequestId};

/// Non-fatal scheduling diagnostic.
///
/// Issues never abort a submission or a tick; the worst outcome is a dropped or ill-timed
/// instruction. Each issue is logged where it is detected and collected into the
/// [`crate::SubmitReport`] of the submission that caused it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "issue", rename_all = "camelCase")]
pub enum ScheduleIssue {
    /// Timing was coerced to defaults, or the instruction was dropped because it could not be
    /// made well-formed.
    MalformedInstruction {
        /// Channel of the instruction.
        kind: ChannelKind,
        /// `true` when the instruction was dropped.
        dropped: bool,
        /// Human-readable detail.
        detail: String,
    },
    /// No handler is registered for the channel; the instruction was dropped.
    UnregisteredChannel {
        /// Channel of the instruction.
        kind: ChannelKind,
    },
    /// A reference timestamp resolved before the owning request's start.
    NegativeResolvedTime {
        /// Channel of the instruction.
        kind: ChannelKind,
        /// `"start"` or `"end"`.
        field: &'static str,
        /// Resolved request-relative value.
        resolved: f64,
    },
    /// An overwrite instruction found no free slot and was dropped.
    ProjectionConflict {
        /// Channel of the instruction.
        kind: ChannelKind,
        /// Owning request.
        request: RequestId,
        /// Absolute start the instruction asked for.
        start_global: f64,
    },
    /// A queued instruction of another request was evicted by an overwrite.
    OverwriteEviction {
        /// Channel of the evicted instruction.
        kind: ChannelKind,
        /// Request that owned the evicted instruction.
        evicted: RequestId,
        /// Absolute start of the evicted instruction.
        start_global: f64,
    },
    /// A channel queue was found overlapping after projection.
    InvariantViolation {
        /// Channel whose queue overlaps.
        kind: ChannelKind,
        /// Index of the first entry of the overlapping pair.
        index: usize,
    },
}

impl ScheduleIssue {
    /// Channel the issue concerns.
    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::MalformedInstruction { kind, .. }
            | Self::UnregisteredChannel { kind }
            | Self::NegativeResolvedTime { kind, .. }
            | Self::ProjectionConflict { kind, .. }
            | Self::OverwriteEviction { kind, .. }
            | Self::InvariantViolation { kind, .. } => *kind,
        }
    }

    /// Return `true` when the issue meant an instruction was discarded.
    pub fn dropped_instruction(&self) -> bool {
        match self {
            Self::MalformedInstruction { dropped, .. } => *dropped,
            Self::UnregisteredChannel { .. }
            | Self::ProjectionConflict { .. }
            | Self::OverwriteEviction { .. } => true,
            Self::NegativeResolvedTime { .. } | Self::InvariantViolation { .. } => false,
        }
    }
}

impl std::fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInstruction {
                kind,
                dropped,
                detail,
            } => {
                let verb = if *dropped { "dropped" } else { "coerced" };
                write!(f, "malformed {kind} instruction ({verb}): {detail}")
            }
            Self::UnregisteredChannel { kind } => write!(f, "no channel registered for {kind}"),
            Self::NegativeResolvedTime {
                kind,
                field,
                resolved,
            } => write!(f, "{kind} {field} resolved to negative time {resolved}"),
            Self::ProjectionConflict {
                kind,
                request,
                start_global,
            } => write!(
                f,
                "{kind} instruction of request {request} has no slot at {start_global}"
            ),
            Self::OverwriteEviction {
                kind,
                evicted,
                start_global,
            } => write!(
                f,
                "{kind} instruction of request {evicted} at {start_global} evicted by overwrite"
            ),
            Self::InvariantViolation { kind, index } => {
                write!(f, "{kind} queue overlaps at entry {index}")
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/issue.rs"]
mod tests;
