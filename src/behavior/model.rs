use crate::behavior::{kind::ChannelKind, payload::Payload};

/// How a new request composes with work already pending.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompositionMode {
    /// Start relative to `now`, alongside everything pending.
    #[default]
    #[serde(alias = "merge", alias = "Merge")]
    Merge,
    /// Start after the last pending request ends.
    #[serde(alias = "append", alias = "Append")]
    Append,
    /// Cancel everything not yet active and start after the active work.
    #[serde(alias = "replace", alias = "Replace")]
    Replace,
    /// Legacy splice-by-end-time with per-channel slot fitting.
    #[serde(alias = "overwrite", alias = "Overwrite")]
    Overwrite,
}

/// Engine-assigned request identifier, unique for the lifetime of a [`crate::Realizer`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Named instants of an instruction's local timeline, in seconds.
///
/// Before projection the points are request-relative; after projection `start == 0` and every
/// other point is an offset from the instruction's `start_global`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPoints {
    /// Start.
    pub start: f64,
    /// `ready` / `attackPeak`.
    pub ready: f64,
    /// Stroke phase start, for kinds that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_start: Option<f64>,
    /// Stroke, for kinds that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<f64>,
    /// Stroke phase end, for kinds that have one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_end: Option<f64>,
    /// Release onset.
    pub relax: f64,
    /// End.
    pub end: f64,
}

impl SyncPoints {
    /// `end - start`.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Interior points in timeline order (`ready`, strokes, `relax`).
    fn interior_mut(&mut self) -> [Option<&mut f64>; 5] {
        [
            Some(&mut self.ready),
            self.stroke_start.as_mut(),
            self.stroke.as_mut(),
            self.stroke_end.as_mut(),
            Some(&mut self.relax),
        ]
    }

    /// Clamp interior points into `[start, end]` as a running maximum.
    pub fn enforce_order(&mut self) {
        if self.end < self.start {
            self.end = self.start;
        }
        let (start, end) = (self.start, self.end);
        let mut floor = start;
        for p in self.interior_mut().into_iter().flatten() {
            *p = p.clamp(floor, end);
            floor = *p;
        }
    }

    /// Return `true` when `start <= ready <= ... <= relax <= end`.
    pub fn is_ordered(&self) -> bool {
        let pts = [
            Some(self.start),
            Some(self.ready),
            self.stroke_start,
            self.stroke,
            self.stroke_end,
            Some(self.relax),
            Some(self.end),
        ];
        let pts: Vec<f64> = pts.into_iter().flatten().collect();
        pts.windows(2).all(|w| w[0] <= w[1])
    }

    /// Move every point by `delta`.
    pub fn translate(&mut self, delta: f64) {
        self.start += delta;
        for p in self.interior_mut().into_iter().flatten() {
            *p += delta;
        }
        self.end += delta;
    }

    /// Re-express every point as an offset from `start` and set `start = 0`.
    ///
    /// Points at or before `start` collapse to 0.
    pub fn rebase(&mut self) {
        let start = self.start;
        for p in self.interior_mut().into_iter().flatten() {
            *p = (*p - start).max(0.0);
        }
        self.end = (self.end - start).max(0.0);
        self.start = 0.0;
    }
}

/// Absolute-time references carried by an instruction.
///
/// On the wire a negative `start`/`end` is not an offset but a reference to the absolute time
/// `-value`; the raw negative value is kept here until projection resolves it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct Anchors {
    /// Raw negative `start`, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// Raw negative `end`, if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

/// Resolve a negative reference timestamp into an offset from `global_start`.
///
/// `value` is the raw negative wire value; the result is `-value - global_start`.
pub fn resolve_reference(value: f64, global_start: f64) -> f64 {
    -value - global_start
}

/// One channel's normalized performance directive.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Channel this instruction drives.
    pub kind: ChannelKind,
    /// Owning request.
    pub request: RequestId,
    /// Local timeline.
    pub sync: SyncPoints,
    /// Absolute-time references awaiting projection.
    #[serde(skip_serializing_if = "is_default_anchors")]
    pub anchors: Anchors,
    /// Channel-specific data.
    pub payload: Payload,
    /// Persistent re-baseline instead of a transient performance.
    pub shift: bool,
    /// Composition mode of the owning request.
    pub composition: CompositionMode,
    /// Absolute start, assigned by projection.
    pub start_global: f64,
    /// Absolute end, assigned by projection.
    pub end_global: f64,
}

fn is_default_anchors(a: &Anchors) -> bool {
    a.start.is_none() && a.end.is_none()
}

impl Instruction {
    /// Global window `[start_global, end_global]`.
    pub fn window(&self) -> (f64, f64) {
        (self.start_global, self.end_global)
    }
}

/// A normalized behavior request.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Engine-assigned identifier.
    pub id: RequestId,
    /// Composition mode.
    pub composition: CompositionMode,
    /// Request-level delay in seconds.
    pub start: f64,
    /// `start` plus the latest instruction end.
    pub end: f64,
    /// Normalized instructions, in request order.
    pub instructions: Vec<Instruction>,
    /// Absolute start, assigned by composition.
    pub start_global: f64,
    /// Absolute end, assigned by composition.
    pub end_global: f64,
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/model.rs"]
mod tests;
