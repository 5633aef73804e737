use std::collections::BTreeMap;

use crate::behavior::kind::ChannelKind;

/// Default sync-point offsets for one channel kind, in seconds after `start`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingDefaults {
    /// `ready` / `attackPeak`.
    #[serde(alias = "attackPeak")]
    pub ready: f64,
    /// Stroke phase start (gesture-like kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_start: Option<f64>,
    /// Stroke (gesture-like kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<f64>,
    /// Stroke phase end (gesture-like kinds only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_end: Option<f64>,
    /// Release onset.
    pub relax: f64,
    /// Instruction end.
    pub end: f64,
}

impl TimingDefaults {
    const fn simple(ready: f64, relax: f64, end: f64) -> Self {
        Self {
            ready,
            stroke_start: None,
            stroke: None,
            stroke_end: None,
            relax,
            end,
        }
    }

    const fn stroked(
        ready: f64,
        stroke_start: f64,
        stroke: f64,
        stroke_end: f64,
        relax: f64,
        end: f64,
    ) -> Self {
        Self {
            ready,
            stroke_start: Some(stroke_start),
            stroke: Some(stroke),
            stroke_end: Some(stroke_end),
            relax,
            end,
        }
    }

    /// Built-in defaults for `kind`.
    ///
    /// Speech-like kinds carry placeholder `relax`/`end`; their real duration is derived from the
    /// utterance text during normalization.
    pub fn builtin(kind: ChannelKind) -> Self {
        use ChannelKind::*;
        match kind {
            Blink => Self::simple(0.25, 0.25, 0.5),
            Gaze | GazeShift => Self::simple(0.33, 0.66, 2.0),
            Head => Self::stroked(0.15, 0.15, 0.5, 0.8, 0.8, 2.0),
            HeadDirectionShift => Self::simple(0.5, 0.5, 1.0),
            Face | FaceLexeme | FaceFacs | FaceEmotion | FaceVa => Self::simple(0.25, 0.75, 1.0),
            FaceShift => Self::simple(0.25, 0.25, 0.5),
            Speech | LanguageGeneration => Self::simple(0.0, 0.5, 0.5),
            Posture => Self::simple(0.5, 1.5, 2.0),
            Gesture => Self::stroked(0.1, 0.2, 0.7, 0.7, 1.4, 1.5),
            Pointing => Self::stroked(0.3, 0.3, 0.6, 0.9, 1.2, 1.5),
            Animation => Self::simple(0.25, 0.75, 1.0),
        }
    }
}

/// Per-kind default timing with optional overrides.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TimingTable {
    overrides: BTreeMap<ChannelKind, TimingDefaults>,
}

impl TimingTable {
    /// Replace the defaults for one kind.
    pub fn with_override(mut self, kind: ChannelKind, defaults: TimingDefaults) -> Self {
        self.overrides.insert(kind, defaults);
        self
    }

    /// Effective defaults for `kind`.
    pub fn get(&self, kind: ChannelKind) -> TimingDefaults {
        self.overrides
            .get(&kind)
            .copied()
            .unwrap_or_else(|| TimingDefaults::builtin(kind))
    }
}
