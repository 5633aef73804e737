use std::path::Path;

use anyhow::Context as _;

use crate::{
    behavior::timing::TimingTable,
    foundation::error::{GestoError, GestoResult},
};

/// Engine options.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RealizerOpts {
    /// Scan every channel queue for overlap after each projection.
    pub check_invariants: bool,
    /// Per-kind default timing overrides.
    pub timing: TimingTable,
    /// Speech duration per character of text, in seconds.
    pub speech_secs_per_char: f64,
    /// Lower bound for a text-derived speech duration, in seconds.
    pub min_speech_secs: f64,
}

impl Default for RealizerOpts {
    fn default() -> Self {
        Self {
            check_invariants: cfg!(debug_assertions),
            timing: TimingTable::default(),
            speech_secs_per_char: 0.08,
            min_speech_secs: 0.5,
        }
    }
}

impl RealizerOpts {
    /// Parse options from JSON text.
    pub fn from_json_str(s: &str) -> GestoResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> GestoResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Validate numeric ranges.
    pub fn validate(&self) -> GestoResult<()> {
        if !(self.speech_secs_per_char.is_finite() && self.speech_secs_per_char > 0.0) {
            return Err(GestoError::validation("speechSecsPerChar must be > 0"));
        }
        if !(self.min_speech_secs.is_finite() && self.min_speech_secs >= 0.0) {
            return Err(GestoError::validation("minSpeechSecs must be >= 0"));
        }
        Ok(())
    }

    /// Duration of an utterance of `text`.
    pub fn speech_duration(&self, text: &str) -> f64 {
        let chars = text.chars().filter(|c| !c.is_whitespace()).count() as f64;
        (chars * self.speech_secs_per_char).max(self.min_speech_secs)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
