use std::path::Path;

use anyhow::Context as _;

use crate::{
    behavior::raw::RawRequest,
    foundation::error::{GestoError, GestoResult},
};

/// One request submitted at a fixed time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptEvent {
    /// Submission time in seconds.
    pub at: f64,
    /// Request to submit.
    pub request: RawRequest,
}

/// Timed sequence of requests, as replayed by the `gesto` CLI.
///
/// JSON shape: `{ "events": [ { "at": 0.0, "request": { ... } }, ... ] }`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Script {
    /// Events, sorted by `at` after loading.
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse and validate a script. Events are stably sorted by `at`.
    pub fn from_json_str(s: &str) -> GestoResult<Self> {
        let mut script: Self = serde_json::from_str(s)?;
        script.validate()?;
        script.events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(script)
    }

    /// Load a script from a JSON file.
    pub fn load(path: &Path) -> GestoResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read script '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check that every event time is finite and non-negative.
    pub fn validate(&self) -> GestoResult<()> {
        for (i, ev) in self.events.iter().enumerate() {
            if !ev.at.is_finite() || ev.at < 0.0 {
                return Err(GestoError::validation(format!(
                    "event {i}: 'at' must be a finite time >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Latest submission time, or 0 for an empty script.
    pub fn last_at(&self) -> f64 {
        self.events.iter().map(|e| e.at).fold(0.0, f64::max)
    }
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
