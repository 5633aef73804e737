use crate::foundation::error::{GestoError, GestoResult};

/// Accumulating simulation clock for hosts that step with `dt` instead of absolute time.
///
/// The engine itself never owns a clock; a host keeps one of these and passes `now` explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    /// Clock starting at `now` seconds.
    pub fn starting_at(now: f64) -> Self {
        Self { now: now.max(0.0) }
    }

    /// Current time in seconds.
    pub fn now(self) -> f64 {
        self.now
    }

    /// Advance by `dt` seconds (negative steps are ignored) and return the new time.
    pub fn tick(&mut self, dt: f64) -> f64 {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
        self.now
    }
}

/// Fixed host tick rate used by offline replay.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickRate {
    /// Ticks per second.
    pub hz: f64,
}

impl TickRate {
    /// Create a validated tick rate.
    pub fn new(hz: f64) -> GestoResult<Self> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(GestoError::validation("tick rate must be > 0"));
        }
        Ok(Self { hz })
    }

    /// Duration of one tick in seconds.
    pub fn dt(self) -> f64 {
        1.0 / self.hz
    }

    /// Number of whole ticks needed to cover `secs` (at least one).
    pub fn ticks_for(self, secs: f64) -> u64 {
        (secs.max(0.0) * self.hz).ceil().max(1.0) as u64
    }
}

/// Absolute tolerance used when comparing schedule times.
pub const TIME_EPSILON: f64 = 1e-9;

/// Parse a timing value that may arrive as a JSON number or a numeric string.
pub(crate) fn lenient_secs(v: &serde_json::Value) -> Option<f64> {
    let x = match v {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
