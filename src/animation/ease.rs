use std::f64::consts::PI;

/// Easing curve applied to the attack and release phases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// `cos(pi*t + pi) * 0.5 + 0.5`: zero velocity at both ends.
    #[default]
    RaisedCosine,
    /// Identity.
    Linear,
    /// Cubic ease-in-out.
    InOutCubic,
}

impl Ease {
    /// Map `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::RaisedCosine => raised_cosine(t),
            Self::Linear => t,
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
        }
    }
}

/// Raised-cosine ease.
pub fn raised_cosine(t: f64) -> f64 {
    (PI * t + PI).cos() * 0.5 + 0.5
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
