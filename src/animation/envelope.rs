use crate::{
    animation::{ease::Ease, value::Lerp},
    behavior::model::{Instruction, SyncPoints},
};

/// Phase of a [`PhaseEnvelope`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum Phase {
    /// Before `start`; output is the source.
    Wait,
    /// Easing from source to target.
    Attack,
    /// Holding the target.
    Sustain,
    /// Easing from target back to the baseline.
    Release,
    /// Finished; output is the baseline.
    Done,
}

/// The four instants an envelope needs, in seconds of elapsed time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct EnvelopeTiming {
    /// Attack begins.
    pub start: f64,
    /// Attack peak (`ready` / `attackPeak`).
    pub ready: f64,
    /// Release begins.
    pub relax: f64,
    /// Release ends.
    pub end: f64,
}

impl EnvelopeTiming {
    /// Timing starting at zero. Points are forced into `0 <= ready <= relax <= end`.
    pub fn new(ready: f64, relax: f64, end: f64) -> Self {
        let end = end.max(0.0);
        let ready = ready.clamp(0.0, end);
        let relax = relax.clamp(ready, end);
        Self {
            start: 0.0,
            ready,
            relax,
            end,
        }
    }

    /// Envelope timing of a projected instruction.
    pub fn from_sync(sync: &SyncPoints) -> Self {
        let end = sync.end.max(sync.start);
        let ready = sync.ready.clamp(sync.start, end);
        Self {
            start: sync.start,
            ready,
            relax: sync.relax.clamp(ready, end),
            end,
        }
    }

    /// Phase at `elapsed`. Zero-length phases are skipped.
    pub fn phase_at(&self, elapsed: f64) -> Phase {
        if elapsed < self.start {
            Phase::Wait
        } else if elapsed < self.ready {
            Phase::Attack
        } else if elapsed < self.relax {
            Phase::Sustain
        } else if elapsed < self.end {
            Phase::Release
        } else {
            Phase::Done
        }
    }
}

/// Wait/attack/sustain/release/done interpolator a channel renderer runs per instruction.
///
/// The renderer owns the envelope once an instruction has been dispatched and steps it with its
/// own `dt`. With `shift` set, the target becomes the new baseline as soon as the sustain phase
/// is reached, so release and done hold the target instead of reverting.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseEnvelope<T> {
    timing: EnvelopeTiming,
    source: T,
    target: T,
    baseline: T,
    shift: bool,
    ease: Ease,
    elapsed: f64,
}

impl<T: Lerp + Clone> PhaseEnvelope<T> {
    /// Envelope at `elapsed = 0`.
    pub fn new(timing: EnvelopeTiming, source: T, target: T, baseline: T, shift: bool) -> Self {
        Self {
            timing,
            source,
            target,
            baseline,
            shift,
            ease: Ease::default(),
            elapsed: 0.0,
        }
    }

    /// Envelope for a dispatched instruction, taking its timing and shift flag.
    pub fn for_instruction(ins: &Instruction, source: T, target: T, baseline: T) -> Self {
        Self::new(
            EnvelopeTiming::from_sync(&ins.sync),
            source,
            target,
            baseline,
            ins.shift,
        )
    }

    /// Use `ease` for attack and release.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Envelope timing.
    pub fn timing(&self) -> EnvelopeTiming {
        self.timing
    }

    /// Seconds since `start`.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.timing.phase_at(self.elapsed)
    }

    /// Current baseline. For a shift it equals the target once sustain has been reached.
    pub fn baseline(&self) -> &T {
        &self.baseline
    }

    /// Return `true` once `elapsed >= end`.
    pub fn is_done(&self) -> bool {
        self.phase() == Phase::Done
    }

    /// Output at an arbitrary `elapsed`, without touching the envelope state.
    pub fn sample(&self, elapsed: f64) -> T {
        let t = &self.timing;
        let phase = t.phase_at(elapsed);
        let rest = if self.shift && phase >= Phase::Sustain {
            &self.target
        } else {
            &self.baseline
        };
        match phase {
            Phase::Wait => self.source.clone(),
            Phase::Attack => {
                let k = self.ease.apply((elapsed - t.start) / (t.ready - t.start));
                T::lerp(&self.source, &self.target, k)
            }
            Phase::Sustain => self.target.clone(),
            Phase::Release => {
                let k = self.ease.apply((elapsed - t.relax) / (t.end - t.relax));
                T::lerp(&self.target, rest, k)
            }
            Phase::Done => rest.clone(),
        }
    }

    /// Output at the current elapsed time.
    pub fn value(&self) -> T {
        self.sample(self.elapsed)
    }

    /// Step by `dt` seconds and return the new output. Non-positive steps only re-sample.
    pub fn advance(&mut self, dt: f64) -> T {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        if self.shift && self.phase() >= Phase::Sustain {
            self.baseline = self.target.clone();
        }
        self.value()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/envelope.rs"]
mod tests;
