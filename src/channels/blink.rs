use crate::{
    animation::envelope::{EnvelopeTiming, PhaseEnvelope},
    behavior::{kind::ChannelKind, model::Instruction, payload::Payload, timing::TimingDefaults},
    schedule::channels::ChannelHandler,
};

/// Autonomous blink settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoBlink {
    /// Shortest pause between autonomous blinks, in seconds.
    pub min_interval: f64,
    /// Longest pause between autonomous blinks, in seconds.
    pub max_interval: f64,
    /// Jitter seed. Equal seeds give equal blink times.
    pub seed: u64,
}

impl Default for AutoBlink {
    fn default() -> Self {
        Self {
            min_interval: 2.0,
            max_interval: 6.0,
            seed: 0x5EED,
        }
    }
}

/// Proof of ownership of the current auto-blink schedule.
///
/// Only the token returned by the latest [`BlinkChannel::enable_auto`] can cancel it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AutoBlinkToken(u64);

#[derive(Clone, Copy, Debug)]
struct AutoState {
    token: u64,
    next_wake: f64,
}

/// Eyelid closure renderer: `0` open, `1` closed.
///
/// Dispatched blink instructions and autonomous blinks both run a [`PhaseEnvelope`] that starts
/// at the current closure, peaks at the requested amount and releases back to open.
#[derive(Clone, Debug)]
pub struct BlinkChannel {
    config: AutoBlink,
    envelope: Option<PhaseEnvelope<f64>>,
    value: f64,
    now: f64,
    auto: Option<AutoState>,
    tokens: u64,
    rng: u64,
    blinks: u64,
}

impl Default for BlinkChannel {
    fn default() -> Self {
        Self::new(AutoBlink::default())
    }
}

impl BlinkChannel {
    /// Open eyes, autonomous blinking disabled.
    pub fn new(config: AutoBlink) -> Self {
        Self {
            config,
            envelope: None,
            value: 0.0,
            now: 0.0,
            auto: None,
            tokens: 0,
            rng: config.seed,
            blinks: 0,
        }
    }

    /// Current closure.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Return `true` while a blink envelope is running.
    pub fn is_blinking(&self) -> bool {
        self.envelope.is_some()
    }

    /// Blinks started so far, dispatched and autonomous.
    pub fn blinks(&self) -> u64 {
        self.blinks
    }

    /// Time of the next autonomous blink, if armed.
    pub fn next_wake(&self) -> Option<f64> {
        self.auto.map(|a| a.next_wake)
    }

    /// Arm autonomous blinking from `now`, replacing any earlier schedule.
    pub fn enable_auto(&mut self, now: f64) -> AutoBlinkToken {
        self.tokens += 1;
        let next_wake = now + self.next_interval();
        self.auto = Some(AutoState {
            token: self.tokens,
            next_wake,
        });
        tracing::debug!(next_wake, "auto blink armed");
        AutoBlinkToken(self.tokens)
    }

    /// Disarm autonomous blinking. Stale tokens are ignored; returns `true` when disarmed.
    pub fn cancel_auto(&mut self, token: AutoBlinkToken) -> bool {
        match self.auto {
            Some(a) if a.token == token.0 => {
                self.auto = None;
                tracing::debug!("auto blink cancelled");
                true
            }
            _ => false,
        }
    }

    /// Step the running envelope by `dt` and fire an autonomous blink once `now` reaches the next
    /// wake. Returns the closure after the step.
    pub fn update(&mut self, now: f64, dt: f64) -> f64 {
        self.now = now;
        if let Some(env) = &mut self.envelope {
            self.value = env.advance(dt);
            if env.is_done() {
                self.envelope = None;
            }
            return self.value;
        }
        if let Some(auto) = self.auto
            && now >= auto.next_wake
        {
            let timing = Self::default_timing();
            self.start(timing, 1.0);
            let next_wake = now + timing.end + self.next_interval();
            if let Some(a) = &mut self.auto {
                a.next_wake = next_wake;
            }
            tracing::debug!(now, next_wake, "auto blink");
        }
        self.value
    }

    fn default_timing() -> EnvelopeTiming {
        let d = TimingDefaults::builtin(ChannelKind::Blink);
        EnvelopeTiming::new(d.ready, d.relax, d.end)
    }

    fn start(&mut self, timing: EnvelopeTiming, amount: f64) {
        let env = PhaseEnvelope::new(timing, self.value, amount.clamp(0.0, 1.0), 0.0, false);
        self.value = env.value();
        self.envelope = Some(env);
        self.blinks += 1;
    }

    /// Uniform pause in `[min_interval, max_interval]` from a splitmix64 stream.
    fn next_interval(&mut self) -> f64 {
        self.rng = self.rng.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.rng;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        let unit = (z >> 11) as f64 / (1u64 << 53) as f64;
        let lo = self.config.min_interval;
        let hi = self.config.max_interval.max(lo);
        lo + (hi - lo) * unit
    }
}

impl ChannelHandler for BlinkChannel {
    fn dispatch(&mut self, instruction: Instruction) {
        let amount = match &instruction.payload {
            Payload::Blink(p) => p.amount.unwrap_or(1.0),
            _ => 1.0,
        };
        self.start(EnvelopeTiming::from_sync(&instruction.sync), amount);
        if let Some(auto) = &mut self.auto {
            auto.next_wake = auto.next_wake.max(instruction.end_global);
        }
        tracing::debug!(
            request = %instruction.request,
            now = self.now,
            amount,
            "blink"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channels/blink.rs"]
mod tests;
