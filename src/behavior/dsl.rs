use serde_json::Value;

use crate::{
    behavior::{
        kind::ChannelKind,
        model::CompositionMode,
        raw::{RawInstruction, RawRequest},
    },
    foundation::error::{GestoError, GestoResult},
};

/// Programmatic builder for [`RawRequest`].
pub struct RequestBuilder {
    composition: CompositionMode,
    start: Option<f64>,
    instructions: Vec<RawInstruction>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    /// Empty merge request.
    pub fn new() -> Self {
        Self {
            composition: CompositionMode::Merge,
            start: None,
            instructions: Vec::new(),
        }
    }

    /// Set the composition mode.
    pub fn composition(mut self, mode: CompositionMode) -> Self {
        self.composition = mode;
        self
    }

    /// Delay the whole request by `secs`.
    pub fn start(mut self, secs: f64) -> Self {
        self.start = Some(secs);
        self
    }

    /// Add one instruction.
    pub fn instruction(mut self, ins: InstructionBuilder) -> Self {
        self.instructions.push(ins.build());
        self
    }

    /// Finish the request. A request without instructions is rejected here rather than at
    /// submission.
    pub fn build(self) -> GestoResult<RawRequest> {
        if self.instructions.is_empty() {
            return Err(GestoError::validation("request has no instructions"));
        }
        Ok(RawRequest {
            composition: self.composition,
            start: self.start,
            instructions: self.instructions,
            ignored_keys: Vec::new(),
        })
    }
}

/// Programmatic builder for one [`RawInstruction`].
pub struct InstructionBuilder {
    raw: RawInstruction,
}

impl InstructionBuilder {
    /// Instruction for `kind` with every timing field defaulted.
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            raw: RawInstruction::new(kind),
        }
    }

    /// `start`; a negative value references absolute time `-secs`.
    pub fn start(mut self, secs: f64) -> Self {
        self.raw.timing.start = Some(secs);
        self
    }

    /// `ready` / `attackPeak`.
    pub fn ready(mut self, secs: f64) -> Self {
        self.raw.timing.ready = Some(secs);
        self
    }

    /// `strokeStart`, `stroke` and `strokeEnd`.
    pub fn stroke(mut self, stroke_start: f64, stroke: f64, stroke_end: f64) -> Self {
        self.raw.timing.stroke_start = Some(stroke_start);
        self.raw.timing.stroke = Some(stroke);
        self.raw.timing.stroke_end = Some(stroke_end);
        self
    }

    /// `relax`.
    pub fn relax(mut self, secs: f64) -> Self {
        self.raw.timing.relax = Some(secs);
        self
    }

    /// `end`; a negative value references absolute time `-secs`.
    pub fn end(mut self, secs: f64) -> Self {
        self.raw.timing.end = Some(secs);
        self
    }

    /// Mark as a shift.
    pub fn shift(mut self, shift: bool) -> Self {
        self.raw.shift = Some(shift);
        self
    }

    /// Set a channel-specific field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw.fields.insert(key.into(), value.into());
        self
    }

    /// Finish the instruction.
    pub fn build(self) -> RawInstruction {
        self.raw
    }
}

/// Gaze toward `target`.
pub fn gaze(target: impl Into<String>) -> InstructionBuilder {
    InstructionBuilder::new(ChannelKind::Gaze).field("target", target.into())
}

/// Blink with default timing.
pub fn blink() -> InstructionBuilder {
    InstructionBuilder::new(ChannelKind::Blink)
}

/// Head lexeme such as `NOD`.
pub fn head(lexeme: impl Into<String>) -> InstructionBuilder {
    InstructionBuilder::new(ChannelKind::Head).field("lexeme", lexeme.into())
}

/// Face lexeme on the `face` channel.
pub fn face(lexeme: impl Into<String>) -> InstructionBuilder {
    InstructionBuilder::new(ChannelKind::Face).field("lexeme", lexeme.into())
}

/// Gesture lexeme.
pub fn gesture(lexeme: impl Into<String>) -> InstructionBuilder {
    InstructionBuilder::new(ChannelKind::Gesture).field("lexeme", lexeme.into())
}

/// Speech utterance.
pub fn speech(text: impl Into<String>) -> InstructionBuilder {
    InstructionBuilder::new(ChannelKind::Speech).field("text", text.into())
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/dsl.rs"]
mod tests;
