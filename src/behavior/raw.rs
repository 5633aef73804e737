use serde_json::{Map, Value};

use crate::{
    behavior::{kind::ChannelKind, model::CompositionMode},
    foundation::error::{GestoError, GestoResult},
    foundation::time::lenient_secs,
};

/// Timing fields as they arrive, before defaults are applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RawTiming {
    /// `start` (negative = absolute reference).
    pub start: Option<f64>,
    /// `ready` or `attackPeak`.
    pub ready: Option<f64>,
    /// `strokeStart`.
    pub stroke_start: Option<f64>,
    /// `stroke`.
    pub stroke: Option<f64>,
    /// `strokeEnd`.
    pub stroke_end: Option<f64>,
    /// `relax`.
    pub relax: Option<f64>,
    /// `end` (negative = absolute reference).
    pub end: Option<f64>,
}

const TIMING_KEYS: [&str; 8] = [
    "start",
    "ready",
    "attackPeak",
    "strokeStart",
    "stroke",
    "strokeEnd",
    "relax",
    "end",
];

impl RawTiming {
    fn slot(&mut self, key: &str) -> Option<&mut Option<f64>> {
        Some(match key {
            "start" => &mut self.start,
            "ready" | "attackPeak" => &mut self.ready,
            "strokeStart" => &mut self.stroke_start,
            "stroke" => &mut self.stroke,
            "strokeEnd" => &mut self.stroke_end,
            "relax" => &mut self.relax,
            "end" => &mut self.end,
            _ => return None,
        })
    }

    fn entries(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("start", self.start),
            ("ready", self.ready),
            ("strokeStart", self.stroke_start),
            ("stroke", self.stroke),
            ("strokeEnd", self.stroke_end),
            ("relax", self.relax),
            ("end", self.end),
        ]
    }
}

/// One channel instruction as submitted.
#[derive(Clone, Debug, PartialEq)]
pub struct RawInstruction {
    /// Addressed channel.
    pub kind: ChannelKind,
    /// Timing fields that parsed as numbers.
    pub timing: RawTiming,
    /// Explicit `shift` flag.
    pub shift: Option<bool>,
    /// Channel-specific fields, decoded into a payload during normalization.
    pub fields: Map<String, Value>,
    /// Timing keys that were present but not numeric.
    pub non_numeric: Vec<String>,
}

impl RawInstruction {
    /// Empty instruction for `kind`.
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            timing: RawTiming::default(),
            shift: None,
            fields: Map::new(),
            non_numeric: Vec::new(),
        }
    }

    /// Split a JSON object into timing, shift flag and payload fields.
    pub fn from_object(kind: ChannelKind, obj: Map<String, Value>) -> Self {
        let mut out = Self::new(kind);
        for (key, value) in obj {
            if TIMING_KEYS.contains(&key.as_str()) {
                let parsed = lenient_secs(&value);
                if parsed.is_none() && !value.is_null() {
                    out.non_numeric.push(key.clone());
                }
                if let Some(slot) = out.timing.slot(&key) {
                    // `ready` wins over `attackPeak` when both are numeric.
                    if slot.is_none() || key != "attackPeak" {
                        *slot = parsed.or(*slot);
                    }
                }
            } else if key == "shift" {
                out.shift = value.as_bool();
            } else {
                out.fields.insert(key, value);
            }
        }
        out
    }

    fn to_object(&self) -> Map<String, Value> {
        let mut obj = self.fields.clone();
        for (key, v) in self.timing.entries() {
            if let Some(v) = v {
                obj.insert(key.to_string(), Value::from(v));
            }
        }
        if let Some(shift) = self.shift {
            obj.insert("shift".to_string(), Value::Bool(shift));
        }
        obj
    }
}

/// A behavior request as submitted: composition mode plus channel instructions.
///
/// Parses from the JSON shape
/// `{ "composition"?: "MERGE"|..., "start"?: secs, "<channel>": {..} | [{..}, ...], ... }`.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RawRequest {
    /// Composition mode.
    pub composition: CompositionMode,
    /// Request-level delay in seconds.
    pub start: Option<f64>,
    /// Instructions grouped by channel key; array entries keep their order.
    pub instructions: Vec<RawInstruction>,
    /// Top-level keys that named no channel.
    pub ignored_keys: Vec<String>,
}

impl RawRequest {
    /// Parse a request from a JSON string.
    pub fn from_json_str(s: &str) -> GestoResult<Self> {
        let v: Value = serde_json::from_str(s)?;
        Self::try_from(v)
    }
}

impl TryFrom<Value> for RawRequest {
    type Error = GestoError;

    fn try_from(v: Value) -> GestoResult<Self> {
        let Value::Object(obj) = v else {
            return Err(GestoError::validation("request must be a JSON object"));
        };
        let mut out = RawRequest::default();
        for (key, value) in obj {
            if key == "composition" {
                out.composition = serde_json::from_value(value)
                    .map_err(|e| GestoError::validation(format!("invalid composition: {e}")))?;
                continue;
            }
            if key == "start" {
                out.start = lenient_secs(&value);
                continue;
            }
            let Some(kind) = ChannelKind::from_key(&key) else {
                out.ignored_keys.push(key);
                continue;
            };
            match value {
                Value::Object(o) => out.instructions.push(RawInstruction::from_object(kind, o)),
                Value::Array(items) => {
                    for item in items {
                        let Value::Object(o) = item else {
                            return Err(GestoError::validation(format!(
                                "'{key}' entries must be objects"
                            )));
                        };
                        out.instructions.push(RawInstruction::from_object(kind, o));
                    }
                }
                _ => {
                    return Err(GestoError::validation(format!(
                        "'{key}' must be an object or an array of objects"
                    )));
                }
            }
        }
        Ok(out)
    }
}

impl From<RawRequest> for Value {
    fn from(r: RawRequest) -> Self {
        let mut obj = Map::new();
        if let Ok(c) = serde_json::to_value(r.composition) {
            obj.insert("composition".to_string(), c);
        }
        if let Some(start) = r.start {
            obj.insert("start".to_string(), Value::from(start));
        }
        for ins in &r.instructions {
            let entry = Value::Object(ins.to_object());
            match obj.get_mut(ins.kind.key()) {
                Some(Value::Array(items)) => items.push(entry),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, entry]);
                }
                None => {
                    obj.insert(ins.kind.key().to_string(), entry);
                }
            }
        }
        Value::Object(obj)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/raw.rs"]
mod tests;
