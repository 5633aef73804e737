use serde_json::{Map, Value};

use crate::behavior::kind::ChannelKind;

/// Hand selector for manual channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Hand {
    /// Left hand.
    #[serde(alias = "left")]
    Left,
    /// Right hand.
    #[serde(alias = "right")]
    Right,
    /// Both hands.
    #[serde(alias = "both")]
    Both,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Blink parameters.
pub struct BlinkPayload {
    /// Closure amount in `[0, 1]`; `None` means a full blink.
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Gaze or head-direction target.
pub struct DirectionPayload {
    /// Named target in the scene.
    pub target: String,
    /// Body parts that follow the gaze (`EYES`, `HEAD`, `NECK`...).
    #[serde(default)]
    pub influence: Option<String>,
    /// Angular offset from the target in degrees.
    #[serde(default)]
    pub offset_angle: Option<f64>,
    /// Direction of `offset_angle`.
    #[serde(default)]
    pub offset_direction: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Head lexeme such as `NOD` or `SHAKE`.
pub struct HeadPayload {
    /// Lexeme name.
    pub lexeme: String,
    /// Number of repetitions after the first stroke.
    #[serde(default)]
    pub repetition: Option<u32>,
    /// Intensity scale.
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One weighted facial lexeme.
pub struct LexemeAmount {
    /// Lexeme name.
    pub lexeme: String,
    /// Intensity scale.
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
/// A single lexeme name or a list of weighted lexemes.
pub enum Lexemes {
    /// `"lexeme": "SMILE"`.
    Single(String),
    /// `"lexeme": [{"lexeme": "SMILE", "amount": 0.5}, ...]`.
    Many(Vec<LexemeAmount>),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Facial expression by lexeme(s).
pub struct FacePayload {
    /// Lexeme(s) to blend.
    pub lexeme: Lexemes,
    /// Intensity scale applied to a single lexeme.
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Facial Action Unit activation.
pub struct FacsPayload {
    /// Action Unit number.
    pub au: u32,
    /// Face side (`LEFT`, `RIGHT`, `BOTH`).
    #[serde(default)]
    pub side: Option<Hand>,
    /// Activation in `[0, 1]`.
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Categorical emotion.
pub struct EmotionPayload {
    /// Emotion label.
    pub emotion: String,
    /// Intensity scale.
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Point in valence/arousal space.
pub struct ValenceArousalPayload {
    /// Valence in `[-1, 1]`.
    pub valence: f64,
    /// Arousal in `[-1, 1]`.
    pub arousal: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Utterance for speech or language generation.
pub struct SpeechPayload {
    /// Text to speak.
    pub text: String,
    /// Optional phoneme string for lip timing.
    #[serde(default)]
    pub phonemes: Option<String>,
    /// Speaking-rate multiplier.
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Posture change.
pub struct PosturePayload {
    /// Posture lexeme.
    #[serde(default)]
    pub lexeme: Option<String>,
    /// Body part restricted by the posture.
    #[serde(default)]
    pub part: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Hand/arm gesture.
pub struct GesturePayload {
    /// Gesture lexeme.
    pub lexeme: String,
    /// Performing hand.
    #[serde(default)]
    pub hand: Option<Hand>,
    /// Intensity scale.
    #[serde(default)]
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Deictic pointing.
pub struct PointingPayload {
    /// Named target in the scene.
    pub target: String,
    /// Performing hand.
    #[serde(default)]
    pub hand: Option<Hand>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Pre-authored clip playback.
pub struct AnimationPayload {
    /// Clip name.
    pub name: String,
    /// Playback rate.
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Channel-specific instruction data, opaque to the scheduler.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    /// Blink.
    Blink(BlinkPayload),
    /// Gaze, GazeShift and HeadDirectionShift.
    Direction(DirectionPayload),
    /// Head lexeme.
    Head(HeadPayload),
    /// Face expression (Face).
    Face(FacePayload),
    /// One facial lexeme (FaceLexeme, FaceShift).
    Lexeme(LexemeAmount),
    /// Action Unit.
    Facs(FacsPayload),
    /// Emotion.
    Emotion(EmotionPayload),
    /// Valence/arousal.
    ValenceArousal(ValenceArousalPayload),
    /// Speech and language generation.
    Speech(SpeechPayload),
    /// Posture.
    Posture(PosturePayload),
    /// Gesture.
    Gesture(GesturePayload),
    /// Pointing.
    Pointing(PointingPayload),
    /// Animation clip.
    Animation(AnimationPayload),
}

impl Payload {
    /// Decode the non-timing fields of an instruction into the payload `kind` expects.
    pub fn decode(kind: ChannelKind, fields: Map<String, Value>) -> serde_json::Result<Self> {
        use ChannelKind::*;
        let v = Value::Object(fields);
        Ok(match kind {
            Blink => Self::Blink(serde_json::from_value(v)?),
            Gaze | GazeShift | HeadDirectionShift => Self::Direction(serde_json::from_value(v)?),
            Head => Self::Head(serde_json::from_value(v)?),
            Face => Self::Face(serde_json::from_value(v)?),
            FaceLexeme | FaceShift => Self::Lexeme(serde_json::from_value(v)?),
            FaceFacs => Self::Facs(serde_json::from_value(v)?),
            FaceEmotion => Self::Emotion(serde_json::from_value(v)?),
            FaceVa => Self::ValenceArousal(serde_json::from_value(v)?),
            Speech | LanguageGeneration => Self::Speech(serde_json::from_value(v)?),
            Posture => Self::Posture(serde_json::from_value(v)?),
            Gesture => Self::Gesture(serde_json::from_value(v)?),
            Pointing => Self::Pointing(serde_json::from_value(v)?),
            Animation => Self::Animation(serde_json::from_value(v)?),
        })
    }

    /// Utterance text, for speech-like payloads.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Speech(s) => Some(&s.text),
            _ => None,
        }
    }

    /// Return `true` when this payload variant is the one `kind` decodes into.
    pub fn matches(&self, kind: ChannelKind) -> bool {
        use ChannelKind::*;
        matches!(
            (kind, self),
            (Blink, Self::Blink(_))
                | (Gaze | GazeShift | HeadDirectionShift, Self::Direction(_))
                | (Head, Self::Head(_))
                | (Face, Self::Face(_))
                | (FaceLexeme | FaceShift, Self::Lexeme(_))
                | (FaceFacs, Self::Facs(_))
                | (FaceEmotion, Self::Emotion(_))
                | (FaceVa, Self::ValenceArousal(_))
                | (Speech | LanguageGeneration, Self::Speech(_))
                | (Posture, Self::Posture(_))
                | (Gesture, Self::Gesture(_))
                | (Pointing, Self::Pointing(_))
                | (Animation, Self::Animation(_))
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/payload.rs"]
mod tests;
