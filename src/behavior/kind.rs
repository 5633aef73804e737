/// Closed set of behavior channels a request can address.
///
/// Each kind owns one ordered instruction queue in the engine and is rendered by one registered
/// channel handler.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ChannelKind {
    /// Eyelid blink.
    #[serde(rename = "blink")]
    Blink,
    /// Transient gaze toward a target.
    #[serde(rename = "gaze")]
    Gaze,
    /// Persistent change of the resting gaze direction.
    #[serde(rename = "gazeShift")]
    GazeShift,
    /// Head lexeme (nod, shake, tilt...).
    #[serde(rename = "head")]
    Head,
    /// Persistent change of the resting head direction.
    #[serde(rename = "headDirectionShift")]
    HeadDirectionShift,
    /// Facial expression given by lexemes.
    #[serde(rename = "face")]
    Face,
    /// Single facial lexeme.
    #[serde(rename = "faceLexeme")]
    FaceLexeme,
    /// Facial Action Units.
    #[serde(rename = "faceFACS", alias = "faceFacs")]
    FaceFacs,
    /// Categorical emotion.
    #[serde(rename = "faceEmotion")]
    FaceEmotion,
    /// Valence/arousal expression.
    #[serde(rename = "faceVA", alias = "faceVa")]
    FaceVa,
    /// Persistent change of the resting face.
    #[serde(rename = "faceShift")]
    FaceShift,
    /// Speech with lip timing.
    #[serde(rename = "speech")]
    Speech,
    /// Generated utterance (text handed to a language/speech backend).
    #[serde(rename = "lg", alias = "languageGeneration")]
    LanguageGeneration,
    /// Whole-body posture.
    #[serde(rename = "posture")]
    Posture,
    /// Hand/arm gesture.
    #[serde(rename = "gesture")]
    Gesture,
    /// Deictic pointing.
    #[serde(rename = "pointing")]
    Pointing,
    /// Pre-authored animation clip.
    #[serde(rename = "animation")]
    Animation,
}

impl ChannelKind {
    /// Every kind, in declaration order.
    pub const ALL: [ChannelKind; 17] = [
        Self::Blink,
        Self::Gaze,
        Self::GazeShift,
        Self::Head,
        Self::HeadDirectionShift,
        Self::Face,
        Self::FaceLexeme,
        Self::FaceFacs,
        Self::FaceEmotion,
        Self::FaceVa,
        Self::FaceShift,
        Self::Speech,
        Self::LanguageGeneration,
        Self::Posture,
        Self::Gesture,
        Self::Pointing,
        Self::Animation,
    ];

    /// Key used for this kind in request JSON.
    pub fn key(self) -> &'static str {
        match self {
            Self::Blink => "blink",
            Self::Gaze => "gaze",
            Self::GazeShift => "gazeShift",
            Self::Head => "head",
            Self::HeadDirectionShift => "headDirectionShift",
            Self::Face => "face",
            Self::FaceLexeme => "faceLexeme",
            Self::FaceFacs => "faceFACS",
            Self::FaceEmotion => "faceEmotion",
            Self::FaceVa => "faceVA",
            Self::FaceShift => "faceShift",
            Self::Speech => "speech",
            Self::LanguageGeneration => "lg",
            Self::Posture => "posture",
            Self::Gesture => "gesture",
            Self::Pointing => "pointing",
            Self::Animation => "animation",
        }
    }

    /// Resolve a request JSON key (accepting the same aliases as deserialization).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "faceFacs" => return Some(Self::FaceFacs),
            "faceVa" => return Some(Self::FaceVa),
            "languageGeneration" => return Some(Self::LanguageGeneration),
            _ => {}
        }
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Kinds whose instructions always re-baseline the channel.
    pub fn is_shift(self) -> bool {
        matches!(
            self,
            Self::GazeShift | Self::HeadDirectionShift | Self::FaceShift
        )
    }

    /// Kinds that drive the face.
    pub fn is_face(self) -> bool {
        matches!(
            self,
            Self::Face
                | Self::FaceLexeme
                | Self::FaceFacs
                | Self::FaceEmotion
                | Self::FaceVa
                | Self::FaceShift
        )
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/behavior/kind.rs"]
mod tests;
