//! Hand seals and the in-progress seal buffer

use serde::{Deserialize, Serialize};

/// One elemental hand seal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SealSymbol {
    Fire,
    Water,
    Thunder,
    Wind,
    Earth,
}

impl SealSymbol {
    pub const ALL: [SealSymbol; 5] = [
        SealSymbol::Fire,
        SealSymbol::Water,
        SealSymbol::Thunder,
        SealSymbol::Wind,
        SealSymbol::Earth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SealSymbol::Fire => "fire",
            SealSymbol::Water => "water",
            SealSymbol::Thunder => "thunder",
            SealSymbol::Wind => "wind",
            SealSymbol::Earth => "earth",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fire" => Some(SealSymbol::Fire),
            "water" => Some(SealSymbol::Water),
            "thunder" | "lightning" => Some(SealSymbol::Thunder),
            "wind" => Some(SealSymbol::Wind),
            "earth" => Some(SealSymbol::Earth),
            _ => None,
        }
    }

    /// Map a recognizer frame to a seal.
    ///
    /// `None` labels and frames below `min_confidence` produce no seal.
    pub fn from_gesture(label: GestureLabel, confidence: f32, min_confidence: f32) -> Option<Self> {
        if confidence < min_confidence {
            return None;
        }
        match label {
            GestureLabel::OpenPalm => Some(SealSymbol::Fire),
            GestureLabel::ClosedFist => Some(SealSymbol::Water),
            GestureLabel::PointingUp => Some(SealSymbol::Thunder),
            GestureLabel::ThumbUp => Some(SealSymbol::Wind),
            GestureLabel::Victory => Some(SealSymbol::Earth),
            GestureLabel::None => None,
        }
    }
}

/// Gesture classes reported by the hand recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureLabel {
    OpenPalm,
    ClosedFist,
    PointingUp,
    ThumbUp,
    Victory,
    None,
}

impl GestureLabel {
    /// Parse the recognizer's category name (`"Open_Palm"`, `"Victory"`, ...).
    /// Unknown categories read as `None`.
    pub fn from_str(s: &str) -> Self {
        match s {
            "Open_Palm" => GestureLabel::OpenPalm,
            "Closed_Fist" => GestureLabel::ClosedFist,
            "Pointing_Up" => GestureLabel::PointingUp,
            "Thumb_Up" => GestureLabel::ThumbUp,
            "Victory" => GestureLabel::Victory,
            _ => GestureLabel::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::OpenPalm => "Open_Palm",
            GestureLabel::ClosedFist => "Closed_Fist",
            GestureLabel::PointingUp => "Pointing_Up",
            GestureLabel::ThumbUp => "Thumb_Up",
            GestureLabel::Victory => "Victory",
            GestureLabel::None => "None",
        }
    }
}

/// Bounded, ordered buffer of the seals formed so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredSequence")]
pub struct SealSequence {
    seals: Vec<SealSymbol>,
    max_len: usize,
}

/// Snapshot form; loading drops seals past the cap
#[derive(Deserialize)]
struct StoredSequence {
    seals: Vec<SealSymbol>,
    max_len: usize,
}

impl From<StoredSequence> for SealSequence {
    fn from(mut stored: StoredSequence) -> Self {
        stored.seals.truncate(stored.max_len);
        Self {
            seals: stored.seals,
            max_len: stored.max_len,
        }
    }
}

impl Default for SealSequence {
    fn default() -> Self {
        Self::new(3)
    }
}

impl SealSequence {
    pub fn new(max_len: usize) -> Self {
        Self {
            seals: Vec::with_capacity(max_len),
            max_len,
        }
    }

    /// Append a seal. Returns false (and changes nothing) when full.
    pub fn add(&mut self, seal: SealSymbol) -> bool {
        if self.is_full() {
            return false;
        }
        self.seals.push(seal);
        true
    }

    /// Pop the most recent seal
    pub fn remove(&mut self) -> Option<SealSymbol> {
        self.seals.pop()
    }

    pub fn clear(&mut self) {
        self.seals.clear();
    }

    pub fn len(&self) -> usize {
        self.seals.len()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn is_full(&self) -> bool {
        self.seals.len() >= self.max_len
    }

    pub fn is_empty(&self) -> bool {
        self.seals.is_empty()
    }

    /// Owned copy of the current seals
    pub fn seals(&self) -> Vec<SealSymbol> {
        self.seals.clone()
    }

    pub fn as_slice(&self) -> &[SealSymbol] {
        &self.seals
    }
}
