// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single Chinese glyph, or a short run of glyphs from the word order.
pub type Character = String;

/// Simplified headword -> ordered meanings.
pub type Dictionary = HashMap<Character, Vec<String>>;

/// Character -> ordered direct components. Order is load-bearing for output.
pub type DecompositionTable = HashMap<Character, Vec<Character>>;

/// Glyph -> numeric-toned readings (e.g. "xiu1"), most likely first.
pub type PronunciationTable = HashMap<char, Vec<String>>;

/// Pitch contour class of a single syllable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    First,
    Second,
    Third,
    Fourth,
    Neutral,
}

impl Tone {
    /// Classifies a numeric-toned syllable by its last character.
    /// Anything other than a trailing '1'..'4' is neutral.
    pub fn from_numeric(syllable: &str) -> Self {
        match syllable.chars().last() {
            Some('1') => Tone::First,
            Some('2') => Tone::Second,
            Some('3') => Tone::Third,
            Some('4') => Tone::Fourth,
            _ => Tone::Neutral,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Tone::First => 1,
            Tone::Second => 2,
            Tone::Third => 3,
            Tone::Fourth => 4,
            Tone::Neutral => 5,
        }
    }

    /// The CSS class the style fragment colours this tone with.
    pub fn css_class(self) -> String {
        format!("tone{}", self.number())
    }
}

/// One syllable of a candidate reading, in both of its parallel forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    pub numeric: String,
    pub marked: String,
    pub tone: Tone,
}

/// The finished study record. Field order matches the note model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub character: Character,
    pub pinyin: String,
    pub decomposition: String,
    pub deeplink: String,
    pub meaning: String,
    /// Content-derived note id, stable across runs.
    pub guid: String,
}

impl Card {
    /// The five note fields in their fixed order.
    pub fn fields(&self) -> [&str; 5] {
        [
            self.character.as_str(),
            self.pinyin.as_str(),
            self.decomposition.as_str(),
            self.deeplink.as_str(),
            self.meaning.as_str(),
        ]
    }
}
