// File: src/core/converter.rs
use crate::core::types::Tone;

const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'ü'];

/// Converts numeric-toned pinyin ("xiu1") into its diacritic form ("xiū").
pub struct ToneMarker;

impl ToneMarker {
    pub fn new() -> Self {
        Self
    }

    /// Marks a single syllable. The trailing tone digit, if any, is consumed;
    /// neutral syllables come back unmarked.
    pub fn mark(&self, numeric: &str) -> String {
        let lowered = numeric.to_lowercase();
        let tone = Tone::from_numeric(&lowered);

        let body = match lowered.chars().last() {
            Some(c) if c.is_ascii_digit() => &lowered[..lowered.len() - 1],
            _ => &lowered[..],
        };
        let mut chars: Vec<char> = body.replace("u:", "ü").replace('v', "ü").chars().collect();

        if tone == Tone::Neutral {
            return chars.into_iter().collect();
        }

        if let Some(idx) = self.mark_position(&chars) {
            if let Some(marked) = self.get_marked(chars[idx], tone) {
                chars[idx] = marked;
            }
        }
        chars.into_iter().collect()
    }

    /// 'a' or 'e' always carry the mark, then the 'o' of "ou", then the last vowel.
    fn mark_position(&self, chars: &[char]) -> Option<usize> {
        if let Some(idx) = chars.iter().position(|&c| c == 'a' || c == 'e') {
            return Some(idx);
        }
        if let Some(idx) = chars.windows(2).position(|w| w == ['o', 'u']) {
            return Some(idx);
        }
        chars.iter().rposition(|c| VOWELS.contains(c))
    }

    fn get_marked(&self, vowel: char, tone: Tone) -> Option<char> {
        let row = match vowel {
            'a' => ['ā', 'á', 'ǎ', 'à'],
            'e' => ['ē', 'é', 'ě', 'è'],
            'i' => ['ī', 'í', 'ǐ', 'ì'],
            'o' => ['ō', 'ó', 'ǒ', 'ò'],
            'u' => ['ū', 'ú', 'ǔ', 'ù'],
            'ü' => ['ǖ', 'ǘ', 'ǚ', 'ǜ'],
            _ => return None,
        };
        match tone {
            Tone::First => Some(row[0]),
            Tone::Second => Some(row[1]),
            Tone::Third => Some(row[2]),
            Tone::Fourth => Some(row[3]),
            Tone::Neutral => None,
        }
    }
}

impl Default for ToneMarker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_follow_placement_rule() {
        let marker = ToneMarker::new();
        let cases = [
            ("xiu1", "xiū"),
            ("HAO3", "hǎo"),
            ("lei4", "lèi"),
            ("gou3", "gǒu"),
            ("gui4", "guì"),
            ("ren2", "rén"),
            ("lv4", "lǜ"),
            ("nu:3", "nǚ"),
            ("er2", "ér"),
        ];
        for (numeric, expected) in cases {
            assert_eq!(marker.mark(numeric), expected, "input {}", numeric);
        }
    }

    #[test]
    fn neutral_syllables_are_left_unmarked() {
        let marker = ToneMarker::new();
        assert_eq!(marker.mark("de5"), "de");
        assert_eq!(marker.mark("ma"), "ma");
        assert_eq!(marker.mark("亻"), "亻");
    }

    #[test]
    fn syllable_without_vowel_keeps_its_letters() {
        let marker = ToneMarker::new();
        assert_eq!(marker.mark("m2"), "m");
    }
}
