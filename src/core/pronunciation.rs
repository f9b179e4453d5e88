// File: src/core/pronunciation.rs
use crate::core::converter::ToneMarker;
use crate::core::types::{PronunciationTable, Syllable, Tone};

/// Produces tone-coloured pinyin for a character from a read-only reading table.
pub struct PronunciationAnnotator<'a> {
    table: &'a PronunciationTable,
    marker: ToneMarker,
}

impl<'a> PronunciationAnnotator<'a> {
    pub fn new(table: &'a PronunciationTable) -> Self {
        Self { table, marker: ToneMarker::new() }
    }

    /// Up to `max_renderings` candidate readings, each already wrapped in
    /// `<span class="toneN">` markup and joined by single spaces.
    /// Unknown characters yield an empty list.
    pub fn annotate(&self, character: &str, max_renderings: usize) -> Vec<String> {
        self.candidates(character, max_renderings)
            .iter()
            .map(|syllables| {
                syllables
                    .iter()
                    .map(|s| format!("<span class=\"{}\">{}</span>", s.tone.css_class(), s.marked))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Candidate readings as syllables, in source order.
    ///
    /// Per-glyph readings are combined as a cartesian product with the first
    /// glyph varying slowest. Glyphs missing from the table pass through as a
    /// single neutral syllable, unless no glyph is known at all.
    pub fn candidates(&self, character: &str, max_renderings: usize) -> Vec<Vec<Syllable>> {
        let mut known_any = false;
        let options: Vec<Vec<Syllable>> = character
            .chars()
            .map(|glyph| match self.table.get(&glyph) {
                Some(readings) if !readings.is_empty() => {
                    known_any = true;
                    readings.iter().map(|r| self.syllable(r)).collect()
                }
                _ => vec![Syllable {
                    numeric: glyph.to_string(),
                    marked: glyph.to_string(),
                    tone: Tone::Neutral,
                }],
            })
            .collect();

        if !known_any || max_renderings == 0 {
            return vec![];
        }

        let mut out = Vec::new();
        let mut cursor = vec![0usize; options.len()];
        while out.len() < max_renderings {
            out.push(
                cursor
                    .iter()
                    .zip(&options)
                    .map(|(&i, opts)| opts[i].clone())
                    .collect(),
            );

            // Advance the odometer; the last glyph turns fastest.
            let mut pos = options.len();
            loop {
                if pos == 0 {
                    return out;
                }
                pos -= 1;
                cursor[pos] += 1;
                if cursor[pos] < options[pos].len() {
                    break;
                }
                cursor[pos] = 0;
            }
        }
        out
    }

    fn syllable(&self, reading: &str) -> Syllable {
        let numeric = reading.trim().to_lowercase();
        Syllable {
            marked: self.marker.mark(&numeric),
            tone: Tone::from_numeric(&numeric),
            numeric,
        }
    }
}
