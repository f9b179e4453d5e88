// File: src/core/engine.rs
use crate::config::{CardOptions, PROGRESS_EVERY};
use crate::core::decompose::DecompositionResolver;
use crate::core::markup::{HtmlListRenderer, MarkupRenderer};
use crate::core::pronunciation::PronunciationAnnotator;
use crate::core::types::{Card, Character};
use crate::error::Result;
use crate::guid::guid_for;
use crate::sources::SourceTables;
use tracing::info;

const MEANING_SEPARATOR: &str = "\n</br>";
const PINYIN_SEPARATOR: &str = ", ";

/// Pleco lookup link for `character`. The character is embedded as-is.
pub fn pleco_deeplink(character: &str) -> String {
    format!(
        "plecoapi://x-callback-url/df?hw={}&sec=dict&x-source=anki&x-success=anki%3A%2F%2F",
        character
    )
}

/// Assembles study cards from a borrowed, read-only set of source tables.
/// Nothing is cached between cards.
pub struct DeckEngine<'a, R = HtmlListRenderer> {
    sources: &'a SourceTables,
    annotator: PronunciationAnnotator<'a>,
    renderer: R,
    options: CardOptions,
}

impl<'a> DeckEngine<'a, HtmlListRenderer> {
    pub fn new(sources: &'a SourceTables, options: CardOptions) -> Self {
        Self::with_renderer(sources, options, HtmlListRenderer)
    }
}

impl<'a, R: MarkupRenderer> DeckEngine<'a, R> {
    pub fn with_renderer(sources: &'a SourceTables, options: CardOptions, renderer: R) -> Self {
        Self {
            sources,
            annotator: PronunciationAnnotator::new(&sources.pronunciations),
            renderer,
            options,
        }
    }

    /// Candidate readings of the whole character, comma separated.
    pub fn pinyin(&self, character: &str) -> String {
        self.annotator
            .annotate(character, self.options.max_renderings)
            .join(PINYIN_SEPARATOR)
    }

    /// The first few dictionary meanings, or an empty string when the
    /// character is not in the dictionary.
    pub fn meaning(&self, character: &str) -> String {
        match self.sources.dictionary.get(character) {
            Some(meanings) => {
                let keep = meanings.len().min(self.options.max_meanings);
                meanings[..keep].join(MEANING_SEPARATOR)
            }
            None => String::new(),
        }
    }

    pub fn decomposition(&self, character: &str) -> Result<String> {
        let resolver = DecompositionResolver::new(
            &self.sources.decompositions,
            &self.annotator,
            self.options.max_renderings,
            self.options.max_depth,
        );
        let tree = resolver.decompose(character)?;
        Ok(self.renderer.render(&tree))
    }

    pub fn assemble(&self, character: &str) -> Result<Card> {
        Ok(Card {
            character: character.to_string(),
            pinyin: self.pinyin(character),
            decomposition: self.decomposition(character)?,
            deeplink: pleco_deeplink(character),
            meaning: self.meaning(character),
            guid: guid_for(&[character]),
        })
    }

    /// One card per entry of `order`, in the same order.
    /// Stops at the first character whose decomposition cannot be resolved.
    pub fn build_cards(&self, order: &[Character]) -> Result<Vec<Card>> {
        let mut cards = Vec::with_capacity(order.len());
        for (i, character) in order.iter().enumerate() {
            cards.push(self.assemble(character)?);

            if i % PROGRESS_EVERY == 0 {
                let percent = ((i + 1) as f64 / order.len() as f64 * 100.0).round();
                info!("{}%: {}", percent, character);
            }
        }
        Ok(cards)
    }

    /// Cards for the loaded word order.
    pub fn build_deck(&self) -> Result<Vec<Card>> {
        self.build_cards(&self.sources.word_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decompose::Decomposition;
    use crate::error::DeckError;

    fn sources() -> SourceTables {
        let mut s = SourceTables::default();
        s.dictionary.insert("休".into(), vec!["to rest".into(), "to stop".into()]);
        s.dictionary.insert(
            "行".into(),
            ["to walk", "to go", "to travel", "a visit", "temporary", "makeshift"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        );
        s.decompositions.insert("休".into(), vec!["亻".into(), "木".into()]);
        s.pronunciations.insert('休', vec!["xiu1".into()]);
        s.pronunciations.insert('木', vec!["mu4".into()]);
        s.pronunciations.insert('行', vec!["xing2".into(), "hang2".into(), "heng2".into()]);
        s.word_order = vec!["休".into()];
        s
    }

    #[test]
    fn end_to_end_card_for_xiu() {
        let s = sources();
        let engine = DeckEngine::new(&s, CardOptions::default());
        let card = engine.assemble("休").unwrap();

        assert_eq!(card.character, "休");
        assert_eq!(card.pinyin, "<span class=\"tone1\">xiū</span>");
        assert_eq!(
            card.decomposition,
            "<ul><li>休</li><ul><li>亻 ()</li><li>木 (<span class=\"tone4\">mù</span>)</li></ul></ul>"
        );
        assert_eq!(card.meaning, "to rest\n</br>to stop");
        assert_eq!(
            card.deeplink,
            "plecoapi://x-callback-url/df?hw=休&sec=dict&x-source=anki&x-success=anki%3A%2F%2F"
        );
        assert_eq!(card.guid, guid_for(&["休"]));
    }

    #[test]
    fn meanings_are_truncated_to_four_in_order() {
        let s = sources();
        let engine = DeckEngine::new(&s, CardOptions::default());
        assert_eq!(
            engine.meaning("行"),
            "to walk\n</br>to go\n</br>to travel\n</br>a visit"
        );
    }

    #[test]
    fn pinyin_candidates_are_capped_and_comma_joined() {
        let s = sources();
        let engine = DeckEngine::new(&s, CardOptions::default());
        assert_eq!(
            engine.pinyin("行"),
            "<span class=\"tone2\">xíng</span>, <span class=\"tone2\">háng</span>"
        );
    }

    #[test]
    fn unknown_character_yields_empty_but_well_formed_fields() {
        let s = sources();
        let engine = DeckEngine::new(&s, CardOptions::default());
        let card = engine.assemble("龘").unwrap();
        assert_eq!(card.pinyin, "");
        assert_eq!(card.meaning, "");
        assert_eq!(card.decomposition, "<ul><li>龘</li></ul>");
    }

    #[test]
    fn empty_order_builds_no_cards() {
        let s = sources();
        let engine = DeckEngine::new(&s, CardOptions::default());
        assert!(engine.build_cards(&[]).unwrap().is_empty());
    }

    #[test]
    fn repeated_builds_are_identical() {
        let s = sources();
        let engine = DeckEngine::new(&s, CardOptions::default());
        let order: Vec<Character> = vec!["休".into(), "行".into(), "木".into()];
        assert_eq!(engine.build_cards(&order).unwrap(), engine.build_cards(&order).unwrap());
    }

    #[test]
    fn cyclic_table_fails_the_build() {
        let mut s = sources();
        s.decompositions.insert("木".into(), vec!["休".into()]);
        let engine = DeckEngine::new(&s, CardOptions::default());
        assert!(matches!(
            engine.build_deck(),
            Err(DeckError::DecompositionCycle { .. })
        ));
    }

    struct GlyphCount;

    impl MarkupRenderer for GlyphCount {
        fn render(&self, decomposition: &Decomposition) -> String {
            decomposition.component_count().to_string()
        }
    }

    #[test]
    fn renderer_is_swappable() {
        let s = sources();
        let engine = DeckEngine::with_renderer(&s, CardOptions::default(), GlyphCount);
        assert_eq!(engine.decomposition("休").unwrap(), "2");
    }
}
