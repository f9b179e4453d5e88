// File: src/config.rs
//! Run configuration. `Default` reproduces the stock deck layout and file locations.

use crate::core::decompose::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CEDICT_PATH: &str = "./data/cedict_ts.u8";
/// Reading table in xpinyin's `Mandarin.dat` layout: one `HEX<TAB>READINGS`
/// line per code point, e.g. `4F11\tXIU1`. The file ships with the xpinyin
/// package (`xpinyin/Mandarin.dat`); any table in that layout works.
pub const PINYIN_PATH: &str = "./data/Mandarin.dat";
pub const CSS_PATH: &str = "style.css";
pub const DECOMPOSITION_PATH: &str = "./data/outlier_decomp.json";
pub const WORD_ORDER_PATH: &str = "./data/loach_word_order.json";
pub const OUTPUT_PATH: &str = "cc.apkg";

/// Candidate readings kept per character.
pub const MAX_RENDERINGS: usize = 2;
/// Dictionary meanings kept per card.
pub const MAX_MEANINGS: usize = 4;
/// A progress line is logged every this many cards.
pub const PROGRESS_EVERY: usize = 100;

pub const FIELD_NAMES: [&str; 5] = ["Character", "Pinyin", "Decomposition", "Pleco Deeplink", "Meaning"];

pub const FRONT_FMT: &str = r#"<div class="chinese">{{Character}}</div>"#;

pub const BACK_FMT: &str = r#"<div class="container">
    {{FrontSide}}
    <div class="reading">{{Pinyin}}</div>
    <div class="decomposition">{{Decomposition}}</div>
    <div class="pleco_deeplink"><a href="{{Pleco Deeplink}}">go to pleco</a></div>
    </br>
    <div id="meaning_button"><button onclick="showMeaning()">show meaning</button></div>
    <div class="meaning" id="meaning">{{Meaning}}</div>
</div>
<script>
function showMeaning() {
    var button_el = document.getElementById("meaning_button");
    button_el.style.display = "none";
    var meaning_el = document.getElementById("meaning");
    meaning_el.style.display = "block";
}
</script>
"#;

/// Identity and templates of the emitted deck. Consumed verbatim by the emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSettings {
    pub deck_id: i64,
    pub deck_name: String,
    pub model_id: i64,
    pub model_name: String,
    pub template_name: String,
    pub front_template: String,
    pub back_template: String,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            deck_id: 1548502343,
            deck_name: "cc".to_string(),
            model_id: 1177587192,
            model_name: "cc model".to_string(),
            template_name: "default".to_string(),
            front_template: FRONT_FMT.to_string(),
            back_template: BACK_FMT.to_string(),
        }
    }
}

/// Where the inputs live and how cards are shaped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckConfig {
    pub cedict_path: PathBuf,
    pub pinyin_path: PathBuf,
    pub css_path: PathBuf,
    pub decomposition_path: PathBuf,
    pub word_order_path: PathBuf,
    /// The `.apkg` file written at the end of the run.
    pub output_path: PathBuf,
    /// Optional bincode snapshot of the parsed sources.
    pub cache_path: Option<PathBuf>,
    pub max_renderings: usize,
    pub max_meanings: usize,
    pub max_depth: usize,
    pub deck: DeckSettings,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            cedict_path: PathBuf::from(CEDICT_PATH),
            pinyin_path: PathBuf::from(PINYIN_PATH),
            css_path: PathBuf::from(CSS_PATH),
            decomposition_path: PathBuf::from(DECOMPOSITION_PATH),
            word_order_path: PathBuf::from(WORD_ORDER_PATH),
            output_path: PathBuf::from(OUTPUT_PATH),
            cache_path: None,
            max_renderings: MAX_RENDERINGS,
            max_meanings: MAX_MEANINGS,
            max_depth: DEFAULT_MAX_DEPTH,
            deck: DeckSettings::default(),
        }
    }
}

impl DeckConfig {
    /// The card-shaping subset of the configuration.
    pub fn card_options(&self) -> CardOptions {
        CardOptions {
            max_renderings: self.max_renderings,
            max_meanings: self.max_meanings,
            max_depth: self.max_depth,
        }
    }
}

/// Caps applied while assembling each card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardOptions {
    pub max_renderings: usize,
    pub max_meanings: usize,
    pub max_depth: usize,
}

impl Default for CardOptions {
    fn default() -> Self {
        DeckConfig::default().card_options()
    }
}
