// File: src/sources.rs
//! Loading of the read-only inputs: dictionary, readings, decompositions,
//! word order and style. Any failure here aborts the run before a card is built.

use crate::config::DeckConfig;
use crate::core::types::{Character, DecompositionTable, Dictionary, PronunciationTable};
use crate::error::{DeckError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Everything the pipeline reads, loaded once and only borrowed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceTables {
    pub dictionary: Dictionary,
    pub pronunciations: PronunciationTable,
    pub decompositions: DecompositionTable,
    pub word_order: Vec<Character>,
    /// Opaque CSS, embedded verbatim into the deck.
    pub style: String,
}

impl SourceTables {
    /// Reads every input named in `config`.
    pub fn load(config: &DeckConfig) -> Result<Self> {
        info!("loading CC-CEDICT");
        let dictionary = read_cedict(&config.cedict_path)?;

        info!("loading pinyin readings");
        let pronunciations = read_pinyin_table(&config.pinyin_path)?;

        info!("loading word order");
        let word_order: Vec<Character> = read_json(&config.word_order_path)?;

        info!("loading css");
        let style = fs::read_to_string(&config.css_path)
            .map_err(|e| DeckError::io(&config.css_path, e))?;

        info!("loading character decompositions");
        let decompositions: DecompositionTable = read_json(&config.decomposition_path)?;

        debug!(
            "sources loaded: {} dictionary entries, {} readings, {} decompositions, {} words",
            dictionary.len(),
            pronunciations.len(),
            decompositions.len(),
            word_order.len()
        );

        Ok(Self { dictionary, pronunciations, decompositions, word_order, style })
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| DeckError::io(path, e))
}

/// Deserializes a whole JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    serde_json::from_reader(open(path)?).map_err(|source| DeckError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_cedict(path: &Path) -> Result<Dictionary> {
    parse_cedict(open(path)?, path)
}

pub fn read_pinyin_table(path: &Path) -> Result<PronunciationTable> {
    parse_pinyin_table(open(path)?, path)
}

/// Parses CC-CEDICT lines of the form `Trad Simp [pin1 yin1] /meaning/meaning/`.
///
/// The index is keyed by the simplified headword. When a headword repeats,
/// the later entry replaces the earlier one.
pub fn parse_cedict<R: BufRead>(reader: R, path: &Path) -> Result<Dictionary> {
    let mut dictionary = Dictionary::new();
    let mut replaced = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DeckError::io(path, e))?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fail = |reason: &str| DeckError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            reason: reason.to_string(),
        };

        let (_traditional, rest) = line.split_once(' ').ok_or_else(|| fail("missing simplified form"))?;
        let (simplified, rest) = rest.split_once(' ').ok_or_else(|| fail("missing pinyin"))?;
        let rest = rest.trim_start();
        if !rest.starts_with('[') {
            return Err(fail("pinyin must be bracketed"));
        }
        let close = rest.find(']').ok_or_else(|| fail("unterminated pinyin"))?;
        let definitions = rest[close + 1..].trim();
        if !definitions.starts_with('/') {
            return Err(fail("definitions must start with '/'"));
        }

        let meanings: Vec<String> = definitions
            .split('/')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();

        if dictionary.insert(simplified.to_string(), meanings).is_some() {
            replaced += 1;
        }
    }

    debug!("{} CC-CEDICT headwords, {} repeated", dictionary.len(), replaced);
    Ok(dictionary)
}

/// Parses `HEX<TAB>READING READING ...` lines, one code point per line, as
/// found in xpinyin's `Mandarin.dat` (`4E50\tLE4 YUE4 YAO4 LAO4`).
/// Readings keep their listed order; it is taken as most likely first.
pub fn parse_pinyin_table<R: BufRead>(reader: R, path: &Path) -> Result<PronunciationTable> {
    let mut table = PronunciationTable::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DeckError::io(path, e))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fail = |reason: String| DeckError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            reason,
        };

        let (code, readings) = line
            .split_once(|c: char| c.is_whitespace())
            .ok_or_else(|| fail("expected a code point followed by readings".to_string()))?;
        let glyph = u32::from_str_radix(code, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| fail(format!("invalid code point '{}'", code)))?;

        let readings: Vec<String> = readings.split_whitespace().map(str::to_lowercase).collect();
        table.entry(glyph).or_default().extend(readings);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CEDICT: &str = "\
# CC-CEDICT
# comment lines are skipped

休 休 [xiu1] /to rest/to stop doing sth for a period of time/to cease/
樂 乐 [le4] /happy/cheerful/
樂 乐 [yue4] /music/
";

    #[test]
    fn cedict_is_keyed_by_simplified_and_later_entries_win() {
        let dict = parse_cedict(Cursor::new(CEDICT), Path::new("cedict")).unwrap();
        assert_eq!(
            dict["休"],
            vec!["to rest", "to stop doing sth for a period of time", "to cease"]
        );
        assert_eq!(dict["乐"], vec!["music"]);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn malformed_cedict_line_reports_its_line() {
        let err = parse_cedict(Cursor::new("休 休 xiu1 /rest/\n"), Path::new("cedict")).unwrap_err();
        match err {
            DeckError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn pinyin_table_lowercases_and_keeps_order() {
        let src = "# readings\n4F11\tXIU1\n4E50\tLE4 YUE4 YAO4\n";
        let table = parse_pinyin_table(Cursor::new(src), Path::new("pinyin")).unwrap();
        assert_eq!(table[&'休'], vec!["xiu1"]);
        assert_eq!(table[&'乐'], vec!["le4", "yue4", "yao4"]);
    }

    #[test]
    fn pinyin_table_rejects_bad_code_point() {
        let err = parse_pinyin_table(Cursor::new("ZZZZ\tXIU1\n"), Path::new("pinyin")).unwrap_err();
        assert!(matches!(err, DeckError::Parse { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_cedict(Path::new("/definitely/not/here.u8")).unwrap_err();
        assert!(matches!(err, DeckError::Io { .. }));
    }
}
