// File: src/emitter.rs
//! Packaging of assembled cards into an Anki package (`.apkg`).
//!
//! A package is a zip archive holding `collection.anki2`, a schema-11 SQLite
//! collection with one note model, one deck and one note plus card per
//! [`Card`], and a `media` manifest. Row ids and timestamps are fixed
//! constants, so the same cards always produce the same collection rows.

use crate::config::{DeckSettings, FIELD_NAMES};
use crate::core::types::Card;
use crate::error::{DeckError, Result};
use crate::persistence::write_atomically;
use rusqlite::{params, Connection};
use serde_json::{json, Map, Value};
use sha1::{Digest, Sha1};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const COLLECTION_FILE_NAME: &str = "collection.anki2";
pub const MEDIA_FILE_NAME: &str = "media";

/// Creation time written into the collection, in seconds.
const COLLECTION_CREATED: i64 = 1_411_124_400;
/// Modification time stamped on every row, in seconds.
const ROW_MODIFIED: i64 = 1_425_279_151;
/// First note/card id; later ones count up from here.
const FIRST_ROW_ID: i64 = 1_425_279_151_694;
const FIELD_SEPARATOR: &str = "\u{1f}";

const APKG_SCHEMA: &str = "
CREATE TABLE col (
    id integer primary key, crt integer not null, mod integer not null,
    scm integer not null, ver integer not null, dty integer not null,
    usn integer not null, ls integer not null, conf text not null,
    models text not null, decks text not null, dconf text not null,
    tags text not null
);
CREATE TABLE notes (
    id integer primary key, guid text not null, mid integer not null,
    mod integer not null, usn integer not null, tags text not null,
    flds text not null, sfld integer not null, csum integer not null,
    flags integer not null, data text not null
);
CREATE TABLE cards (
    id integer primary key, nid integer not null, did integer not null,
    ord integer not null, mod integer not null, usn integer not null,
    type integer not null, queue integer not null, due integer not null,
    ivl integer not null, factor integer not null, reps integer not null,
    lapses integer not null, left integer not null, odue integer not null,
    odid integer not null, flags integer not null, data text not null
);
CREATE TABLE revlog (
    id integer primary key, cid integer not null, usn integer not null,
    ease integer not null, ivl integer not null, lastIvl integer not null,
    factor integer not null, time integer not null, type integer not null
);
CREATE TABLE graves (
    usn integer not null, oid integer not null, type integer not null
);
CREATE INDEX ix_notes_usn on notes (usn);
CREATE INDEX ix_cards_usn on cards (usn);
CREATE INDEX ix_revlog_usn on revlog (usn);
CREATE INDEX ix_cards_nid on cards (nid);
CREATE INDEX ix_cards_sched on cards (did, queue, due);
CREATE INDEX ix_revlog_cid on revlog (cid);
CREATE INDEX ix_notes_csum on notes (csum);
";

/// Something that turns the ordered cards into an output package.
pub trait DeckEmitter {
    /// Writes the package and returns the path of the written file.
    fn emit(&self, cards: &[Card], style: &str) -> Result<PathBuf>;
}

/// Writes `.apkg` files Anki imports directly.
pub struct ApkgEmitter {
    output_path: PathBuf,
    settings: DeckSettings,
}

impl ApkgEmitter {
    pub fn new(output_path: impl Into<PathBuf>, settings: DeckSettings) -> Self {
        Self { output_path: output_path.into(), settings }
    }

    /// Fills an empty SQLite file at `path` with the collection.
    pub fn write_collection(&self, path: &Path, cards: &[Card], style: &str) -> Result<()> {
        let mut conn = Connection::open(path)?;
        conn.execute_batch(APKG_SCHEMA)?;

        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO col VALUES (1, ?1, ?2, ?2, 11, 0, 0, 0, ?3, ?4, ?5, ?6, '{}')",
            params![
                COLLECTION_CREATED,
                ROW_MODIFIED * 1000,
                collection_conf(&self.settings).to_string(),
                models_json(&self.settings, style).to_string(),
                decks_json(&self.settings).to_string(),
                deck_conf_json().to_string(),
            ],
        )?;

        {
            let mut insert_note = tx.prepare(
                "INSERT INTO notes VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
            )?;
            let mut insert_card = tx.prepare(
                "INSERT INTO cards VALUES (?1, ?2, ?3, 0, ?4, -1, 0, 0, ?5, 0, 0, 0, 0, 0, 0, 0, 0, '')",
            )?;

            for (position, card) in cards.iter().enumerate() {
                let id = FIRST_ROW_ID + position as i64;
                let sort_field = strip_html(&card.character);
                insert_note.execute(params![
                    id,
                    card.guid,
                    self.settings.model_id,
                    ROW_MODIFIED,
                    card.fields().join(FIELD_SEPARATOR),
                    sort_field,
                    field_checksum(&sort_field),
                ])?;
                // New cards are shown in `due` order, which keeps the word order.
                insert_card.execute(params![
                    id,
                    id,
                    self.settings.deck_id,
                    ROW_MODIFIED,
                    position as i64 + 1
                ])?;
            }
        }
        tx.commit()?;
        debug!("collection holds {} notes", cards.len());
        Ok(())
    }
}

impl DeckEmitter for ApkgEmitter {
    fn emit(&self, cards: &[Card], style: &str) -> Result<PathBuf> {
        let scratch = TempDir::new().map_err(|e| DeckError::io(std::env::temp_dir(), e))?;
        let collection_path = scratch.path().join(COLLECTION_FILE_NAME);
        self.write_collection(&collection_path, cards, style)?;
        let collection =
            fs::read(&collection_path).map_err(|e| DeckError::io(&collection_path, e))?;

        info!("writing {} notes to '{}'", cards.len(), self.output_path.display());
        write_atomically(&self.output_path, |writer| {
            let mut zip = ZipWriter::new(writer);
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

            zip.start_file(COLLECTION_FILE_NAME, options)?;
            zip.write_all(&collection)
                .map_err(|e| DeckError::io(&self.output_path, e))?;
            zip.start_file(MEDIA_FILE_NAME, options)?;
            zip.write_all(b"{}")
                .map_err(|e| DeckError::io(&self.output_path, e))?;
            zip.finish()?;
            Ok(())
        })?;
        Ok(self.output_path.clone())
    }
}

/// Anki's note checksum: the first 8 hex digits of the SHA-1 of the sort field.
pub fn field_checksum(field: &str) -> i64 {
    let digest = Sha1::digest(field.as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn collection_conf(settings: &DeckSettings) -> Value {
    json!({
        "activeDecks": [settings.deck_id],
        "curDeck": settings.deck_id,
        "newSpread": 0,
        "collapseTime": 1200,
        "timeLim": 0,
        "estTimes": true,
        "dueCounts": true,
        "curModel": settings.model_id.to_string(),
        "nextPos": 1,
        "sortType": "noteFld",
        "sortBackwards": false,
        "addToCur": true
    })
}

fn models_json(settings: &DeckSettings, style: &str) -> Value {
    let flds: Vec<Value> = FIELD_NAMES
        .iter()
        .enumerate()
        .map(|(ord, name)| {
            json!({
                "name": name,
                "ord": ord,
                "font": "Liberation Sans",
                "size": 20,
                "media": [],
                "rtl": false,
                "sticky": false
            })
        })
        .collect();

    let model = json!({
        "id": settings.model_id,
        "name": settings.model_name,
        "type": 0,
        "mod": ROW_MODIFIED,
        "usn": -1,
        "sortf": 0,
        "did": settings.deck_id,
        "css": style,
        "flds": flds,
        "tmpls": [{
            "name": settings.template_name,
            "ord": 0,
            "qfmt": settings.front_template,
            "afmt": settings.back_template,
            "bqfmt": "",
            "bafmt": "",
            "did": null
        }],
        "latexPre": "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n",
        "latexPost": "\\end{document}",
        "latexsvg": false,
        "req": [[0, "any", [0]]],
        "tags": [],
        "vers": []
    });
    let mut models = Map::new();
    models.insert(settings.model_id.to_string(), model);
    Value::Object(models)
}

fn deck_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "desc": "",
        "conf": 1,
        "dyn": 0,
        "collapsed": false,
        "browserCollapsed": false,
        "extendNew": 0,
        "extendRev": 50,
        "mod": ROW_MODIFIED,
        "usn": -1,
        "newToday": [0, 0],
        "revToday": [0, 0],
        "lrnToday": [0, 0],
        "timeToday": [0, 0]
    })
}

fn decks_json(settings: &DeckSettings) -> Value {
    let mut decks = Map::new();
    decks.insert("1".to_string(), deck_json(1, "Default"));
    decks.insert(settings.deck_id.to_string(), deck_json(settings.deck_id, &settings.deck_name));
    Value::Object(decks)
}

fn deck_conf_json() -> Value {
    json!({
        "1": {
            "id": 1,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "timer": 0,
            "replayq": true,
            "dyn": false,
            "new": {
                "bury": true,
                "delays": [1, 10],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true
            },
            "lapse": {
                "delays": [10],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100
            }
        }
    })
}
