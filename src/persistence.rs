// File: src/persistence.rs
use crate::config::DeckConfig;
use crate::error::{DeckError, Result};
use crate::sources::SourceTables;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

const SNAPSHOT_VERSION: u32 = 2;

/// Content hash of one input file, used to spot stale snapshots.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct InputStamp {
    path: PathBuf,
    len: u64,
    sha256: String,
}

/// The serializable state of a parsed source set.
#[derive(serde::Serialize, serde::Deserialize)]
struct Snapshot {
    version: u32,
    stamps: Vec<InputStamp>,
    tables: SourceTables,
}

fn input_paths(config: &DeckConfig) -> [&Path; 5] {
    [
        config.cedict_path.as_path(),
        config.pinyin_path.as_path(),
        config.css_path.as_path(),
        config.decomposition_path.as_path(),
        config.word_order_path.as_path(),
    ]
}

fn stamps_for(config: &DeckConfig) -> Result<Vec<InputStamp>> {
    input_paths(config)
        .iter()
        .map(|path| {
            let mut file = File::open(path).map_err(|e| DeckError::io(*path, e))?;
            let mut hasher = Sha256::new();
            let len = io::copy(&mut file, &mut hasher).map_err(|e| DeckError::io(*path, e))?;
            Ok(InputStamp {
                path: path.to_path_buf(),
                len,
                sha256: hex::encode(hasher.finalize()),
            })
        })
        .collect()
}

/// Writes `path` through a temp file in the same directory, so readers never
/// see a half-written file.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| DeckError::io(parent_dir, e))?;

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| DeckError::io(parent_dir, e))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush().map_err(|e| DeckError::io(path, e))?;
    }

    temp_file
        .persist(path)
        .map_err(|source| DeckError::Persist { path: path.to_path_buf(), source })?;
    Ok(())
}

pub fn save_snapshot(tables: &SourceTables, config: &DeckConfig, path: &Path) -> Result<()> {
    write_snapshot(tables, stamps_for(config)?, path)
}

fn write_snapshot(tables: &SourceTables, stamps: Vec<InputStamp>, path: &Path) -> Result<()> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        stamps,
        tables: tables.clone(),
    };
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, &snapshot)?))
}

/// Returns the cached tables, or `None` when the snapshot was taken from
/// different input contents or an older layout.
pub fn load_snapshot(config: &DeckConfig, path: &Path) -> Result<Option<SourceTables>> {
    read_snapshot(&stamps_for(config)?, path)
}

fn read_snapshot(stamps: &[InputStamp], path: &Path) -> Result<Option<SourceTables>> {
    let file = File::open(path).map_err(|e| DeckError::io(path, e))?;
    let snapshot: Snapshot = bincode::deserialize_from(BufReader::new(file))?;

    if snapshot.version != SNAPSHOT_VERSION || snapshot.stamps != stamps {
        return Ok(None);
    }
    Ok(Some(snapshot.tables))
}

/// Loads the sources, going through the snapshot at `config.cache_path` when one is set.
/// A missing, stale or unreadable snapshot is rebuilt from the inputs.
/// Every input must be readable before the snapshot is consulted.
pub fn load_or_build(config: &DeckConfig) -> Result<SourceTables> {
    let cache_path = match &config.cache_path {
        Some(path) => path,
        None => return SourceTables::load(config),
    };

    let stamps = stamps_for(config)?;
    if cache_path.exists() {
        match read_snapshot(&stamps, cache_path) {
            Ok(Some(tables)) => {
                info!("using source snapshot '{}'", cache_path.display());
                return Ok(tables);
            }
            Ok(None) => info!("source snapshot '{}' is stale, rebuilding", cache_path.display()),
            Err(e) => warn!("ignoring unreadable snapshot '{}': {}", cache_path.display(), e),
        }
    }

    let tables = SourceTables::load(config)?;
    write_snapshot(&tables, stamps, cache_path)?;
    info!("source snapshot written to '{}'", cache_path.display());
    Ok(tables)
}
