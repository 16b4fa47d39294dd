//! Input and output documents.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use lead_dedup::ChangeLogEntry;
use lead_types::Lead;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{IoError, IoResult};

/// The `{"leads": [...]}` document, as written.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct LeadsDocument<'a> {
    pub leads: &'a [Lead],
}

/// The `{"log": [...]}` document of merge events, as written.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct LogDocument<'a> {
    pub log: &'a [ChangeLogEntry],
}

/// Owned form of [`LeadsDocument`] for reading.
///
/// Every element must be a JSON object; other top-level fields are ignored.
#[derive(Deserialize)]
struct LeadsInput {
    leads: Vec<Lead>,
}

/// Read the `leads` array of the document at `path`.
pub fn read_leads(path: &Path) -> IoResult<Vec<Lead>> {
    let file = File::open(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: LeadsInput =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| IoError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), count = document.leads.len(), "read leads");
    Ok(document.leads)
}

/// Write `{"leads": [...]}` to `path`.
pub fn write_leads(path: &Path, leads: &[Lead]) -> IoResult<()> {
    write_json(path, &LeadsDocument { leads })?;
    debug!(path = %path.display(), count = leads.len(), "wrote leads");
    Ok(())
}

/// Write `{"log": [...]}` to `path`.
pub fn write_log(path: &Path, log: &[ChangeLogEntry]) -> IoResult<()> {
    write_json(path, &LogDocument { log })?;
    debug!(path = %path.display(), count = log.len(), "wrote change log");
    Ok(())
}

/// Pretty-print `value` into a temporary file next to `path`, then move it
/// into place.
fn write_json<T: Serialize>(path: &Path, value: &T) -> IoResult<()> {
    let write_err = |source: std::io::Error| IoError::Write {
        path: path.to_path_buf(),
        source,
    };

    let bytes = serde_json::to_vec_pretty(value).map_err(|source| IoError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(&bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
