//! Moving and copying files into their destination.
//!
//! Copies are written to a temporary file in the destination directory and
//! renamed into place, so a destination path never holds a partial file.
//! A move removes its source only after the destination exists.

use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use shiwake_core::{Reporter, SortEvent, Transfer};

use crate::OpsError;
use crate::conflict::ConflictDecision;

/// A file that reached its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: PathBuf,
    /// A move fell back to copying and the source could not be removed.
    pub source_retained: bool,
}

/// Carry out a [`ConflictDecision`].
///
/// Returns where the file landed, or `None` for a skip.
pub fn apply(
    decision: &ConflictDecision,
    source: &Path,
    transfer: Transfer,
    reporter: &dyn Reporter,
) -> Result<Option<Placement>, OpsError> {
    let (dest, replace) = match decision {
        ConflictDecision::Skip(_) => return Ok(None),
        ConflictDecision::Place(dest) | ConflictDecision::PlaceAlternate(dest) => (dest, false),
        ConflictDecision::Overwrite(dest) => {
            reporter.report(SortEvent::Overwriting {
                destination: dest.clone(),
            });
            (dest, true)
        }
    };

    let source_retained = transfer_file(source, dest, transfer, replace, reporter)?;
    Ok(Some(Placement {
        path: dest.clone(),
        source_retained,
    }))
}

/// Move or copy one file to `dest`.
///
/// With `replace` unset an existing `dest` is an error. With it set the
/// existing file is swapped out in a single rename. Returns `true` when a
/// move left its source behind.
pub fn transfer_file(
    source: &Path,
    dest: &Path,
    transfer: Transfer,
    replace: bool,
    reporter: &dyn Reporter,
) -> Result<bool, OpsError> {
    if !replace && dest.exists() {
        return Err(OpsError::DestinationExists {
            path: dest.to_path_buf(),
        });
    }

    let wrap = |source_err: io::Error| OpsError::Transfer {
        transfer,
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: source_err,
    };

    match transfer {
        Transfer::Copy => copy_into_place(source, dest, replace).map(|()| false).map_err(wrap),
        Transfer::Move => {
            // Same filesystem: a rename is atomic and keeps metadata.
            if fs::rename(source, dest).is_ok() {
                return Ok(false);
            }
            copy_into_place(source, dest, replace).map_err(wrap)?;
            match fs::remove_file(source) {
                Ok(()) => Ok(false),
                Err(e) => {
                    reporter.report(SortEvent::SourceRetained {
                        path: source.to_path_buf(),
                        error: e.to_string(),
                    });
                    Ok(true)
                }
            }
        }
    }
}

/// Copy content, permissions and timestamps through a temp file in the
/// destination directory.
fn copy_into_place(source: &Path, dest: &Path, replace: bool) -> io::Result<()> {
    let dir = dest.parent().unwrap_or(Path::new("."));
    let mut tmp = tempfile::Builder::new()
        .prefix(".shiwake-")
        .suffix(".part")
        .tempfile_in(dir)?;

    let mut input = File::open(source)?;
    io::copy(&mut input, tmp.as_file_mut())?;

    let metadata = input.metadata()?;
    tmp.as_file().set_permissions(metadata.permissions())?;
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    tmp.as_file().set_times(times)?;
    tmp.as_file().sync_all()?;

    let persisted = if replace {
        tmp.persist(dest)
    } else {
        tmp.persist_noclobber(dest)
    };
    persisted.map(|_| ()).map_err(|e| e.error)
}
