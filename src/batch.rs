//! Batch coordination: decrypt many work items with one shared key.
//!
//! The coordinator never aborts the whole batch on a single bad item —
//! each item's failure is recorded in its outcome and processing moves
//! on.  Outcomes are returned in the same order the items were supplied,
//! including under the optional rayon-parallel runner.
//!
//! Fatal key errors cannot occur here: the coordinator only accepts an
//! already-unwrapped [`SymmetricKey`], so a bad private key or envelope
//! surfaces before any batch work starts.

use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Settings;
use crate::crypto::keys::SymmetricKey;
use crate::crypto::stream::decrypt_stream;
use crate::errors::UnsealError;

/// One decryption job: an input byte stream plus its output sink.
/// Exists only for the duration of one decryption call.
pub struct WorkItem<R, W> {
    pub source: R,
    pub sink: W,
}

impl<R: Read, W: Write> WorkItem<R, W> {
    pub fn new(source: R, sink: W) -> Self {
        Self { source, sink }
    }
}

/// Per-item outcome of a batch run.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The item decrypted fully; `bytes_written` plaintext bytes were
    /// produced.
    Success { bytes_written: u64 },
    /// The item failed; the rest of the batch is unaffected.
    Failed(UnsealError),
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success { .. })
    }

    pub fn is_failed(&self) -> bool {
        !self.is_success()
    }

    /// The recorded error, if this item failed.
    pub fn error(&self) -> Option<&UnsealError> {
        match self {
            ItemOutcome::Success { .. } => None,
            ItemOutcome::Failed(e) => Some(e),
        }
    }
}

fn decrypt_item<R: Read, W: Write>(
    key: &SymmetricKey,
    item: &mut WorkItem<R, W>,
    settings: &Settings,
) -> ItemOutcome {
    match decrypt_stream(key, &mut item.source, &mut item.sink, settings) {
        Ok(bytes_written) => ItemOutcome::Success { bytes_written },
        Err(e) => ItemOutcome::Failed(e),
    }
}

/// Decrypt every work item sequentially, in input order.
///
/// Returns one outcome per item, in the same order.  An empty batch
/// yields an empty result vector.  Items are borrowed mutably so the
/// caller keeps ownership of the sinks after the run.
pub fn run_batch<R: Read, W: Write>(
    key: &SymmetricKey,
    items: &mut [WorkItem<R, W>],
    settings: &Settings,
) -> Vec<ItemOutcome> {
    items
        .iter_mut()
        .map(|item| decrypt_item(key, item, settings))
        .collect()
}

/// Like [`run_batch`], but stops issuing new items once `cancel` is set.
///
/// Items already decrypted keep their outcomes; the result vector is
/// truncated at the first item not started.  The item in flight when the
/// flag fires runs to completion — cancellation is cooperative, checked
/// between items.
pub fn run_batch_with_cancel<R: Read, W: Write>(
    key: &SymmetricKey,
    items: &mut [WorkItem<R, W>],
    settings: &Settings,
    cancel: &AtomicBool,
) -> Vec<ItemOutcome> {
    let mut outcomes = Vec::with_capacity(items.len());
    for item in items.iter_mut() {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        outcomes.push(decrypt_item(key, item, settings));
    }
    outcomes
}

/// Decrypt the batch across the rayon thread pool.
///
/// The symmetric key is shared read-only; each task builds its own cipher
/// context from it, so no cipher state crosses item boundaries.  Outcomes
/// are still returned in input order.
#[cfg(feature = "parallel")]
pub fn run_batch_parallel<R, W>(
    key: &SymmetricKey,
    items: &mut [WorkItem<R, W>],
    settings: &Settings,
) -> Vec<ItemOutcome>
where
    R: Read + Send,
    W: Write + Send,
{
    items
        .par_iter_mut()
        .map(|item| decrypt_item(key, item, settings))
        .collect()
}

/// Decrypt `source` into the file at `dest`.
///
/// On failure the partially written destination is removed before the
/// error is recorded, so a corrupted file is never left behind looking
/// like a valid output.
pub fn decrypt_file(
    key: &SymmetricKey,
    source: &Path,
    dest: &Path,
    settings: &Settings,
) -> ItemOutcome {
    let input = match fs::File::open(source) {
        Ok(f) => f,
        Err(e) => return ItemOutcome::Failed(e.into()),
    };
    let output = match fs::File::create(dest) {
        Ok(f) => f,
        Err(e) => return ItemOutcome::Failed(e.into()),
    };

    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);

    match decrypt_stream(key, &mut reader, &mut writer, settings) {
        Ok(bytes_written) => ItemOutcome::Success { bytes_written },
        Err(e) => {
            // Close the sink before unlinking the partial file.
            drop(writer);
            let _ = fs::remove_file(dest);
            ItemOutcome::Failed(e)
        }
    }
}

/// Decrypt a set of source files, routing each to the destination chosen
/// by the caller-supplied `map_dest` policy.
///
/// Enumeration of the sources (e.g. a directory listing) and the naming
/// policy both belong to the caller; the coordinator only pairs them up
/// and keeps going past per-item failures.
pub fn run_batch_files<F>(
    key: &SymmetricKey,
    sources: &[PathBuf],
    map_dest: F,
    settings: &Settings,
) -> Vec<ItemOutcome>
where
    F: Fn(&Path) -> PathBuf,
{
    sources
        .iter()
        .map(|source| decrypt_file(key, source, &map_dest(source), settings))
        .collect()
}
