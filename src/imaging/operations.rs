//! High-level save operations.
//!
//! These functions combine the codec with the pure bake. They take the
//! encoded original, an edit snapshot and export parameters, and return the
//! encoded result together with the record of what was applied.

use super::bake::bake;
use super::codec::{BakeError, ImageCodec};
use super::params::ExportParams;
use crate::export::{EditRecord, SavedEdit, sha256_hex};
use crate::filters::FilterCatalog;
use crate::session::EditSnapshot;
use rayon::prelude::*;
use tracing::{debug, info};

/// Result type for save operations.
pub type Result<T> = std::result::Result<T, BakeError>;

/// Decode, bake and encode one photo.
///
/// The returned record mirrors `snapshot` exactly. Any failure is terminal:
/// nothing partial is returned.
pub fn save_edit(
    codec: &impl ImageCodec,
    bytes: &[u8],
    origin: &str,
    snapshot: &EditSnapshot,
    catalog: &FilterCatalog,
    params: &ExportParams,
) -> Result<SavedEdit> {
    let source = codec.decode(bytes, origin)?;
    debug!(origin, width = source.width(), height = source.height(), "decoded");

    let baked = bake(
        &source,
        &snapshot.adjustments,
        &snapshot.crop,
        catalog,
        &params.bake,
    )?;
    let encoded = codec.encode(&baked, params.format, params.quality)?;

    info!(
        origin,
        width = baked.width(),
        height = baked.height(),
        bytes = encoded.len(),
        "saved edit"
    );

    Ok(SavedEdit {
        origin: origin.to_string(),
        width: baked.width(),
        height: baked.height(),
        format: params.format,
        digest: sha256_hex(&encoded),
        bytes: encoded,
        record: EditRecord::new(&snapshot.adjustments, &snapshot.crop),
    })
}

/// Encoded original waiting to be baked.
#[derive(Debug, Clone)]
pub struct BatchSource {
    pub origin: String,
    pub bytes: Vec<u8>,
}

/// Save many photos with the same edit, in parallel.
///
/// Results come back in input order; one failure does not stop the others.
pub fn save_batch(
    codec: &impl ImageCodec,
    sources: &[BatchSource],
    snapshot: &EditSnapshot,
    catalog: &FilterCatalog,
    params: &ExportParams,
) -> Vec<Result<SavedEdit>> {
    sources
        .par_iter()
        .map(|src| save_edit(codec, &src.bytes, &src.origin, snapshot, catalog, params))
        .collect()
}
