use super::table::TableError;
use crate::core::models::peptide::PeptideId;
use crate::core::models::transfer::{Transfer, TransferKind};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Serialize)]
struct TransferRow<'a> {
    step: usize,
    kind: TransferKind,
    peptide: PeptideId,
    source_labware: &'a str,
    source_well: &'a str,
    destination_labware: &'a str,
    destination_well: &'a str,
    volume: f64,
}

/// Writes transfers in execution order, numbering steps from 1.
pub fn write_transfers<W: Write>(writer: W, transfers: &[Transfer]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for (index, transfer) in transfers.iter().enumerate() {
        writer.serialize(TransferRow {
            step: index + 1,
            kind: transfer.kind,
            peptide: transfer.peptide,
            source_labware: &transfer.source.labware,
            source_well: &transfer.source.well,
            destination_labware: &transfer.destination.labware,
            destination_well: &transfer.destination.well,
            volume: transfer.volume,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_transfers_to_path(path: &Path, transfers: &[Transfer]) -> Result<(), TableError> {
    let file = std::fs::File::create(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_transfers(file, transfers).map_err(|e| TableError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}
