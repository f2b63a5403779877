use crate::core::models::peptide::{Peptide, PeptideId, PlannedPeptide, PoolGroup};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid concentration '{value}' for peptide {id} in '{path}'")]
    InvalidConcentration {
        path: String,
        id: PeptideId,
        value: String,
    },
}

/// Reads the peptide table: identifier, sequence and concentration, by column position.
///
/// The first row is treated as a header and its names are ignored. `source` only labels
/// errors.
pub fn read_peptides<R: Read>(reader: R, source: &str) -> Result<Vec<Peptide>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut peptides = Vec::new();
    for result in reader.deserialize::<(PeptideId, String, String)>() {
        let (id, sequence, raw_concentration) = result.map_err(|e| TableError::Csv {
            path: source.to_string(),
            source: e,
        })?;
        let concentration =
            raw_concentration
                .parse::<f64>()
                .map_err(|_| TableError::InvalidConcentration {
                    path: source.to_string(),
                    id,
                    value: raw_concentration.clone(),
                })?;
        peptides.push(Peptide {
            id,
            sequence,
            concentration,
        });
    }
    Ok(peptides)
}

pub fn read_peptides_from_path(path: &Path) -> Result<Vec<Peptide>, TableError> {
    let file = std::fs::File::open(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_peptides(file, &path.to_string_lossy())
}

#[derive(Serialize)]
struct PlanRow<'a> {
    pep_number: PeptideId,
    sequence: &'a str,
    conc: f64,
    group: PoolGroup,
    water_for_dilution: f64,
    peptide_for_dilution: f64,
    diluted_volume: f64,
    diluted_concentration: f64,
    mix_concentration: f64,
}

impl<'a> From<&'a PlannedPeptide> for PlanRow<'a> {
    fn from(p: &'a PlannedPeptide) -> Self {
        Self {
            pep_number: p.peptide.id,
            sequence: &p.peptide.sequence,
            conc: p.peptide.concentration,
            group: p.group,
            water_for_dilution: p.water_for_dilution,
            peptide_for_dilution: p.peptide_for_dilution,
            diluted_volume: p.diluted_volume,
            diluted_concentration: p.diluted_concentration,
            mix_concentration: p.mix_concentration,
        }
    }
}

pub fn write_plan<W: Write>(writer: W, peptides: &[PlannedPeptide]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    for peptide in peptides {
        writer.serialize(PlanRow::from(peptide))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_plan_to_path(path: &Path, peptides: &[PlannedPeptide]) -> Result<(), TableError> {
    let file = std::fs::File::create(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    write_plan(file, peptides).map_err(|e| TableError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}
