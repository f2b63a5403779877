use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::peptide::PeptideId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid concentration for peptide {id}: {value} (must be a positive, finite number)")]
    InvalidConcentration { id: PeptideId, value: f64 },

    #[error("Peptide {id} appears more than once in the input")]
    DuplicatePeptide { id: PeptideId },

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Partition boundary {boundary} is out of range for {len} peptide(s)")]
    BoundaryOutOfRange { boundary: usize, len: usize },
}
