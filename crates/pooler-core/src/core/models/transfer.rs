use super::peptide::PeptideId;
use serde::Serialize;
use std::fmt;

/// A named labware item and one of its wells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WellPosition {
    pub labware: String,
    pub well: String,
}

impl WellPosition {
    pub fn new(labware: impl Into<String>, well: impl Into<String>) -> Self {
        Self {
            labware: labware.into(),
            well: well.into(),
        }
    }
}

impl fmt::Display for WellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.labware, self.well)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferKind {
    /// Water into the dilution-plate well of a peptide that gets diluted.
    DilutionWater,
    /// Peptide stock from its tray into its dilution-plate well.
    DilutionPeptide,
    /// Diluted peptide from the dilution plate into the pool.
    PoolDiluted,
    /// Neat peptide stock from its tray into the pool.
    PoolNeat,
}

/// One liquid-handling step: move `volume` from `source` to `destination`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub peptide: PeptideId,
    pub kind: TransferKind,
    pub source: WellPosition,
    pub destination: WellPosition,
    pub volume: f64,
}
