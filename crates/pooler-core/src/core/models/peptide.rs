use serde::{Deserialize, Serialize};
use std::fmt;

/// The numeric identifier a peptide carries through the input table and the labware layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeptideId(pub u32);

impl fmt::Display for PeptideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for PeptideId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A peptide stock as supplied by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Peptide {
    pub id: PeptideId,
    pub sequence: String,
    pub concentration: f64,
}

impl Peptide {
    pub fn new(id: u32, sequence: impl Into<String>, concentration: f64) -> Self {
        Self {
            id: PeptideId(id),
            sequence: sequence.into(),
            concentration,
        }
    }
}

/// Which side of the partition boundary a peptide ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolGroup {
    /// Pooled straight from its stock.
    Neat,
    /// Pre-diluted with water on the dilution plate before pooling.
    Diluted,
}

impl fmt::Display for PoolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolGroup::Neat => write!(f, "neat"),
            PoolGroup::Diluted => write!(f, "diluted"),
        }
    }
}

/// A peptide together with every volume and concentration the planner derived for it.
///
/// Neat peptides keep `water_for_dilution` and `peptide_for_dilution` at zero and use their
/// stock concentration as `diluted_concentration`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPeptide {
    pub peptide: Peptide,
    pub group: PoolGroup,
    pub water_for_dilution: f64,
    pub peptide_for_dilution: f64,
    pub diluted_volume: f64,
    pub diluted_concentration: f64,
    pub mix_concentration: f64,
}

impl PlannedPeptide {
    pub fn id(&self) -> PeptideId {
        self.peptide.id
    }

    pub fn is_neat(&self) -> bool {
        self.group == PoolGroup::Neat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peptide_id_displays_with_hash_prefix() {
        assert_eq!(PeptideId(42).to_string(), "#42");
    }

    #[test]
    fn peptide_new_accepts_raw_identifiers() {
        let peptide = Peptide::new(7, "SIINFEKL", 1.5);
        assert_eq!(peptide.id, PeptideId(7));
        assert_eq!(peptide.sequence, "SIINFEKL");
        assert_eq!(peptide.concentration, 1.5);
    }

    #[test]
    fn pool_group_displays_lowercase() {
        assert_eq!(PoolGroup::Neat.to_string(), "neat");
        assert_eq!(PoolGroup::Diluted.to_string(), "diluted");
    }
}
