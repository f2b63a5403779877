use crate::core::models::peptide::{Peptide, PeptideId};
use crate::core::models::transfer::WellPosition;
use std::collections::HashMap;
use thiserror::Error;

const PLATE_ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
const PLATE_COLUMNS: usize = 12;
pub const PLATE_CAPACITY: usize = PLATE_ROWS.len() * PLATE_COLUMNS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Dilution plate '{plate}' lists {count} samples, but a 96-well plate holds at most 96")]
    PlateOverflow { plate: String, count: usize },

    #[error("Peptide {id} is placed more than once in {labware}")]
    DuplicateSample { id: PeptideId, labware: String },

    #[error("Peptide {id} is placed in a tray but has no well on the dilution plate")]
    MissingDilutionWell { id: PeptideId },

    #[error("Peptide {id} ({sequence}) has no tray position")]
    MissingTrayWell { id: PeptideId, sequence: String },

    #[error("Peptide {id} ({sequence}) has no dilution plate position")]
    UnplacedPeptide { id: PeptideId, sequence: String },
}

/// A source tray; sample `i` sits in well `A{i+1:02}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tray {
    pub name: String,
    pub samples: Vec<PeptideId>,
}

/// A 96-well plate filled column by column (`A1`, `B1`, ..., `H1`, `A2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DilutionPlate {
    pub name: String,
    pub samples: Vec<PeptideId>,
}

pub fn tray_well_name(index: usize) -> String {
    format!("A{:02}", index + 1)
}

pub fn plate_well_name(index: usize) -> Option<String> {
    if index >= PLATE_CAPACITY {
        return None;
    }
    let row = PLATE_ROWS[index % PLATE_ROWS.len()];
    let column = index / PLATE_ROWS.len() + 1;
    Some(format!("{}{}", row, column))
}

/// Where every peptide lives on the deck, plus the water source and the pool destination.
#[derive(Debug, Clone)]
pub struct LabwareLayout {
    tray_positions: HashMap<PeptideId, WellPosition>,
    plate_positions: HashMap<PeptideId, WellPosition>,
    water: WellPosition,
    pool: WellPosition,
}

impl LabwareLayout {
    /// Resolves well names for every tray and plate sample.
    ///
    /// # Errors
    ///
    /// Fails if the plate overflows, a peptide is listed twice on the trays or the plate, or a
    /// tray peptide has no dilution plate well.
    pub fn new(
        trays: &[Tray],
        plate: &DilutionPlate,
        water: WellPosition,
        pool: WellPosition,
    ) -> Result<Self, LayoutError> {
        if plate.samples.len() > PLATE_CAPACITY {
            return Err(LayoutError::PlateOverflow {
                plate: plate.name.clone(),
                count: plate.samples.len(),
            });
        }

        let mut tray_positions = HashMap::new();
        for tray in trays {
            for (index, &id) in tray.samples.iter().enumerate() {
                let position = WellPosition::new(&tray.name, tray_well_name(index));
                if tray_positions.insert(id, position).is_some() {
                    return Err(LayoutError::DuplicateSample {
                        id,
                        labware: "the trays".to_string(),
                    });
                }
            }
        }

        let mut plate_positions = HashMap::new();
        for (well_name, &id) in (0..).map_while(plate_well_name).zip(&plate.samples) {
            if plate_positions
                .insert(id, WellPosition::new(&plate.name, well_name))
                .is_some()
            {
                return Err(LayoutError::DuplicateSample {
                    id,
                    labware: format!("dilution plate '{}'", plate.name),
                });
            }
        }

        if let Some(&id) = tray_positions
            .keys()
            .filter(|id| !plate_positions.contains_key(*id))
            .min()
        {
            return Err(LayoutError::MissingDilutionWell { id });
        }

        Ok(Self {
            tray_positions,
            plate_positions,
            water,
            pool,
        })
    }

    pub fn tray_position(&self, id: PeptideId) -> Option<&WellPosition> {
        self.tray_positions.get(&id)
    }

    pub fn plate_position(&self, id: PeptideId) -> Option<&WellPosition> {
        self.plate_positions.get(&id)
    }

    pub fn water(&self) -> &WellPosition {
        &self.water
    }

    pub fn pool(&self) -> &WellPosition {
        &self.pool
    }

    /// Checks that every input peptide has both a tray well and a dilution plate well.
    pub fn check_peptides(&self, peptides: &[Peptide]) -> Result<(), LayoutError> {
        for peptide in peptides {
            if !self.tray_positions.contains_key(&peptide.id) {
                return Err(LayoutError::MissingTrayWell {
                    id: peptide.id,
                    sequence: peptide.sequence.clone(),
                });
            }
            if !self.plate_positions.contains_key(&peptide.id) {
                return Err(LayoutError::UnplacedPeptide {
                    id: peptide.id,
                    sequence: peptide.sequence.clone(),
                });
            }
        }
        Ok(())
    }
}
