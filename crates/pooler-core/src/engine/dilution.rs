//! Turns a partition boundary into per-peptide water, peptide and pool volumes.
//!
//! Outer (diluted) peptides are brought down toward the highest inner concentration and then
//! rescaled according to the dilution factor tier their water volume falls into. Inner (neat)
//! peptides are drawn straight from stock in proportion to that same reference.

use super::config::{PoolingConfig, TierLevel};
use super::error::EngineError;
use super::rounding::round_volume;
use super::validation::{ensure_sorted, validate_peptides};
use crate::core::models::peptide::{Peptide, PlannedPeptide, PoolGroup};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct DilutionPlan {
    pub boundary: usize,
    /// Concentration every diluted peptide is brought toward; `None` for an empty input.
    pub reference_concentration: Option<f64>,
    pub half_amount: f64,
    /// Planned peptides in ascending concentration order.
    pub peptides: Vec<PlannedPeptide>,
    pub total_mix_volume: f64,
}

impl DilutionPlan {
    pub fn neat(&self) -> impl Iterator<Item = &PlannedPeptide> {
        self.peptides.iter().filter(|p| p.group == PoolGroup::Neat)
    }

    pub fn diluted(&self) -> impl Iterator<Item = &PlannedPeptide> {
        self.peptides.iter().filter(|p| p.group == PoolGroup::Diluted)
    }
}

pub struct DilutionPlanner<'a> {
    config: &'a PoolingConfig,
}

impl<'a> DilutionPlanner<'a> {
    pub fn new(config: &'a PoolingConfig) -> Self {
        Self { config }
    }

    /// Plans every peptide for the split `[0, boundary)` neat, `[boundary, n)` diluted.
    ///
    /// `peptides` must be sorted by ascending concentration. With `boundary == 0` there is no
    /// inner group, so the lowest concentration in the set serves as the reference.
    pub fn plan(&self, peptides: &[Peptide], boundary: usize) -> Result<DilutionPlan, EngineError> {
        validate_peptides(peptides)?;
        ensure_sorted(peptides)?;
        if boundary > peptides.len() {
            return Err(EngineError::BoundaryOutOfRange {
                boundary,
                len: peptides.len(),
            });
        }
        if peptides.is_empty() {
            return Ok(DilutionPlan {
                boundary,
                reference_concentration: None,
                half_amount: 0.0,
                peptides: Vec::new(),
                total_mix_volume: 0.0,
            });
        }

        let min_volume = self.config.volumes.min_pipette_volume;
        let (inner, outer) = peptides.split_at(boundary);
        let reference = match inner.iter().map(|p| p.concentration).reduce(f64::max) {
            Some(max) => max,
            None => {
                let lowest = peptides[0].concentration;
                warn!(
                    "Inner group is empty; diluting every peptide toward the lowest concentration {}.",
                    lowest
                );
                lowest
            }
        };
        let half_amount = reference * min_volume;
        debug!(
            "Planning with boundary {}, reference concentration {}, half amount {}",
            boundary, reference, half_amount
        );

        let mut planned: Vec<PlannedPeptide> = inner
            .iter()
            .map(|peptide| PlannedPeptide {
                peptide: peptide.clone(),
                group: PoolGroup::Neat,
                water_for_dilution: 0.0,
                peptide_for_dilution: 0.0,
                diluted_volume: round_volume(half_amount / peptide.concentration),
                diluted_concentration: peptide.concentration,
                mix_concentration: 0.0,
            })
            .collect();
        planned.extend(outer.iter().map(|peptide| self.plan_diluted(peptide, reference)));

        let total_mix_volume: f64 = planned.iter().map(|p| p.diluted_volume).sum();
        if total_mix_volume <= 0.0 {
            return Err(EngineError::DegenerateInput(format!(
                "total mix volume is {} for {} peptide(s); the minimum pipette volume {} rounds to nothing",
                total_mix_volume,
                planned.len(),
                min_volume
            )));
        }
        for row in &mut planned {
            row.mix_concentration = row.diluted_concentration * row.diluted_volume / total_mix_volume;
        }

        Ok(DilutionPlan {
            boundary,
            reference_concentration: Some(reference),
            half_amount,
            peptides: planned,
            total_mix_volume,
        })
    }

    fn plan_diluted(&self, peptide: &Peptide, reference: f64) -> PlannedPeptide {
        let min_volume = self.config.volumes.min_pipette_volume;
        let conc = peptide.concentration;

        let raw_water = min_volume * (conc - reference) / reference;
        let raw_concentration = conc * min_volume / (min_volume + raw_water);

        let (water, peptide_volume, diluted_concentration) =
            match self.config.dilution_factors.select(raw_water) {
                Some(level) => {
                    let factor = self.config.dilution_factors.get(level).factor;
                    let water = round_volume(raw_water * factor);
                    let peptide_volume = round_volume(min_volume * factor);
                    let concentration = if level.recomputes_concentration() {
                        recompute_concentration(peptide, level, peptide_volume, water)
                            .unwrap_or(raw_concentration)
                    } else {
                        raw_concentration
                    };
                    (water, peptide_volume, concentration)
                }
                None => (
                    round_volume(raw_water),
                    round_volume(min_volume),
                    raw_concentration,
                ),
            };

        PlannedPeptide {
            peptide: peptide.clone(),
            group: PoolGroup::Diluted,
            water_for_dilution: water,
            peptide_for_dilution: peptide_volume,
            diluted_volume: min_volume,
            diluted_concentration,
            mix_concentration: 0.0,
        }
    }
}

fn recompute_concentration(
    peptide: &Peptide,
    level: TierLevel,
    peptide_volume: f64,
    water: f64,
) -> Option<f64> {
    let total = peptide_volume + water;
    if total > 0.0 {
        Some(peptide.concentration * peptide_volume / total)
    } else {
        warn!(
            "Scaled dilution volumes for peptide {} in tier '{}' are zero; keeping the unscaled concentration.",
            peptide.id, level
        );
        None
    }
}
