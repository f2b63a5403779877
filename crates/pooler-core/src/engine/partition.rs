//! Search for the boundary that separates neat peptides from diluted ones.
//!
//! Peptides are indexed in ascending concentration order. A boundary `b` puts `[0, b)` in the
//! inner (neat) group and `[b, n)` in the outer (diluted) group. A boundary is feasible when
//! the pool fits under `max_pool_volume` and no neat draw reaches `max_peptide_usage_volume`.

use super::config::VolumeLimits;
use super::error::EngineError;
use super::rounding::round_volume;
use tracing::debug;

/// Boundary used when neither direction of the search finds a feasible split.
pub const FALLBACK_BOUNDARY: usize = 0;

/// Both feasibility criteria, and the quantities behind them, for one candidate boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryEvaluation {
    pub boundary: usize,
    /// Highest concentration in the inner group; `None` when the inner group is empty.
    pub half_max_conc: Option<f64>,
    pub inner_volume: f64,
    pub outer_volume: f64,
    /// Largest rounded neat draw; `None` when the inner group is empty.
    pub max_dilute_volume: Option<f64>,
    pub criteria_fitting: bool,
    pub criteria_lowest_fits: bool,
}

impl BoundaryEvaluation {
    pub fn is_feasible(&self) -> bool {
        self.criteria_fitting && self.criteria_lowest_fits
    }

    pub fn total_volume(&self) -> f64 {
        self.inner_volume + self.outer_volume
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Feasible at the start; the inner group is enlarged one peptide at a time.
    Grow,
    /// Infeasible at the start; the inner group is shrunk one peptide at a time.
    Shrink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(usize),
    /// The search ran off the end of the index range in `direction`.
    Exhausted { direction: SearchDirection },
}

/// The resolved boundary together with every evaluation the search performed.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySearch {
    pub direction: SearchDirection,
    pub outcome: SearchOutcome,
    pub steps: Vec<BoundaryEvaluation>,
}

impl BoundarySearch {
    /// The boundary to plan with; [`FALLBACK_BOUNDARY`] when the search was exhausted.
    pub fn boundary(&self) -> usize {
        match self.outcome {
            SearchOutcome::Found(boundary) => boundary,
            SearchOutcome::Exhausted { .. } => FALLBACK_BOUNDARY,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Exhausted { .. })
    }
}

pub struct PartitionSearch<'a> {
    concentrations: &'a [f64],
    limits: &'a VolumeLimits,
}

impl<'a> PartitionSearch<'a> {
    /// `concentrations` must already be sorted ascending.
    pub fn new(concentrations: &'a [f64], limits: &'a VolumeLimits) -> Self {
        Self {
            concentrations,
            limits,
        }
    }

    pub fn evaluate(&self, boundary: usize) -> Result<BoundaryEvaluation, EngineError> {
        let len = self.concentrations.len();
        if boundary > len {
            return Err(EngineError::BoundaryOutOfRange { boundary, len });
        }
        let min_volume = self.limits.min_pipette_volume;
        let inner = &self.concentrations[..boundary];

        let half_max_conc = inner.iter().copied().reduce(f64::max);
        let (inner_volume, max_dilute_volume) = match half_max_conc {
            Some(reference) => {
                let half_amount = reference * min_volume;
                inner
                    .iter()
                    .map(|&conc| round_volume(half_amount / conc))
                    .fold((0.0, None), |(sum, max): (f64, Option<f64>), volume| {
                        (sum + volume, Some(max.map_or(volume, |m| m.max(volume))))
                    })
            }
            None => (0.0, None),
        };
        let outer_volume = (len - boundary) as f64 * min_volume;

        let criteria_fitting = inner_volume + outer_volume <= self.limits.max_pool_volume;
        // Without an inner group there is no reference concentration to pipette against.
        let criteria_lowest_fits =
            max_dilute_volume.is_some_and(|max| max < self.limits.max_peptide_usage_volume);

        let evaluation = BoundaryEvaluation {
            boundary,
            half_max_conc,
            inner_volume,
            outer_volume,
            max_dilute_volume,
            criteria_fitting,
            criteria_lowest_fits,
        };
        debug!(
            "Boundary {}: criteria fitting: {}, criteria lowest fits: {}, total volume: {}, max dilute volume: {:?}",
            boundary,
            criteria_fitting,
            criteria_lowest_fits,
            evaluation.total_volume(),
            max_dilute_volume
        );
        Ok(evaluation)
    }

    /// Runs the two-phase search starting from the midpoint `n / 2`.
    ///
    /// Growth keeps the last boundary at which both criteria held before the first failure.
    /// Shrinking stops at the first boundary at which both criteria hold. Running past either
    /// end of `[0, n]` yields [`SearchOutcome::Exhausted`].
    pub fn run(&self) -> Result<BoundarySearch, EngineError> {
        let len = self.concentrations.len();
        let mut boundary = len / 2;
        let mut current = self.evaluate(boundary)?;
        let mut steps = vec![current];

        if current.is_feasible() {
            let mut last_success = boundary;
            while current.is_feasible() {
                if boundary >= len {
                    return Ok(BoundarySearch {
                        direction: SearchDirection::Grow,
                        outcome: SearchOutcome::Exhausted {
                            direction: SearchDirection::Grow,
                        },
                        steps,
                    });
                }
                last_success = boundary;
                boundary += 1;
                current = self.evaluate(boundary)?;
                steps.push(current);
            }
            Ok(BoundarySearch {
                direction: SearchDirection::Grow,
                outcome: SearchOutcome::Found(last_success),
                steps,
            })
        } else {
            while !current.is_feasible() {
                if boundary == 0 {
                    return Ok(BoundarySearch {
                        direction: SearchDirection::Shrink,
                        outcome: SearchOutcome::Exhausted {
                            direction: SearchDirection::Shrink,
                        },
                        steps,
                    });
                }
                boundary -= 1;
                current = self.evaluate(boundary)?;
                steps.push(current);
            }
            Ok(BoundarySearch {
                direction: SearchDirection::Shrink,
                outcome: SearchOutcome::Found(boundary),
                steps,
            })
        }
    }
}

/// Finds the partition boundary for concentrations sorted in ascending order.
pub fn find_boundary(
    sorted_concentrations: &[f64],
    limits: &VolumeLimits,
) -> Result<BoundarySearch, EngineError> {
    PartitionSearch::new(sorted_concentrations, limits).run()
}
