use crate::core::models::peptide::{Peptide, PlannedPeptide};
use crate::engine::config::PoolingConfig;
use crate::engine::dilution::{DilutionPlan, DilutionPlanner};
use crate::engine::error::EngineError;
use crate::engine::partition::{BoundarySearch, find_boundary};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::validation::{sort_by_concentration, validate_peptides};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct PoolingResult {
    /// The boundary search trace; `None` when fewer than two peptides made a search pointless.
    pub search: Option<BoundarySearch>,
    pub plan: DilutionPlan,
}

impl PoolingResult {
    pub fn boundary(&self) -> usize {
        self.plan.boundary
    }

    pub fn peptides(&self) -> &[PlannedPeptide] {
        &self.plan.peptides
    }

    pub fn total_mix_volume(&self) -> f64 {
        self.plan.total_mix_volume
    }

    /// Whether the search found no feasible boundary and the plan fell back to diluting everything.
    pub fn used_fallback(&self) -> bool {
        self.search.as_ref().is_some_and(BoundarySearch::is_exhausted)
    }
}

/// Name of the phase that runs the boundary search.
pub const PARTITION_PHASE: &str = "Partition Search";
/// Name of the phase that plans volumes for the chosen boundary.
pub const PLANNING_PHASE: &str = "Dilution Planning";
/// Phases reported by [`run`], in order.
pub const PHASES: [&str; 2] = [PARTITION_PHASE, PLANNING_PHASE];

/// Validates and sorts `peptides`, then runs only the boundary search.
///
/// Fewer than two peptides leave nothing to partition, so the search is skipped and `None`
/// is returned; every peptide is then pooled neat.
pub fn search(
    peptides: &[Peptide],
    config: &PoolingConfig,
) -> Result<(Vec<Peptide>, Option<BoundarySearch>), EngineError> {
    validate_peptides(peptides)?;
    let sorted = sort_by_concentration(peptides);
    if sorted.len() < 2 {
        return Ok((sorted, None));
    }
    let concentrations: Vec<f64> = sorted.iter().map(|p| p.concentration).collect();
    let search = find_boundary(&concentrations, &config.volumes)?;
    Ok((sorted, Some(search)))
}

#[instrument(skip_all, name = "pooling_workflow", fields(peptides = peptides.len()))]
pub fn run(
    peptides: &[Peptide],
    config: &PoolingConfig,
    reporter: &ProgressReporter,
) -> Result<PoolingResult, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: PARTITION_PHASE,
    });
    let (sorted, search) = self::search(peptides, config)?;
    match &search {
        None => info!(
            "{} peptide(s) supplied; pooled neat without a boundary search.",
            sorted.len()
        ),
        Some(search) if search.is_exhausted() => {
            warn!(
                "No feasible boundary found after {} evaluation(s) ({:?}); falling back to boundary {} and diluting every peptide.",
                search.steps.len(),
                search.direction,
                search.boundary()
            );
            reporter.report(Progress::Message(
                "No feasible boundary found; every peptide will be diluted.".to_string(),
            ));
        }
        Some(search) => info!(
            "Boundary {} found after {} evaluation(s).",
            search.boundary(),
            search.steps.len()
        ),
    }
    reporter.report(Progress::PhaseFinish);

    let boundary = match &search {
        Some(search) => search.boundary(),
        None => sorted.len(),
    };

    reporter.report(Progress::PhaseStart {
        name: PLANNING_PHASE,
    });
    let plan = DilutionPlanner::new(config).plan(&sorted, boundary)?;
    reporter.report(Progress::PhaseFinish);

    info!(
        "Planned {} neat and {} diluted peptide(s); total mix volume {}.",
        plan.neat().count(),
        plan.diluted().count(),
        plan.total_mix_volume
    );
    Ok(PoolingResult { search, plan })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::peptide::{PeptideId, PoolGroup};
    use crate::engine::config::{DilutionFactors, DilutionTier, PoolingConfigBuilder};
    use crate::engine::partition::{SearchDirection, SearchOutcome};

    fn config(max_usage: f64, max_pool: f64) -> PoolingConfig {
        PoolingConfigBuilder::new()
            .min_pipette_volume(2.0)
            .max_peptide_usage_volume(max_usage)
            .max_pool_volume(max_pool)
            .dilution_factors(DilutionFactors {
                low: DilutionTier::new(2.0, 5.0),
                medium: DilutionTier::new(10.0, 2.0),
                high: DilutionTier::new(30.0, 1.0),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn scenario_one_two_four_hundred_resolves_to_boundary_three() {
        // Insertion order deliberately differs from concentration order.
        let peptides = vec![
            Peptide::new(4, "DDDD", 100.0),
            Peptide::new(1, "AAAA", 1.0),
            Peptide::new(3, "CCCC", 4.0),
            Peptide::new(2, "BBBB", 2.0),
        ];
        let result = run(&peptides, &config(50.0, 20.0), &ProgressReporter::new()).unwrap();

        let search = result.search.as_ref().unwrap();
        assert_eq!(search.direction, SearchDirection::Grow);
        assert_eq!(search.outcome, SearchOutcome::Found(3));

        // b = 2: half amount 4, draws [4, 2] -> 6 + 2 * 2 = 10 <= 20, max draw 4 < 50.
        let first = &search.steps[0];
        assert_eq!(first.boundary, 2);
        assert_eq!(first.half_max_conc, Some(2.0));
        assert_eq!(first.inner_volume, 6.0);
        assert_eq!(first.outer_volume, 4.0);
        assert!(first.criteria_fitting && first.criteria_lowest_fits);

        // b = 3: half amount 8, draws [8, 4, 2] -> 14 + 2 = 16 <= 20, max draw 8 < 50.
        let second = &search.steps[1];
        assert_eq!(second.inner_volume, 14.0);
        assert_eq!(second.outer_volume, 2.0);
        assert!(second.is_feasible());

        // b = 4: half amount 200, draws [200, 100, 50, 2] -> 352 > 20, max draw 200 >= 50.
        let third = &search.steps[2];
        assert_eq!(third.inner_volume, 352.0);
        assert!(!third.criteria_fitting);
        assert!(!third.criteria_lowest_fits);
        assert_eq!(search.steps.len(), 3);

        assert_eq!(result.boundary(), 3);
        let ids: Vec<PeptideId> = result.peptides().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![PeptideId(1), PeptideId(2), PeptideId(3), PeptideId(4)]);
        let volumes: Vec<f64> = result.peptides().iter().map(|p| p.diluted_volume).collect();
        assert_eq!(volumes, vec![8.0, 4.0, 2.0, 2.0]);
        assert_eq!(result.peptides()[3].water_for_dilution, 48.0);
        assert_eq!(result.peptides()[3].peptide_for_dilution, 2.0);
        assert_eq!(result.total_mix_volume(), 16.0);
        assert!(!result.used_fallback());
    }

    #[test]
    fn exhausted_grow_falls_back_to_all_diluted() {
        // Every boundary fits, including the whole set neat, so growth runs off the end.
        // The fallback dilutes everything even though more neat peptides would have fitted.
        let peptides: Vec<Peptide> = (1..=4).map(|i| Peptide::new(i, "PEP", 1.0)).collect();
        let result = run(&peptides, &config(50.0, 1000.0), &ProgressReporter::new()).unwrap();

        assert!(result.used_fallback());
        assert_eq!(result.boundary(), 0);
        assert!(result.peptides().iter().all(|p| p.group == PoolGroup::Diluted));
    }

    #[test]
    fn exhausted_shrink_falls_back_to_all_diluted() {
        let peptides = vec![
            Peptide::new(1, "A", 1.0),
            Peptide::new(2, "B", 10.0),
            Peptide::new(3, "C", 100.0),
        ];
        let result = run(&peptides, &config(50.0, 3.0), &ProgressReporter::new()).unwrap();

        assert!(result.used_fallback());
        assert_eq!(result.plan.reference_concentration, Some(1.0));
        assert_eq!(result.total_mix_volume(), 6.0);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let result = run(&[], &config(50.0, 20.0), &ProgressReporter::new()).unwrap();
        assert!(result.search.is_none());
        assert!(result.peptides().is_empty());
        assert_eq!(result.total_mix_volume(), 0.0);
    }

    #[test]
    fn single_peptide_passes_through_neat() {
        let peptides = vec![Peptide::new(9, "SOLO", 3.0)];
        let result = run(&peptides, &config(50.0, 20.0), &ProgressReporter::new()).unwrap();

        assert!(result.search.is_none());
        assert_eq!(result.boundary(), 1);
        let only = &result.peptides()[0];
        assert_eq!(only.group, PoolGroup::Neat);
        assert_eq!(only.diluted_concentration, 3.0);
        assert_eq!(only.diluted_volume, 2.0);
        assert_eq!(only.mix_concentration, 3.0);
    }

    #[test]
    fn single_invalid_peptide_is_still_rejected() {
        let peptides = vec![Peptide::new(9, "SOLO", -1.0)];
        let result = run(&peptides, &config(50.0, 20.0), &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcentration { id: PeptideId(9), .. })
        ));
    }

    #[test]
    fn search_and_run_agree_below_two_peptides() {
        let config = config(50.0, 20.0);
        for peptides in [vec![], vec![Peptide::new(9, "SOLO", 3.0)]] {
            let (sorted, search) = search(&peptides, &config).unwrap();
            let result = run(&peptides, &config, &ProgressReporter::new()).unwrap();

            assert!(search.is_none());
            assert!(result.search.is_none());
            assert!(!result.used_fallback());
            assert_eq!(result.boundary(), sorted.len());
            assert!(result.peptides().iter().all(|p| p.group == PoolGroup::Neat));
        }
    }

    #[test]
    fn single_peptide_below_half_unit_pipette_volume_is_degenerate() {
        // The only draw is round(0.4) = 0, so there is no volume to normalise the mix against.
        let config = PoolingConfigBuilder::new()
            .min_pipette_volume(0.4)
            .max_peptide_usage_volume(50.0)
            .max_pool_volume(20.0)
            .dilution_factors(config(50.0, 20.0).dilution_factors)
            .build()
            .unwrap();
        let result = run(
            &[Peptide::new(9, "SOLO", 3.0)],
            &config,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::DegenerateInput(_))));
    }

    #[test]
    fn phases_are_reported_in_order() {
        use std::sync::Mutex;

        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                seen.lock().unwrap().push(name);
            }
        }));
        let peptides = vec![Peptide::new(1, "A", 1.0), Peptide::new(2, "B", 2.0)];
        run(&peptides, &config(50.0, 20.0), &reporter).unwrap();
        drop(reporter);

        assert_eq!(seen.into_inner().unwrap(), PHASES.to_vec());
    }

    #[test]
    fn invalid_concentration_aborts_before_search() {
        let peptides = vec![Peptide::new(1, "A", 1.0), Peptide::new(2, "B", 0.0)];
        let result = search(&peptides, &config(50.0, 20.0));
        assert!(matches!(
            result,
            Err(EngineError::InvalidConcentration { id: PeptideId(2), .. })
        ));
    }
}
