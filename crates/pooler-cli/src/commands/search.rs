use crate::cli::SearchArgs;
use crate::config::builder::build_config;
use crate::error::Result;
use peptide_pooler::core::io::table;
use peptide_pooler::engine::partition::{BoundaryEvaluation, SearchOutcome};
use peptide_pooler::workflows;
use tracing::info;

pub fn run(args: SearchArgs) -> Result<()> {
    let app_config = build_config(&args.common)?;

    info!("Loading peptide table from {:?}", &app_config.input_path);
    let peptides = table::read_peptides_from_path(&app_config.input_path)?;

    let (sorted, search) = workflows::pool::search(&peptides, &app_config.core_config)?;
    let Some(search) = search else {
        println!(
            "✓ No boundary search needed: {} peptide(s), all pooled neat.",
            sorted.len()
        );
        return Ok(());
    };

    println!(
        "Searching {} peptide(s), direction {:?}:",
        sorted.len(),
        search.direction
    );
    for step in &search.steps {
        println!("  {}", format_step(step));
    }

    match search.outcome {
        SearchOutcome::Found(boundary) => {
            println!("✓ Boundary {}: {} peptide(s) pooled neat.", boundary, boundary);
        }
        SearchOutcome::Exhausted { direction } => {
            println!(
                "Warning: search exhausted ({:?}); falling back to boundary {}.",
                direction,
                search.boundary()
            );
        }
    }
    Ok(())
}

fn format_step(step: &BoundaryEvaluation) -> String {
    let or_dash = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(
        "b={} half_max_conc={} inner={} outer={} max_dilute={} fitting={} lowest_fits={}",
        step.boundary,
        or_dash(step.half_max_conc),
        step.inner_volume,
        step.outer_volume,
        or_dash(step.max_dilute_volume),
        step.criteria_fitting,
        step.criteria_lowest_fits
    )
}
