use crate::cli::PlanArgs;
use crate::config::builder::build_config;
use crate::config::defaults::DefaultsConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use peptide_pooler::{
    core::io::{table, transfers},
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::{info, warn};

pub fn run(args: PlanArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args.common)?;
    let defaults = DefaultsConfig::default();

    info!("Loading peptide table from {:?}", &app_config.input_path);
    let peptides = table::read_peptides_from_path(&app_config.input_path)?;
    info!("Loaded {} peptide(s).", peptides.len());

    if let Some(layout) = &app_config.layout {
        layout.check_peptides(&peptides)?;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Planning pool for {} peptide(s)...", peptides.len());
    let result = workflows::pool::run(&peptides, &app_config.core_config, &reporter)?;

    std::fs::create_dir_all(&args.output)?;

    let plan_path = args.output.join(&defaults.plan_file_name);
    info!("Writing pooling plan to {:?}", &plan_path);
    table::write_plan_to_path(&plan_path, result.peptides())?;

    println!(
        "Boundary {}: {} neat, {} diluted, total mix volume {}.",
        result.boundary(),
        result.plan.neat().count(),
        result.plan.diluted().count(),
        result.total_mix_volume()
    );
    if result.used_fallback() {
        println!("Warning: no feasible boundary was found; every peptide is diluted.");
    }
    println!("✓ Pooling plan written to: {}", plan_path.display());

    match &app_config.layout {
        Some(layout) => {
            let transfer_plan = workflows::transfers::build_transfer_plan(&result, layout)?;
            let transfers_path = args.output.join(&defaults.transfers_file_name);
            info!(
                "Writing {} transfer(s) to {:?}",
                transfer_plan.len(),
                &transfers_path
            );
            transfers::write_transfers_to_path(&transfers_path, &transfer_plan)?;
            println!(
                "✓ {} transfer(s) written to: {}",
                transfer_plan.len(),
                transfers_path.display()
            );
        }
        None => {
            warn!("No [labware] section configured; the transfer list was skipped.");
            println!("Warning: no labware configured, transfer list skipped.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const CONFIG: &str = r#"
        [volumes]
        min-pipette-volume = 2.0
        max-peptide-usage-volume = 50.0
        max-pool-volume = 20.0

        [labware]
        water = { name = "Water", well = "A1" }
        pool = { name = "Pool", well = "A1" }

        [[labware.trays]]
        name = "Tray1"
        samples = [1, 2, 3, 4]

        [labware.dilution-plate]
        name = "Plate"
        samples = [1, 2, 3, 4]
    "#;

    const PEPTIDES: &str = "pep,seq,conc\n1,AAA,1\n2,CCC,2\n3,DDD,4\n4,EEE,100\n";

    fn plan_args(dir: &Path, config: &str) -> PlanArgs {
        let input = dir.join("peptides.csv");
        let config_path = dir.join("config.toml");
        fs::write(&input, PEPTIDES).unwrap();
        fs::write(&config_path, config).unwrap();
        PlanArgs {
            common: ConfigArgs {
                input,
                config: config_path,
                min_pipette_volume: None,
                max_peptide_usage_volume: None,
                max_pool_volume: None,
                set_values: vec![],
            },
            output: dir.join("out"),
        }
    }

    #[test]
    fn writes_plan_and_transfers() {
        let dir = tempdir().unwrap();
        run(plan_args(dir.path(), CONFIG)).expect("plan ok");

        let plan = fs::read_to_string(dir.path().join("out/pooling_plan.csv")).unwrap();
        let rows: Vec<&str> = plan.lines().collect();
        assert_eq!(rows.len(), 5);
        assert!(rows[0].starts_with("pep_number,sequence,conc,group"));
        assert!(rows[1].starts_with("1,AAA,1"));
        assert!(rows[1].contains("neat"));
        assert!(rows[4].starts_with("4,EEE,100"));
        assert!(rows[4].contains("diluted"));

        let transfers = fs::read_to_string(dir.path().join("out/transfers.csv")).unwrap();
        // water + peptide + pool for the diluted one, one pool transfer per neat peptide
        assert_eq!(transfers.lines().count(), 1 + 3 + 3);
    }

    #[test]
    fn skips_transfers_without_labware() {
        let dir = tempdir().unwrap();
        let config = CONFIG.split("[labware]").next().unwrap();
        run(plan_args(dir.path(), config)).expect("plan ok");

        assert!(dir.path().join("out/pooling_plan.csv").exists());
        assert!(!dir.path().join("out/transfers.csv").exists());
    }

    #[test]
    fn peptide_missing_from_labware_is_rejected() {
        let dir = tempdir().unwrap();
        let config = CONFIG.replace("samples = [1, 2, 3, 4]\n\n", "samples = [1, 2, 3]\n\n");
        let result = run(plan_args(dir.path(), &config));

        assert!(matches!(result, Err(crate::error::CliError::Layout(_))));
        assert!(!dir.path().join("out").exists());
    }
}
