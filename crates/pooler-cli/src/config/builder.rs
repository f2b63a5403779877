use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileDilutionFactors, FileLabwareConfig};
use super::models::AppConfig;
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use peptide_pooler::core::labware::layout::{DilutionPlate, LabwareLayout, Tray};
use peptide_pooler::core::models::transfer::WellPosition;
use peptide_pooler::engine::config as core_config;
use peptide_pooler::engine::config::TierLevel;
use tracing::debug;

pub fn build_config(args: &ConfigArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(&args.config)?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let volumes_file = file_config.volumes.take().unwrap_or_default();
    let min_pipette_volume = args.min_pipette_volume.or(volumes_file.min_pipette_volume);
    let max_peptide_usage_volume = args
        .max_peptide_usage_volume
        .or(volumes_file.max_peptide_usage_volume);
    let max_pool_volume = args.max_pool_volume.or(volumes_file.max_pool_volume);

    let dilution_factors = merge_dilution_factors(
        file_config.dilution_factors.take().unwrap_or_default(),
        &defaults,
    );

    let mut builder = core_config::PoolingConfigBuilder::new().dilution_factors(dilution_factors);
    if let Some(v) = min_pipette_volume {
        builder = builder.min_pipette_volume(v);
    }
    if let Some(v) = max_peptide_usage_volume {
        builder = builder.max_peptide_usage_volume(v);
    }
    if let Some(v) = max_pool_volume {
        builder = builder.max_pool_volume(v);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Resolved pooling configuration: {:?}", core_config);

    let layout = file_config
        .labware
        .take()
        .map(|labware| build_layout(labware, &defaults))
        .transpose()?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        core_config,
        layout,
    })
}

fn merge_dilution_factors(
    file_val: FileDilutionFactors,
    defaults: &DefaultsConfig,
) -> core_config::DilutionFactors {
    let merge = |level: TierLevel| file_val.tier(level).or(*defaults.dilution_factors.get(level));
    core_config::DilutionFactors {
        low: merge(TierLevel::Low),
        medium: merge(TierLevel::Medium),
        high: merge(TierLevel::High),
    }
}

fn build_layout(labware: FileLabwareConfig, defaults: &DefaultsConfig) -> Result<LabwareLayout> {
    let plate: DilutionPlate = labware
        .dilution_plate
        .ok_or_else(|| {
            CliError::Config("`labware` requires a `dilution-plate` section".to_string())
        })?
        .into();
    let trays: Vec<Tray> = labware.trays.into_iter().map(Into::into).collect();
    let water = labware.water.map(Into::into).unwrap_or_else(|| {
        WellPosition::new(defaults.water_labware.as_str(), defaults.water_well.as_str())
    });
    let pool = labware.pool.map(Into::into).unwrap_or_else(|| {
        WellPosition::new(defaults.pool_labware.as_str(), defaults.pool_well.as_str())
    });
    Ok(LabwareLayout::new(&trays, &plate, water, pool)?)
}

fn parse_float(key: &str, value_str: &str) -> Result<f64> {
    value_str
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid float value for {}: {}", key, value_str)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let value = parse_float(key, value_str)?;

        let segments: Vec<&str> = key.split('.').collect();
        match segments.as_slice() {
            ["volumes", field] => {
                let volumes = config.volumes.get_or_insert_with(Default::default);
                let slot = match *field {
                    "min-pipette-volume" => &mut volumes.min_pipette_volume,
                    "max-peptide-usage-volume" => &mut volumes.max_peptide_usage_volume,
                    "max-pool-volume" => &mut volumes.max_pool_volume,
                    _ => return Err(unsupported_key(key)),
                };
                *slot = Some(value);
            }
            ["dilution-factors", tier, field] => {
                let level = TierLevel::ALL
                    .into_iter()
                    .find(|level| level.as_str() == *tier)
                    .ok_or_else(|| unsupported_key(key))?;
                let tier = config
                    .dilution_factors
                    .get_or_insert_with(Default::default)
                    .tier_mut(level);
                let slot = match *field {
                    "volume" => &mut tier.volume,
                    "factor" => &mut tier.factor,
                    _ => return Err(unsupported_key(key)),
                };
                *slot = Some(value);
            }
            _ => return Err(unsupported_key(key)),
        }
    }
    Ok(config)
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}
