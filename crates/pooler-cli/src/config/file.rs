use crate::error::{CliError, Result};
use peptide_pooler::core::labware::layout::{DilutionPlate, Tray};
use peptide_pooler::core::models::peptide::PeptideId;
use peptide_pooler::core::models::transfer::WellPosition;
use peptide_pooler::engine::config::{DilutionTier, TierLevel};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileVolumesConfig {
    #[serde(rename = "min-pipette-volume")]
    pub min_pipette_volume: Option<f64>,
    #[serde(rename = "max-peptide-usage-volume")]
    pub max_peptide_usage_volume: Option<f64>,
    #[serde(rename = "max-pool-volume")]
    pub max_pool_volume: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct FileDilutionTier {
    pub volume: Option<f64>,
    pub factor: Option<f64>,
}

impl FileDilutionTier {
    /// Fills unset fields from `fallback`.
    pub fn or(self, fallback: DilutionTier) -> DilutionTier {
        DilutionTier {
            volume: self.volume.unwrap_or(fallback.volume),
            factor: self.factor.unwrap_or(fallback.factor),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileDilutionFactors {
    pub low: Option<FileDilutionTier>,
    pub medium: Option<FileDilutionTier>,
    pub high: Option<FileDilutionTier>,
}

impl FileDilutionFactors {
    pub fn tier_mut(&mut self, level: TierLevel) -> &mut FileDilutionTier {
        let slot = match level {
            TierLevel::Low => &mut self.low,
            TierLevel::Medium => &mut self.medium,
            TierLevel::High => &mut self.high,
        };
        slot.get_or_insert_with(Default::default)
    }

    pub fn tier(&self, level: TierLevel) -> FileDilutionTier {
        match level {
            TierLevel::Low => self.low,
            TierLevel::Medium => self.medium,
            TierLevel::High => self.high,
        }
        .unwrap_or_default()
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileWellLocation {
    pub name: String,
    pub well: String,
}

impl From<FileWellLocation> for WellPosition {
    fn from(p: FileWellLocation) -> Self {
        WellPosition::new(p.name, p.well)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSampleHolder {
    pub name: String,
    #[serde(default)]
    pub samples: Vec<u32>,
}

impl From<FileSampleHolder> for Tray {
    fn from(p: FileSampleHolder) -> Self {
        Self {
            name: p.name,
            samples: p.samples.into_iter().map(PeptideId::from).collect(),
        }
    }
}

impl From<FileSampleHolder> for DilutionPlate {
    fn from(p: FileSampleHolder) -> Self {
        Self {
            name: p.name,
            samples: p.samples.into_iter().map(PeptideId::from).collect(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileLabwareConfig {
    #[serde(default)]
    pub trays: Vec<FileSampleHolder>,
    #[serde(rename = "dilution-plate")]
    pub dilution_plate: Option<FileSampleHolder>,
    pub water: Option<FileWellLocation>,
    pub pool: Option<FileWellLocation>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub volumes: Option<FileVolumesConfig>,
    #[serde(rename = "dilution-factors")]
    pub dilution_factors: Option<FileDilutionFactors>,
    pub labware: Option<FileLabwareConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_full_configuration() {
        let config = FileConfig::from_toml_str(
            r#"
            [volumes]
            min-pipette-volume = 2.0
            max-peptide-usage-volume = 50.0
            max-pool-volume = 20.0

            [dilution-factors.low]
            volume = 2.0
            factor = 5.0

            [dilution-factors.high]
            factor = 1.5

            [labware]
            water = { name = "Reservoir", well = "A1" }
            pool = { name = "PoolTube", well = "B2" }

            [[labware.trays]]
            name = "Tray1"
            samples = [1, 2]

            [labware.dilution-plate]
            name = "Plate96"
            samples = [2, 1]
            "#,
        )
        .unwrap();

        let volumes = config.volumes.unwrap();
        assert_eq!(volumes.min_pipette_volume, Some(2.0));
        assert_eq!(volumes.max_pool_volume, Some(20.0));

        let factors = config.dilution_factors.unwrap();
        assert_eq!(factors.tier(TierLevel::Low).factor, Some(5.0));
        assert_eq!(factors.tier(TierLevel::Medium).volume, None);
        assert_eq!(factors.tier(TierLevel::High).volume, None);
        assert_eq!(factors.tier(TierLevel::High).factor, Some(1.5));

        let labware = config.labware.unwrap();
        assert_eq!(labware.trays.len(), 1);
        assert_eq!(labware.trays[0].samples, vec![1, 2]);
        assert_eq!(labware.dilution_plate.unwrap().name, "Plate96");
        assert_eq!(labware.pool.unwrap().well, "B2");
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = FileConfig::from_toml_str(
            r#"
            [volumes]
            min-volume = 2.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unset_tier_fields_fall_back() {
        let tier = FileDilutionTier {
            volume: None,
            factor: Some(3.0),
        };
        assert_eq!(
            tier.or(DilutionTier::new(10.0, 2.0)),
            DilutionTier::new(10.0, 3.0)
        );
    }

    #[test]
    fn malformed_file_is_a_parsing_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "this is not toml").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
