use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' must be a positive, finite volume, got {value}")]
    InvalidVolume { name: &'static str, value: f64 },

    #[error("Dilution tier '{tier}' has an invalid {field}: {value}")]
    InvalidTier {
        tier: TierLevel,
        field: &'static str,
        value: f64,
    },

    #[error(
        "Dilution tier thresholds must not decrease: '{lower}' is {lower_volume} but '{upper}' is {upper_volume}"
    )]
    UnorderedTiers {
        lower: TierLevel,
        lower_volume: f64,
        upper: TierLevel,
        upper_volume: f64,
    },
}

/// The three buckets of the dilution factor table, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierLevel {
    Low,
    Medium,
    High,
}

impl TierLevel {
    pub const ALL: [TierLevel; 3] = [TierLevel::Low, TierLevel::Medium, TierLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierLevel::Low => "low",
            TierLevel::Medium => "medium",
            TierLevel::High => "high",
        }
    }

    /// Whether scaling into this tier recomputes the diluted concentration.
    ///
    /// The low tier keeps the concentration computed from the unscaled volumes.
    pub fn recomputes_concentration(&self) -> bool {
        !matches!(self, TierLevel::Low)
    }
}

impl fmt::Display for TierLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A water-volume threshold and the factor applied to water and peptide volumes at or below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DilutionTier {
    pub volume: f64,
    pub factor: f64,
}

impl DilutionTier {
    pub fn new(volume: f64, factor: f64) -> Self {
        Self { volume, factor }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DilutionFactors {
    pub low: DilutionTier,
    pub medium: DilutionTier,
    pub high: DilutionTier,
}

impl DilutionFactors {
    pub fn get(&self, level: TierLevel) -> &DilutionTier {
        match level {
            TierLevel::Low => &self.low,
            TierLevel::Medium => &self.medium,
            TierLevel::High => &self.high,
        }
    }

    /// Returns the first tier, in low → medium → high order, whose threshold is not below `water`.
    pub fn select(&self, water: f64) -> Option<TierLevel> {
        TierLevel::ALL
            .into_iter()
            .find(|&level| water <= self.get(level).volume)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeLimits {
    /// Smallest volume the device can reliably transfer.
    pub min_pipette_volume: f64,
    /// Ceiling on any single draw from a neat stock.
    pub max_peptide_usage_volume: f64,
    /// Ceiling on the combined pool volume.
    pub max_pool_volume: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolingConfig {
    pub volumes: VolumeLimits,
    pub dilution_factors: DilutionFactors,
}

#[derive(Default)]
pub struct PoolingConfigBuilder {
    min_pipette_volume: Option<f64>,
    max_peptide_usage_volume: Option<f64>,
    max_pool_volume: Option<f64>,
    low_tier: Option<DilutionTier>,
    medium_tier: Option<DilutionTier>,
    high_tier: Option<DilutionTier>,
}

impl PoolingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_pipette_volume(mut self, volume: f64) -> Self {
        self.min_pipette_volume = Some(volume);
        self
    }
    pub fn max_peptide_usage_volume(mut self, volume: f64) -> Self {
        self.max_peptide_usage_volume = Some(volume);
        self
    }
    pub fn max_pool_volume(mut self, volume: f64) -> Self {
        self.max_pool_volume = Some(volume);
        self
    }
    pub fn tier(mut self, level: TierLevel, tier: DilutionTier) -> Self {
        match level {
            TierLevel::Low => self.low_tier = Some(tier),
            TierLevel::Medium => self.medium_tier = Some(tier),
            TierLevel::High => self.high_tier = Some(tier),
        }
        self
    }
    pub fn dilution_factors(self, factors: DilutionFactors) -> Self {
        self.tier(TierLevel::Low, factors.low)
            .tier(TierLevel::Medium, factors.medium)
            .tier(TierLevel::High, factors.high)
    }

    pub fn build(self) -> Result<PoolingConfig, ConfigError> {
        let volumes = VolumeLimits {
            min_pipette_volume: positive_volume(
                "min_pipette_volume",
                self.min_pipette_volume
                    .ok_or(ConfigError::MissingParameter("min_pipette_volume"))?,
            )?,
            max_peptide_usage_volume: positive_volume(
                "max_peptide_usage_volume",
                self.max_peptide_usage_volume
                    .ok_or(ConfigError::MissingParameter("max_peptide_usage_volume"))?,
            )?,
            max_pool_volume: positive_volume(
                "max_pool_volume",
                self.max_pool_volume
                    .ok_or(ConfigError::MissingParameter("max_pool_volume"))?,
            )?,
        };
        let dilution_factors = DilutionFactors {
            low: self
                .low_tier
                .ok_or(ConfigError::MissingParameter("dilution_factors.low"))?,
            medium: self
                .medium_tier
                .ok_or(ConfigError::MissingParameter("dilution_factors.medium"))?,
            high: self
                .high_tier
                .ok_or(ConfigError::MissingParameter("dilution_factors.high"))?,
        };
        validate_tiers(&dilution_factors)?;

        Ok(PoolingConfig {
            volumes,
            dilution_factors,
        })
    }
}

fn positive_volume(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidVolume { name, value })
    }
}

fn validate_tiers(factors: &DilutionFactors) -> Result<(), ConfigError> {
    for level in TierLevel::ALL {
        let tier = factors.get(level);
        if !tier.volume.is_finite() {
            return Err(ConfigError::InvalidTier {
                tier: level,
                field: "volume",
                value: tier.volume,
            });
        }
        if !(tier.factor.is_finite() && tier.factor >= 0.0) {
            return Err(ConfigError::InvalidTier {
                tier: level,
                field: "factor",
                value: tier.factor,
            });
        }
    }
    for pair in TierLevel::ALL.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        let (lower_volume, upper_volume) = (factors.get(lower).volume, factors.get(upper).volume);
        if lower_volume > upper_volume {
            return Err(ConfigError::UnorderedTiers {
                lower,
                lower_volume,
                upper,
                upper_volume,
            });
        }
    }
    Ok(())
}
