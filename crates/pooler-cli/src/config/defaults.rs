use peptide_pooler::engine::config::{DilutionFactors, DilutionTier};

pub struct DefaultsConfig {
    pub dilution_factors: DilutionFactors,
    pub water_labware: String,
    pub water_well: String,
    pub pool_labware: String,
    pub pool_well: String,
    pub plan_file_name: String,
    pub transfers_file_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            dilution_factors: DilutionFactors {
                low: DilutionTier::new(2.0, 5.0),
                medium: DilutionTier::new(10.0, 2.0),
                high: DilutionTier::new(30.0, 1.0),
            },
            water_labware: "Water".to_string(),
            water_well: "A1".to_string(),
            pool_labware: "Pool".to_string(),
            pool_well: "A1".to_string(),
            plan_file_name: "pooling_plan.csv".to_string(),
            transfers_file_name: "transfers.csv".to_string(),
        }
    }
}
