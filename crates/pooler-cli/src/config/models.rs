use peptide_pooler::core::labware::layout::LabwareLayout;
use peptide_pooler::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub core_config: core_config::PoolingConfig,
    /// `None` when the configuration file has no `[labware]` section.
    pub layout: Option<LabwareLayout>,
}
