use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The aggregation passes, addressable from config by kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    PrizesPerYear,
    AvgSharePerYear,
    TopCountries,
    CountryTotals,
    CategoryByCountry,
    CumulativeByCountry,
    TopOrganizations,
    TopOrgCities,
    TopBirthCities,
    OrgHierarchy,
}

impl Pass {
    pub const ALL: [Pass; 10] = [
        Pass::PrizesPerYear,
        Pass::AvgSharePerYear,
        Pass::TopCountries,
        Pass::CountryTotals,
        Pass::CategoryByCountry,
        Pass::CumulativeByCountry,
        Pass::TopOrganizations,
        Pass::TopOrgCities,
        Pass::TopBirthCities,
        Pass::OrgHierarchy,
    ];
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the input CSV.
    pub input_path: PathBuf,
    /// Where the chart sink drops its output.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Subset of passes to run; all of them when omitted.
    #[serde(default)]
    pub passes: Option<Vec<Pass>>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("charts")
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn selected(&self) -> Vec<Pass> {
        self.passes
            .clone()
            .unwrap_or_else(|| Pass::ALL.to_vec())
    }
}
