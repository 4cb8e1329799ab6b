//! Model descriptions
//!
//! A model is identified by name and belongs to a closed set of families.
//! Family resolution happens exactly once, at deserialization or via
//! [`FromStr`]; downstream code matches on the enum instead of re-inspecting
//! string tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known model families
///
/// Adding a family means adding a variant here and a tag in [`FromStr`];
/// there is deliberately no escape hatch for unknown tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    #[serde(rename = "MACE")]
    Mace,
    #[serde(rename = "ORB")]
    Orb,
    #[serde(rename = "SevenNet")]
    SevenNet,
    #[serde(rename = "EquiformerV2")]
    EquiformerV2,
    #[serde(rename = "MatterSim")]
    MatterSim,
    #[serde(rename = "DP")]
    DeepPotential,
    /// Non-learned baseline used for score normalization
    #[serde(rename = "Dummy")]
    Dummy,
}

impl ModelFamily {
    /// Canonical tag as it appears in configuration and record files
    pub fn tag(&self) -> &'static str {
        match self {
            ModelFamily::Mace => "MACE",
            ModelFamily::Orb => "ORB",
            ModelFamily::SevenNet => "SevenNet",
            ModelFamily::EquiformerV2 => "EquiformerV2",
            ModelFamily::MatterSim => "MatterSim",
            ModelFamily::DeepPotential => "DP",
            ModelFamily::Dummy => "Dummy",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MACE" => Ok(ModelFamily::Mace),
            "ORB" => Ok(ModelFamily::Orb),
            "SevenNet" => Ok(ModelFamily::SevenNet),
            "EquiformerV2" => Ok(ModelFamily::EquiformerV2),
            "MatterSim" => Ok(ModelFamily::MatterSim),
            "DP" => Ok(ModelFamily::DeepPotential),
            "Dummy" => Ok(ModelFamily::Dummy),
            other => Err(format!("unknown model family '{other}'")),
        }
    }
}

/// One benchmarked model and its leaderboard gating flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub model_name: String,
    pub model_family: ModelFamily,
    /// Include direct force-field prediction results
    #[serde(default)]
    pub show_direct_task: bool,
    /// Include finetune/property results
    #[serde(default)]
    pub show_finetune_task: bool,
    /// Include calculator (MD stability, efficiency) results
    #[serde(default)]
    pub show_calculator_task: bool,
}

impl ModelSpec {
    /// A model gets a ranking row iff at least one task category is enabled.
    pub fn on_leaderboard(&self) -> bool {
        self.show_direct_task || self.show_finetune_task || self.show_calculator_task
    }
}
