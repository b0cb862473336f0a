//! owobridge-common/src/models/muscle.rs
//!
//! The fixed set of body regions the suit can drive.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Muscle {
    #[serde(rename = "Pectoral_R")]
    PectoralR,
    #[serde(rename = "Pectoral_L")]
    PectoralL,
    #[serde(rename = "Abdominal_R")]
    AbdominalR,
    #[serde(rename = "Abdominal_L")]
    AbdominalL,
    #[serde(rename = "Arm_R")]
    ArmR,
    #[serde(rename = "Arm_L")]
    ArmL,
    #[serde(rename = "Dorsal_R")]
    DorsalR,
    #[serde(rename = "Dorsal_L")]
    DorsalL,
    #[serde(rename = "Lumbar_R")]
    LumbarR,
    #[serde(rename = "Lumbar_L")]
    LumbarL,
}

impl Muscle {
    pub const ALL: [Muscle; 10] = [
        Muscle::PectoralR,
        Muscle::PectoralL,
        Muscle::AbdominalR,
        Muscle::AbdominalL,
        Muscle::ArmR,
        Muscle::ArmL,
        Muscle::DorsalR,
        Muscle::DorsalL,
        Muscle::LumbarR,
        Muscle::LumbarL,
    ];

    /// Index the vendor library uses for this region.
    pub fn vendor_index(self) -> i32 {
        match self {
            Muscle::PectoralR => 0,
            Muscle::PectoralL => 1,
            Muscle::AbdominalR => 2,
            Muscle::AbdominalL => 3,
            Muscle::ArmR => 4,
            Muscle::ArmL => 5,
            Muscle::DorsalR => 6,
            Muscle::DorsalL => 7,
            Muscle::LumbarR => 8,
            Muscle::LumbarL => 9,
        }
    }

    /// Region name as it appears in avatar parameter names, e.g. `Pectoral_R`.
    pub fn as_str(self) -> &'static str {
        match self {
            Muscle::PectoralR => "Pectoral_R",
            Muscle::PectoralL => "Pectoral_L",
            Muscle::AbdominalR => "Abdominal_R",
            Muscle::AbdominalL => "Abdominal_L",
            Muscle::ArmR => "Arm_R",
            Muscle::ArmL => "Arm_L",
            Muscle::DorsalR => "Dorsal_R",
            Muscle::DorsalL => "Dorsal_L",
            Muscle::LumbarR => "Lumbar_R",
            Muscle::LumbarL => "Lumbar_L",
        }
    }
}

impl fmt::Display for Muscle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Muscle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Muscle::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown muscle '{s}'"))
    }
}
