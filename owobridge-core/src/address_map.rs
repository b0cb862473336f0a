//! src/address_map.rs
//!
//! Bidirectional lookup between OSC addresses and suit muscles. Built once,
//! read-only afterwards.

use std::collections::HashMap;

use crate::Error;
use crate::models::Muscle;

/// Prefix VRChat puts in front of every avatar parameter.
pub const AVATAR_PARAMETER_PREFIX: &str = "/avatar/parameters/";

/// The avatar parameter address a muscle is wired to by default,
/// e.g. `/avatar/parameters/owo_suit_Pectoral_R`.
pub fn default_address(muscle: Muscle) -> String {
    format!("{AVATAR_PARAMETER_PREFIX}owo_suit_{}", muscle.as_str())
}

#[derive(Debug, Clone)]
pub struct AddressMap {
    by_address: HashMap<String, Muscle>,
    by_muscle: HashMap<Muscle, String>,
}

impl AddressMap {
    /// Build from (address, muscle) pairs. Either side repeating is an error,
    /// since the map must stay a bijection.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, Muscle)>,
        S: Into<String>,
    {
        let mut by_address = HashMap::new();
        let mut by_muscle = HashMap::new();
        for (address, muscle) in pairs {
            let address = address.into();
            if by_address.contains_key(&address) {
                return Err(Error::Config(format!("Address '{address}' is mapped twice")));
            }
            if let Some(existing) = by_muscle.get(&muscle) {
                return Err(Error::Config(format!(
                    "Muscle {muscle} is mapped to both '{existing}' and '{address}'"
                )));
            }
            by_address.insert(address.clone(), muscle);
            by_muscle.insert(muscle, address);
        }
        Ok(Self { by_address, by_muscle })
    }

    pub fn muscle_for(&self, address: &str) -> Option<Muscle> {
        self.by_address.get(address).copied()
    }

    pub fn address_for(&self, muscle: Muscle) -> Option<&str> {
        self.by_muscle.get(&muscle).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.by_address.keys().map(String::as_str)
    }
}

impl Default for AddressMap {
    /// The ten `owo_suit_*` avatar parameters.
    fn default() -> Self {
        let by_address: HashMap<String, Muscle> = Muscle::ALL
            .iter()
            .map(|m| (default_address(*m), *m))
            .collect();
        let by_muscle = by_address.iter().map(|(a, m)| (*m, a.clone())).collect();
        Self { by_address, by_muscle }
    }
}
