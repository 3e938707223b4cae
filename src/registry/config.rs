//! Registry configuration

use serde::{Deserialize, Serialize};

/// Controls which add lines the discovery pass turns into units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Type suffixes marking simulation bookkeeping rather than battle
    /// units (slip and turn waypoint markers). Add lines whose declared
    /// type ends in one of these never become units.
    pub marker_suffixes: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            marker_suffixes: vec!["Point of Slip".to_string(), "Point of Turn".to_string()],
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.marker_suffixes.iter().any(|suffix| suffix.is_empty()) {
            return Err("marker suffixes must be non-empty".to_string());
        }
        Ok(())
    }
}
