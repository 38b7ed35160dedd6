use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Saved filter panel state: the enable switch and slider positions.
///
/// Positions are keyed by filter id (`"exposure"`, ...) and stored in the
/// normalized `[0, 1]` slider domain, not as native values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterSettings {
    pub enabled: bool,
    pub positions: HashMap<String, f32>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            positions: HashMap::new(),
        }
    }
}
