use serde::{Deserialize, Serialize};

use crate::units::Units;

/// User preferences persisted next to the session history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub units: Units,
}
