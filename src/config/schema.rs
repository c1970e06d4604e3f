use serde::{Deserialize, Serialize};

use crate::scoring::{ColumnConfig, PointsConfig};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub points: PointsConfig,
    #[serde(default)]
    pub columns: ColumnConfig,
}
