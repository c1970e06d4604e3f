use serde::{Deserialize, Serialize};

/// Points awarded for podium places.
///
/// Ranks beyond third receive nothing.
///
/// Example YAML:
/// ```yaml
/// points:
///   first: 5
///   second: 3
///   third: 1
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PointsConfig {
    /// Points for rank 1 (default: 5)
    #[serde(default = "default_first")]
    pub first: f64,

    /// Points for rank 2 (default: 3)
    #[serde(default = "default_second")]
    pub second: f64,

    /// Points for rank 3 (default: 1)
    #[serde(default = "default_third")]
    pub third: f64,
}

fn default_first() -> f64 {
    5.0
}

fn default_second() -> f64 {
    3.0
}

fn default_third() -> f64 {
    1.0
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            first: default_first(),
            second: default_second(),
            third: default_third(),
        }
    }
}

impl PointsConfig {
    /// Points earned by an entrant holding `rank`.
    pub fn points_for(&self, rank: u32) -> f64 {
        match rank {
            1 => self.first,
            2 => self.second,
            3 => self.third,
            _ => 0.0,
        }
    }
}

/// Names of the input columns the engine reads.
///
/// Example YAML:
/// ```yaml
/// columns:
///   participant_id: "Chest No"
///   marks: [mark1, mark2, mark3]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    /// Unique participant identifier, also the roster join key
    #[serde(default = "default_id_column")]
    pub participant_id: String,

    /// Component score columns, summed into the aggregate score
    #[serde(default = "default_mark_columns")]
    pub marks: Vec<String>,
}

fn default_id_column() -> String {
    "participant_id".to_string()
}

fn default_mark_columns() -> Vec<String> {
    vec!["mark1".to_string(), "mark2".to_string(), "mark3".to_string()]
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            participant_id: default_id_column(),
            marks: default_mark_columns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_config() {
        let config = PointsConfig::default();
        assert_eq!(config.first, 5.0);
        assert_eq!(config.second, 3.0);
        assert_eq!(config.third, 1.0);
    }

    #[test]
    fn test_points_for_rank() {
        let config = PointsConfig {
            first: 10.0,
            second: 6.0,
            third: 2.5,
        };
        assert_eq!(config.points_for(1), 10.0);
        assert_eq!(config.points_for(2), 6.0);
        assert_eq!(config.points_for(3), 2.5);
        assert_eq!(config.points_for(4), 0.0);
        assert_eq!(config.points_for(0), 0.0);
    }

    #[test]
    fn test_points_config_serde_roundtrip() {
        let config = PointsConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: PointsConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_points_config_parse() {
        let yaml = "first: 10\n";
        let config: PointsConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.first, 10.0);
        assert_eq!(config.second, 3.0);
        assert_eq!(config.third, 1.0);
    }

    #[test]
    fn test_unknown_points_field_rejected() {
        let yaml = "fourth: 1\n";
        let result: Result<PointsConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_column_config_parse() {
        let yaml = r#"
participant_id: "Chest No"
marks: [judge_a, judge_b]
"#;
        let config: ColumnConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.participant_id, "Chest No");
        assert_eq!(config.marks, vec!["judge_a", "judge_b"]);
    }

    #[test]
    fn test_empty_column_config_uses_defaults() {
        let config: ColumnConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ColumnConfig::default());
        assert_eq!(config.marks.len(), 3);
    }
}
