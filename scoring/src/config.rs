use std::{num::NonZeroU32, path::Path};

use msgs::position::Position;
use tracing::warn;

use crate::view::PlayerView;

pub const DEFAULT_GOALS_TARGET: NonZeroU32 = match NonZeroU32::new(5) {
    Some(goals_target) => goals_target,
    None => panic!("goal target must be positive"),
};
pub const DEFAULT_RESET_POSITION: Position = Position::new(0.0, 8.3, -60.6);

/// Match rules and table layout. Fixed for the lifetime of a match.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    pub goals_target: NonZeroU32,
    pub reset_position: Position,
    pub view: Option<PlayerView>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            goals_target: DEFAULT_GOALS_TARGET,
            reset_position: DEFAULT_RESET_POSITION,
            view: None,
        }
    }
}

impl MatchConfig {
    pub fn with_goals_target(goals_target: NonZeroU32) -> MatchConfig {
        MatchConfig {
            goals_target,
            ..Default::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<MatchConfig> {
        let json = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<MatchConfig>(&json)?;
        Ok(config)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> MatchConfig {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("could not load match config from {}: {e}, using defaults", path.display());
                MatchConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: MatchConfig = serde_json::from_str(r#"{ "goals_target": 3 }"#).unwrap();
        assert_eq!(config.goals_target.get(), 3);
        assert_eq!(config.reset_position, DEFAULT_RESET_POSITION);
        assert_eq!(config.view, None);
    }

    #[test]
    fn zero_goal_target_is_rejected() {
        assert!(serde_json::from_str::<MatchConfig>(r#"{ "goals_target": 0 }"#).is_err());
    }

    #[test]
    fn view_override_parses() {
        let config: MatchConfig = serde_json::from_str(r#"{ "view": "augmented_reality" }"#).unwrap();
        assert_eq!(config.goals_target, DEFAULT_GOALS_TARGET);
        assert_eq!(config.view, Some(PlayerView::AugmentedReality));
    }

    #[test]
    fn server_layout_is_not_a_match_config() {
        let err = serde_json::from_str::<MatchConfig>(r#"{ "port": 4000, "match": { "goals_target": 3 } }"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn unreadable_file_gives_defaults() {
        let config = MatchConfig::load_or_default("does/not/exist.json");
        assert_eq!(config, MatchConfig::default());
    }
}
