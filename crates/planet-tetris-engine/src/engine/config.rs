use serde::{Deserialize, Serialize};

use crate::core::board::BoardDimensions;

use super::piece_generator::SelectionPolicy;

/// Tunables shared by every side of a planet.
///
/// Missing fields fall back to their defaults, so `{}` is a valid configuration.
///
/// # Example
///
/// ```
/// use planet_tetris_engine::{GameConfig, SelectionPolicy};
///
/// let config: GameConfig = serde_json::from_str(
///     r#"{ "dimensions": { "width": 12, "visibleHeight": 22, "hiddenRows": 4 },
///          "selectionPolicy": "sevenBag" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.dimensions.width(), 12);
/// assert_eq!(config.dimensions.height(), 26);
/// assert_eq!(config.selection_policy, SelectionPolicy::SevenBag);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub dimensions: BoardDimensions,
    pub selection_policy: SelectionPolicy,
}
