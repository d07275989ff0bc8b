use std::fmt;

/// Which player camera a participant renders through. Chosen once at
/// startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerView {
    /// Regular camera following the player's paddle.
    Desktop,
    /// Camera posed from the phone's movement around the table marker.
    AugmentedReality,
}

impl PlayerView {
    pub fn detect() -> PlayerView {
        Self::for_os(std::env::consts::OS)
    }

    pub fn for_os(os: &str) -> PlayerView {
        match os {
            "android" | "ios" => PlayerView::AugmentedReality,
            _ => PlayerView::Desktop,
        }
    }

    /// Configured override wins over detection.
    pub fn select(configured: Option<PlayerView>) -> PlayerView {
        configured.unwrap_or_else(Self::detect)
    }
}

impl fmt::Display for PlayerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerView::Desktop => f.write_str("desktop camera"),
            PlayerView::AugmentedReality => f.write_str("augmented reality camera"),
        }
    }
}
