pub mod broadcaster;
pub mod config;
pub mod error;
pub mod keeper;
pub mod presenter;
pub mod view;

pub use broadcaster::Broadcaster;
pub use config::MatchConfig;
pub use error::ScoreError;
pub use keeper::{GoalOutcome, MatchScore, MatchState, Phase, Role, ScoreKeeper};
pub use presenter::Presenter;
pub use view::PlayerView;
