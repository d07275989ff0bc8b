use msgs::{position::Position, score_msg::{MatchSnapshot, ScoreBroadcast, ScoreEvent}, team::Team};
use tracing::{debug, info, warn};

use crate::{broadcaster::Broadcaster, config::MatchConfig, error::ScoreError, presenter::Presenter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The single participant whose mutations are canonical.
    Authority,
    /// Applies what the authority broadcasts, never mutates on its own.
    Replica,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub blue: u32,
    pub red: u32,
}

impl MatchScore {
    fn get_mut(&mut self, team: Team) -> &mut u32 {
        match team {
            Team::Blue => &mut self.blue,
            Team::Red => &mut self.red,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchState {
    pub is_over: bool,
    pub winner_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOutcome {
    Scored,
    Won,
    /// The match was already over, nothing changed.
    Ignored,
}

pub fn winner_message(team: Team) -> String {
    format!("Player {team} IS THE WINNER !!!")
}

/// Score bookkeeping for one match.
///
/// On the authority, `register_goal` and `reset_match` mutate the score and
/// publish each change through `publish`, which runs the same receiver
/// handlers locally before handing the event to the broadcaster. Replicas
/// only ever run the handlers, fed from the network through `apply`.
pub struct ScoreKeeper<B, P> {
    role: Role,
    config: MatchConfig,
    round: u32,
    score: MatchScore,
    state: MatchState,
    broadcaster: B,
    presenter: P,
}

impl<B: Broadcaster, P: Presenter> ScoreKeeper<B, P> {
    pub fn authority(config: MatchConfig, broadcaster: B, presenter: P) -> Self {
        ScoreKeeper {
            role: Role::Authority,
            config,
            round: 0,
            score: MatchScore::default(),
            state: MatchState::default(),
            broadcaster,
            presenter,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> MatchScore {
        self.score
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_over { Phase::Over } else { Phase::Playing }
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The restart button is only offered on the host once a match is over.
    pub fn restart_available(&self) -> bool {
        self.role == Role::Authority && self.state.is_over
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            round: self.round,
            blue: self.score.blue,
            red: self.score.red,
            is_over: self.state.is_over,
            winner_message: self.state.winner_message.as_str().into(),
        }
    }

    pub fn on_blue_goal_entered(&mut self) -> Result<GoalOutcome, ScoreError> {
        self.register_goal(Team::Blue)
    }

    pub fn on_red_goal_entered(&mut self) -> Result<GoalOutcome, ScoreError> {
        self.register_goal(Team::Red)
    }

    pub fn register_goal(&mut self, team: Team) -> Result<GoalOutcome, ScoreError> {
        self.ensure_authority("register_goal")?;
        if self.state.is_over {
            debug!("ignoring {team} goal, match is over");
            return Ok(GoalOutcome::Ignored);
        }

        let score = self.score.get_mut(team);
        *score += 1;
        let score = *score;

        self.publish(ScoreEvent::PlayScoreSound);

        let outcome = if score >= self.config.goals_target.get() {
            info!("{team} reached {score} goals and wins round {}", self.round);
            self.publish(ScoreEvent::SetIsOver(true));
            self.publish(ScoreEvent::SetGameOverMessage(winner_message(team).into()));
            GoalOutcome::Won
        }
        else {
            GoalOutcome::Scored
        };

        let MatchScore { blue, red } = self.score;
        self.publish(ScoreEvent::UpdateScoreBoard { blue, red });
        Ok(outcome)
    }

    pub fn reset_match(&mut self) -> Result<(), ScoreError> {
        self.ensure_authority("reset_match")?;
        self.round = self.round.wrapping_add(1);
        self.score = MatchScore::default();
        info!("match reset, starting round {}", self.round);

        self.publish(ScoreEvent::UpdateScoreBoard { blue: 0, red: 0 });
        self.publish(ScoreEvent::PlaceBall(self.config.reset_position));
        self.publish(ScoreEvent::SetIsOver(false));
        self.publish(ScoreEvent::SetGameOverMessage("".into()));
        Ok(())
    }

    /// Receiver-side dispatch. Returns `false` when the broadcast belongs to
    /// an older round and was dropped.
    pub fn apply(&mut self, msg: &ScoreBroadcast) -> bool {
        if msg.round < self.round {
            debug!("dropping stale {:?} from round {} (current {})", msg.event, msg.round, self.round);
            return false;
        }
        self.round = msg.round;

        match &msg.event {
            ScoreEvent::PlayScoreSound => self.apply_remote_sound_cue(),
            ScoreEvent::SetIsOver (is_over) => self.apply_remote_is_over(*is_over),
            ScoreEvent::SetGameOverMessage (message) => self.apply_remote_message(message),
            ScoreEvent::UpdateScoreBoard { blue, red } => self.apply_remote_score_update(*blue, *red),
            ScoreEvent::PlaceBall (position) => self.apply_remote_ball_position(*position),
        }
        true
    }

    /// Adopts a full snapshot unless it is older than what we already have.
    pub fn apply_snapshot(&mut self, snapshot: &MatchSnapshot) -> bool {
        if snapshot.round < self.round {
            debug!("dropping stale snapshot from round {}", snapshot.round);
            return false;
        }
        self.round = snapshot.round;
        self.apply_remote_score_update(snapshot.blue, snapshot.red);
        self.state.winner_message = snapshot.winner_message.to_string();
        self.apply_remote_is_over(snapshot.is_over);
        true
    }

    /// Adopts the snapshot of a fresh session whatever its round. A server
    /// that restarted counts rounds from zero again.
    pub fn resync(&mut self, snapshot: &MatchSnapshot) {
        self.round = snapshot.round;
        self.apply_snapshot(snapshot);
    }

    pub fn apply_remote_score_update(&mut self, blue: u32, red: u32) {
        self.score = MatchScore { blue, red };
        self.presenter.show_scores(blue, red);
    }

    pub fn apply_remote_is_over(&mut self, is_over: bool) {
        self.state.is_over = is_over;
        self.show_banner();
    }

    pub fn apply_remote_message(&mut self, message: &str) {
        self.state.winner_message = message.to_owned();
        self.show_banner();
    }

    pub fn apply_remote_sound_cue(&mut self) {
        self.presenter.play_score_sound();
    }

    pub fn apply_remote_ball_position(&mut self, position: Position) {
        self.presenter.place_ball(position);
    }

    fn show_banner(&mut self) {
        let banner = if self.state.is_over && !self.state.winner_message.is_empty() {
            Some(self.state.winner_message.as_str())
        }
        else {
            None
        };
        self.presenter.show_banner(banner);
    }

    fn publish(&mut self, event: ScoreEvent) {
        let msg = ScoreBroadcast { round: self.round, event };
        self.apply(&msg);
        self.broadcaster.broadcast(msg);
    }

    fn ensure_authority(&self, op: &'static str) -> Result<(), ScoreError> {
        if self.role != Role::Authority {
            let e = ScoreError::NotAuthoritative { op };
            warn!("{e}");
            return Err(e);
        }
        Ok(())
    }
}

impl<P: Presenter> ScoreKeeper<(), P> {
    pub fn replica(config: MatchConfig, presenter: P) -> Self {
        ScoreKeeper {
            role: Role::Replica,
            config,
            round: 0,
            score: MatchScore::default(),
            state: MatchState::default(),
            broadcaster: (),
            presenter,
        }
    }
}
