use anyhow::Context;
use msgs::{position::Position, score_msg::{MatchSnapshot, ScoreBroadcast}, server_client_msg::ServerClientMsg, team::Team};
use scoring::{Broadcaster, GoalOutcome, MatchConfig, Presenter, ScoreKeeper};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::broadcast_msg::{Address, BroadcastMsg};

#[derive(Debug)]
pub enum MatchCmd {
    Goal (Team),
    Reset,
    /// Greets a session with the current snapshot, in line with the score
    /// broadcasts so nothing it already contains is delivered after it.
    Join (u16),
    Snapshot (oneshot::Sender<MatchSnapshot>),
}

/// Cloneable way in to the task that owns the authoritative keeper.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    to_match: mpsc::Sender<MatchCmd>,
}

impl MatchHandle {
    pub async fn goal(&self, team: Team) -> anyhow::Result<()> {
        self.send(MatchCmd::Goal(team)).await
    }

    pub async fn reset(&self) -> anyhow::Result<()> {
        self.send(MatchCmd::Reset).await
    }

    pub async fn join(&self, session_id: u16) -> anyhow::Result<()> {
        self.send(MatchCmd::Join(session_id)).await
    }

    pub async fn snapshot(&self) -> anyhow::Result<MatchSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(MatchCmd::Snapshot(reply)).await?;
        response.await.context("match process dropped the snapshot request")
    }

    async fn send(&self, cmd: MatchCmd) -> anyhow::Result<()> {
        self.to_match.send(cmd).await.context("match process stopped")
    }
}

/// Packs every score event and fans it out to all sessions.
pub struct ChannelBroadcaster {
    tx: broadcast::Sender<BroadcastMsg>,
}

impl ChannelBroadcaster {
    fn send(&self, address: Address, msg: ServerClientMsg) {
        let mut output_buffer = Vec::new();
        if let Err(e) = msg.pack(&mut output_buffer) {
            error!("error while packing {msg:?}: {e}");
            return;
        }
        if self.tx.send(BroadcastMsg::Send(address, output_buffer)).is_err() {
            debug!("no participants connected, {msg:?} not delivered");
        }
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn broadcast(&mut self, msg: ScoreBroadcast) {
        self.send(Address::All, ServerClientMsg::Score(msg));
    }
}

/// The host's own view of the match, written to the log.
pub struct HostPresenter;

impl Presenter for HostPresenter {
    fn show_scores(&mut self, blue: u32, red: u32) {
        info!("score board: Blue {blue} - {red} Red");
    }

    fn show_banner(&mut self, banner: Option<&str>) {
        if let Some(banner) = banner {
            info!("{banner} (type `reset` to restart)");
        }
    }

    fn place_ball(&mut self, position: Position) {
        debug!("puck placed at ({}, {}, {})", position.x, position.y, position.z);
    }
}

pub fn spawn_match_process(config: MatchConfig, tx: broadcast::Sender<BroadcastMsg>) -> MatchHandle {
    let (to_match, mut match_from_handles) = mpsc::channel::<MatchCmd>(100);
    tokio::spawn(async move {
        let mut keeper = ScoreKeeper::authority(config, ChannelBroadcaster { tx }, HostPresenter);
        while let Some(cmd) = match_from_handles.recv().await {
            process_match_cmd(&mut keeper, cmd);
        }
        debug!("all match handles dropped, stopping match process");
    });
    MatchHandle { to_match }
}

fn process_match_cmd(keeper: &mut ScoreKeeper<ChannelBroadcaster, HostPresenter>, cmd: MatchCmd) {
    match cmd {
        MatchCmd::Goal (team) => {
            match keeper.register_goal(team) {
                Ok(GoalOutcome::Ignored) => info!("{team} goal ignored, match is over"),
                Ok(_) => {}
                Err(e) => warn!("{e}"),
            }
        }
        MatchCmd::Reset => {
            if let Err(e) = keeper.reset_match() {
                warn!("{e}");
            }
        }
        MatchCmd::Join (session_id) => {
            let snapshot = keeper.snapshot();
            keeper.broadcaster().send(Address::Client(session_id), ServerClientMsg::Hello { session_id, snapshot });
        }
        MatchCmd::Snapshot (reply) => {
            if reply.send(keeper.snapshot()).is_err() {
                debug!("snapshot requester went away");
            }
        }
    }
}
