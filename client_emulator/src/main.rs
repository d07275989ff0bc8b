use std::env;

use console_cmd::ConsoleCmd;
use console_input::console_input_thread;
use msgs::{client_server_msg::ClientServerMsg, client_type::ClientType, server_client_msg::ServerClientMsg, server_connection_process::spawn_server_connection_process};
use presenter::ConsolePresenter;
use scoring::{MatchConfig, PlayerView, ScoreKeeper};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod console_cmd;
mod console_input;
mod presenter;

const DEFAULT_SERVER_ADDR: &str = "localhost:1302";
const DEFAULT_CONFIG_PATH: &str = "match_config.json";
const CONFIG_PATH_VAR: &str = "PUCK_MATCH_CONFIG";

type Replica = ScoreKeeper<(), ConsolePresenter>;

/// `client_emulator [table|spectator] [host:port]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut client_type = ClientType::Spectator;
    let mut server_addr = env::var("PUCK_SERVER").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_owned());
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "table" => client_type = ClientType::Table,
            "spectator" => client_type = ClientType::Spectator,
            _ => server_addr = arg,
        }
    }

    let config_path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let config = MatchConfig::load_or_default(config_path);
    let view = PlayerView::select(config.view);
    info!("joining as {client_type:?} through the {view}");

    let (server_to_main, mut main_from_server) = mpsc::channel(100);
    let to_server = spawn_server_connection_process(server_addr, server_to_main);

    let mut keeper = ScoreKeeper::replica(config, ConsolePresenter::new(view));
    let mut console_receiver = console_input_thread();

    loop {
        tokio::select! {
            result = main_from_server.recv() => {
                let Some(msg) = result else {
                    info!("lost connection to the score server");
                    break;
                };
                // Every session starts as a spectator, including ones the
                // connection process opened after a drop.
                if matches!(msg, ServerClientMsg::Hello { .. }) {
                    to_server.send(ClientServerMsg::SetClientType(client_type)).await?;
                }
                process_server_client_msg(msg, &mut keeper);
            }
            result = console_receiver.recv() => {
                let Some(console_str) = result else { break };
                let cmd = match ConsoleCmd::parse(console_str.trim()) {
                    Ok(cmd) => cmd,
                    Err(err) => {
                        println!("err: {err}");
                        continue;
                    }
                };
                match cmd {
                    ConsoleCmd::Goal (team) => {
                        if client_type != ClientType::Table {
                            warn!("only the table reports goals, the server will ignore this one");
                        }
                        to_server.send(ClientServerMsg::GoalEntered(team)).await?;
                    }
                    ConsoleCmd::Reset => {
                        if let Err(e) = keeper.reset_match() {
                            println!("err: {e}");
                        }
                    }
                    ConsoleCmd::Status => {
                        let json = serde_json::to_string_pretty(&keeper.snapshot())?;
                        println!("{json}");
                    }
                    ConsoleCmd::Quit => {
                        to_server.send(ClientServerMsg::Disconnect).await?;
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}

fn process_server_client_msg(msg: ServerClientMsg, keeper: &mut Replica) {
    match msg {
        ServerClientMsg::Hello { session_id, snapshot } => {
            info!("session id: {session_id}");
            keeper.resync(&snapshot);
        }
        ServerClientMsg::ClientConnected (session_id) => {
            info!("client connected: {session_id}");
        }
        ServerClientMsg::ClientDisconnected (session_id) => {
            info!("client disconnected: {session_id}");
        }
        ServerClientMsg::Score (broadcast) => {
            if !keeper.apply(&broadcast) {
                debug!("ignored stale broadcast");
            }
        }
    }
    keeper.presenter_mut().flush();
}
