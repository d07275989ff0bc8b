use std::net::SocketAddr;

use msgs::{client_server_msg::ClientServerMsg, client_type::ClientType, server_client_msg::ServerClientMsg};
use tokio::{io::{AsyncReadExt, AsyncWriteExt}, net::TcpStream, sync::broadcast::{self, error::RecvError}};
use tracing::{debug, error, info, warn};

use crate::{broadcast_msg::{Address, BroadcastMsg}, match_process::MatchHandle};

pub struct ClientDb {
    session_id_counter: u16,
    tx: broadcast::Sender<BroadcastMsg>,
    match_handle: MatchHandle,
}

impl ClientDb {
    pub fn new(tx: broadcast::Sender<BroadcastMsg>, match_handle: MatchHandle) -> ClientDb {
        ClientDb {
            session_id_counter: 0,
            tx,
            match_handle,
        }
    }

    pub fn new_client(&mut self, socket: TcpStream, addr: SocketAddr) {
        let session_id = self.session_id_counter;
        spawn_client_process(socket, addr, session_id, self.tx.clone(), self.match_handle.clone());
        self.session_id_counter = self.session_id_counter.wrapping_add(1);
        info!("accepted client: {session_id} {addr}");
    }
}

pub fn spawn_client_process(socket: TcpStream, addr: SocketAddr, session_id: u16, tx: broadcast::Sender<BroadcastMsg>, match_handle: MatchHandle) {
    tokio::spawn(async move {
        if let Err(e) = client_process(socket, session_id, &tx, &match_handle).await {
            warn!("dropping client {session_id} {addr}: {e:#}");
        }
        info!("client disconnected: {session_id} {addr}");
        announce(&tx, Address::Other(session_id), ServerClientMsg::ClientDisconnected(session_id));
    });
}

async fn client_process(mut socket: TcpStream, session_id: u16, tx: &broadcast::Sender<BroadcastMsg>, match_handle: &MatchHandle) -> anyhow::Result<()> {
    let mut static_buffer = [0; 1024];
    let mut input_buffer = Vec::new();
    let mut client_type = ClientType::default();

    // The hello comes through the channel too. Everything queued ahead of it
    // is already part of its snapshot.
    let mut rx = tx.subscribe();
    let mut greeted = false;
    match_handle.join(session_id).await?;
    announce(tx, Address::Other(session_id), ServerClientMsg::ClientConnected(session_id));

    loop {
        tokio::select! {
            biased;
            result = rx.recv() => {
                match result {
                    Ok(BroadcastMsg::Send(address, output_buffer)) => {
                        if !greeted {
                            if address != Address::Client(session_id) {
                                continue;
                            }
                            greeted = true;
                        }
                        if address.includes(session_id) {
                            socket.write_all(&output_buffer).await?;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("client {session_id} missed {skipped} broadcasts, resending snapshot");
                        greeted = false;
                        match_handle.join(session_id).await?;
                    }
                    Err(RecvError::Closed) => return Ok(()),
                }
            }
            result = socket.read(&mut static_buffer) => {
                let len = result?;
                if len == 0 {
                    debug!("client {session_id} closed its socket");
                    return Ok(());
                }
                input_buffer.extend(&static_buffer[..len]);

                while let Some((end, msg)) = ClientServerMsg::dequeue_and_decode(&input_buffer)? {
                    input_buffer.drain(..end);
                    match msg {
                        ClientServerMsg::Disconnect => return Ok(()),
                        ClientServerMsg::SetClientType (new_type) => {
                            info!("client {session_id} is now {new_type:?}");
                            client_type = new_type;
                        }
                        ClientServerMsg::GoalEntered (team) => {
                            if client_type == ClientType::Table {
                                match_handle.goal(team).await?;
                            }
                            else {
                                warn!("rejecting {team} goal from non-table client {session_id}");
                            }
                        }
                    }
                }
            }
        }
    }
}

fn announce(tx: &broadcast::Sender<BroadcastMsg>, address: Address, msg: ServerClientMsg) {
    let mut output_buffer = Vec::new();
    if let Err(e) = msg.pack(&mut output_buffer) {
        error!("error while packing {msg:?}: {e}");
        return;
    }
    if tx.send(BroadcastMsg::Send(address, output_buffer)).is_err() {
        debug!("nobody to tell about {msg:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroU32, time::Duration};

    use msgs::{score_msg::ScoreEvent, team::Team};
    use scoring::MatchConfig;
    use tokio::net::TcpListener;

    use super::*;
    use crate::match_process::spawn_match_process;

    async fn start_server() -> SocketAddr {
        start_server_with(MatchConfig::default()).await
    }

    async fn start_server_with(config: MatchConfig) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let local_addr = listener.local_addr().unwrap();
        let (tx, _) = broadcast::channel(100);
        let match_handle = spawn_match_process(config, tx.clone());
        let mut client_db = ClientDb::new(tx, match_handle);
        tokio::spawn(async move {
            loop {
                let (socket, addr) = listener.accept().await.unwrap();
                client_db.new_client(socket, addr);
            }
        });
        local_addr
    }

    async fn send(stream: &mut TcpStream, msg: ClientServerMsg) {
        let mut bytes = Vec::new();
        msg.pack(&mut bytes).unwrap();
        stream.write_all(&bytes).await.unwrap();
    }

    async fn recv(stream: &mut TcpStream, input_buffer: &mut Vec<u8>) -> ServerClientMsg {
        let mut static_buffer = [0; 1024];
        loop {
            if let Some((end, msg)) = ServerClientMsg::dequeue_and_decode(input_buffer).unwrap() {
                input_buffer.drain(..end);
                return msg;
            }
            let len = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut static_buffer)).await.unwrap().unwrap();
            assert!(len > 0, "server closed the connection");
            input_buffer.extend(&static_buffer[..len]);
        }
    }

    async fn recv_score_board(stream: &mut TcpStream, input_buffer: &mut Vec<u8>) -> (u32, u32) {
        loop {
            if let ServerClientMsg::Score(broadcast) = recv(stream, input_buffer).await {
                if let ScoreEvent::UpdateScoreBoard { blue, red } = broadcast.event {
                    return (blue, red);
                }
            }
        }
    }

    #[tokio::test]
    async fn only_table_goals_count() {
        let addr = start_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let mut input_buffer = Vec::new();

        let ServerClientMsg::Hello { snapshot, .. } = recv(&mut stream, &mut input_buffer).await else { panic!("expected hello") };
        assert_eq!((snapshot.blue, snapshot.red), (0, 0));

        send(&mut stream, ClientServerMsg::GoalEntered(Team::Red)).await;
        send(&mut stream, ClientServerMsg::SetClientType(ClientType::Table)).await;
        send(&mut stream, ClientServerMsg::GoalEntered(Team::Blue)).await;

        assert_eq!(recv_score_board(&mut stream, &mut input_buffer).await, (1, 0));
    }

    #[tokio::test]
    async fn late_joiner_gets_current_score() {
        let addr = start_server().await;
        let mut table = TcpStream::connect(addr).await.unwrap();
        let mut table_buffer = Vec::new();
        recv(&mut table, &mut table_buffer).await;

        send(&mut table, ClientServerMsg::SetClientType(ClientType::Table)).await;
        send(&mut table, ClientServerMsg::GoalEntered(Team::Red)).await;
        assert_eq!(recv_score_board(&mut table, &mut table_buffer).await, (0, 1));

        let mut spectator = TcpStream::connect(addr).await.unwrap();
        let mut spectator_buffer = Vec::new();
        let ServerClientMsg::Hello { session_id, snapshot } = recv(&mut spectator, &mut spectator_buffer).await else { panic!("expected hello") };
        assert_eq!(session_id, 1);
        assert_eq!((snapshot.blue, snapshot.red), (0, 1));

        loop {
            if let ServerClientMsg::ClientConnected(id) = recv(&mut table, &mut table_buffer).await {
                assert_eq!(id, 1);
                break;
            }
        }

        send(&mut table, ClientServerMsg::GoalEntered(Team::Blue)).await;
        assert_eq!(recv_score_board(&mut spectator, &mut spectator_buffer).await, (1, 1));
    }

    #[tokio::test]
    async fn joining_mid_rally_never_rewinds_the_score() {
        let addr = start_server_with(MatchConfig::with_goals_target(NonZeroU32::new(100).unwrap())).await;
        let mut table = TcpStream::connect(addr).await.unwrap();
        let mut table_buffer = Vec::new();
        recv(&mut table, &mut table_buffer).await;
        send(&mut table, ClientServerMsg::SetClientType(ClientType::Table)).await;

        for _ in 0..20 {
            send(&mut table, ClientServerMsg::GoalEntered(Team::Red)).await;
        }
        let mut spectator = TcpStream::connect(addr).await.unwrap();
        let mut spectator_buffer = Vec::new();
        for _ in 0..20 {
            send(&mut table, ClientServerMsg::GoalEntered(Team::Red)).await;
        }

        let ServerClientMsg::Hello { snapshot, .. } = recv(&mut spectator, &mut spectator_buffer).await else { panic!("expected hello first") };
        let mut red = snapshot.red;
        let mut horns = 0;
        while red < 40 {
            let ServerClientMsg::Score(broadcast) = recv(&mut spectator, &mut spectator_buffer).await else { continue };
            match broadcast.event {
                ScoreEvent::UpdateScoreBoard { red: update, .. } => {
                    assert!(update > red, "score went from {red} to {update}");
                    red = update;
                }
                ScoreEvent::PlayScoreSound => horns += 1,
                _ => {}
            }
        }
        assert_eq!(horns, 40 - snapshot.red);
    }
}
