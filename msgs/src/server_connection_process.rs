use std::time::Duration;

use tokio::{io::{AsyncReadExt, AsyncWriteExt}, net::TcpStream, sync::mpsc};
use tracing::{debug, error, info, warn};

use crate::{client_server_msg::ClientServerMsg, server_client_msg::ServerClientMsg};

pub const RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// Spawns the task that keeps a connection to the score server and pumps
/// frames both ways, reconnecting whenever the connection drops. Decoded
/// server messages are forwarded to `server_to_main`; the task stops once
/// main drops the returned sender or stops listening.
pub fn spawn_server_connection_process(addr: String, server_to_main: mpsc::Sender<ServerClientMsg>) -> mpsc::Sender<ClientServerMsg> {
    let (main_to_server, mut server_from_main) = mpsc::channel::<ClientServerMsg>(100);
    tokio::spawn(async move {
        let mut static_buffer = [0; 1024];
        let mut output_buffer = Vec::new();

        loop {
            let mut stream = match TcpStream::connect(&addr).await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("could not reach score server at {addr}: {e}, retrying");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            };
            info!("connected to score server at {addr}");
            let mut input_buffer = Vec::new();

            'connected: loop {
                tokio::select! {
                    result = stream.read(&mut static_buffer) => {
                        let len = match result {
                            Ok(len) => len,
                            Err(e) => {
                                error!("error while reading from socket: {e}, restarting connection");
                                break 'connected;
                            }
                        };
                        if len == 0 {
                            info!("server closed the connection");
                            break 'connected;
                        }
                        input_buffer.extend(&static_buffer[..len]);

                        loop {
                            let (end, msg) = match ServerClientMsg::dequeue_and_decode(&input_buffer) {
                                Ok(Some(decoded)) => decoded,
                                Ok(None) => break,
                                Err(e) => {
                                    error!("error while decoding msg from server: {e}, restarting connection");
                                    break 'connected;
                                }
                            };
                            input_buffer.drain(..end);
                            if server_to_main.send(msg).await.is_err() {
                                debug!("main loop gone, closing server connection");
                                return;
                            }
                        }
                    }
                    result = server_from_main.recv() => {
                        let Some(msg) = result else {
                            debug!("main loop dropped its sender, closing server connection");
                            return;
                        };

                        output_buffer.clear();
                        if let Err(e) = msg.pack(&mut output_buffer) {
                            error!("error while packing {msg:?}: {e}");
                            continue;
                        }
                        if let Err(e) = stream.write_all(&output_buffer).await {
                            error!("error while writing to server: {e}, restarting connection");
                            break 'connected;
                        }
                    }
                }
            }
            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    });
    main_to_server
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;
    use crate::{client_type::ClientType, score_msg::MatchSnapshot};

    async fn read_msg(stream: &mut TcpStream) -> ClientServerMsg {
        let mut input_buffer = Vec::new();
        let mut static_buffer = [0; 1024];
        loop {
            if let Some((_, msg)) = ClientServerMsg::dequeue_and_decode(&input_buffer).unwrap() {
                return msg;
            }
            let len = stream.read(&mut static_buffer).await.unwrap();
            assert!(len > 0, "client closed the connection");
            input_buffer.extend(&static_buffer[..len]);
        }
    }

    async fn write_msg(stream: &mut TcpStream, msg: ServerClientMsg) {
        let mut bytes = Vec::new();
        msg.pack(&mut bytes).unwrap();
        stream.write_all(&bytes).await.unwrap();
    }

    #[tokio::test]
    async fn reconnects_after_the_server_hangs_up() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (server_to_main, mut main_from_server) = mpsc::channel(100);
        let to_server = spawn_server_connection_process(addr, server_to_main);

        let (mut first, _) = listener.accept().await.unwrap();
        write_msg(&mut first, ServerClientMsg::Hello { session_id: 0, snapshot: MatchSnapshot::default() }).await;
        assert!(matches!(main_from_server.recv().await, Some(ServerClientMsg::Hello { session_id: 0, .. })));
        drop(first);

        let (mut second, _) = tokio::time::timeout(Duration::from_secs(5), listener.accept()).await.unwrap().unwrap();
        write_msg(&mut second, ServerClientMsg::Hello { session_id: 1, snapshot: MatchSnapshot::default() }).await;
        assert!(matches!(main_from_server.recv().await, Some(ServerClientMsg::Hello { session_id: 1, .. })));

        to_server.send(ClientServerMsg::SetClientType(ClientType::Table)).await.unwrap();
        assert_eq!(read_msg(&mut second).await, ClientServerMsg::SetClientType(ClientType::Table));
    }
}
