use std::net::{Ipv4Addr, SocketAddr, IpAddr};

use anyhow::Context;
use local_ip_address::local_ip;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{broadcast_msg::BroadcastMsg, client_db::ClientDb, config::ServerConfig, console_input::console_input_thread, match_process::spawn_match_process};

mod broadcast_msg;
mod client_db;
mod config;
mod console_input;
mod match_process;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();
    let port = config.port;

    let addr = SocketAddr::new(IpAddr::from(Ipv4Addr::UNSPECIFIED), port);
    let listener = TcpListener::bind(addr).await.with_context(|| format!("failed to bind port {port}"))?;

    match local_ip() {
        Ok(my_local_ip) => info!("Server Started at ip: {my_local_ip}:{port}"),
        Err(e) => warn!("Server Started on port {port}, local ip unknown: {e}"),
    }
    info!("first to {} goals wins", config.match_rules.goals_target);

    let (tx, _) = broadcast::channel::<BroadcastMsg>(100);
    let match_handle = spawn_match_process(config.match_rules, tx.clone());
    console_input_thread(match_handle.clone());

    let mut client_db = ClientDb::new(tx, match_handle);

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("error while accepting client: {e}");
                continue;
            }
        };
        client_db.new_client(socket, addr);
    }
}
