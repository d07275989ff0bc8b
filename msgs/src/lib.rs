pub mod client_server_msg;
pub mod client_type;
pub mod dequeue;
pub mod position;
pub mod score_msg;
pub mod server_client_msg;
pub mod server_connection_process;
pub mod team;
