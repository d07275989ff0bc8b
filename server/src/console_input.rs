use std::io::stdin;
use std::thread;

use msgs::team::Team;
use tracing::{debug, error};

use crate::match_process::MatchHandle;

/// Operator console. Stands in for the goal triggers and the restart
/// button that only the host gets to see.
pub fn console_input_thread(match_handle: MatchHandle) {
    thread::spawn(move || {
        pollster::block_on(console_input_loop(match_handle))
    });
}

pub async fn console_input_loop(match_handle: MatchHandle) {
    loop {
        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) => {
                debug!("stdin closed, console input stopped");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                error!("error while reading console input: {e}");
                return;
            }
        }
        match process_console_input(input.trim(), &match_handle).await {
            Ok(_) => {}
            Err(e) => println!("error: {e}")
        }
    }
}

pub async fn process_console_input(input: &str, match_handle: &MatchHandle) -> anyhow::Result<()> {
    match input {
        "blue" => match_handle.goal(Team::Blue).await?,
        "red" => match_handle.goal(Team::Red).await?,
        "reset" | "restart" => match_handle.reset().await?,
        "status" => {
            let snapshot = match_handle.snapshot().await?;
            let json = serde_json::to_string_pretty(&snapshot)?;
            println!("{json}");
        }
        "" => {}
        _ => println!("input not recognized, expected one of: blue, red, reset, status"),
    }
    Ok(())
}
