use anyhow::bail;
use msgs::team::Team;

#[derive(Debug, PartialEq)]
pub enum ConsoleCmd {
    Goal (Team),
    Reset,
    Status,
    Quit,
}

impl ConsoleCmd {
    pub fn parse(input: &str) -> anyhow::Result<ConsoleCmd> {
        let (message_type, rem) = match input.find(' ') {
            Some(i) => (&input[..i], input[i+1..].trim()),
            None => (input, ""),
        };

        match message_type {
            "goal" => {
                match rem {
                    "blue" => Ok(ConsoleCmd::Goal(Team::Blue)),
                    "red" => Ok(ConsoleCmd::Goal(Team::Red)),
                    _ => bail!("unknown team: {rem:?}"),
                }
            }
            "blue" => Ok(ConsoleCmd::Goal(Team::Blue)),
            "red" => Ok(ConsoleCmd::Goal(Team::Red)),
            "reset" | "restart" => Ok(ConsoleCmd::Reset),
            "status" => Ok(ConsoleCmd::Status),
            "quit" | "exit" => Ok(ConsoleCmd::Quit),
            _ => bail!("cmd not recognized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_goal_forms() {
        assert_eq!(ConsoleCmd::parse("goal red").unwrap(), ConsoleCmd::Goal(Team::Red));
        assert_eq!(ConsoleCmd::parse("goal   blue").unwrap(), ConsoleCmd::Goal(Team::Blue));
        assert_eq!(ConsoleCmd::parse("blue").unwrap(), ConsoleCmd::Goal(Team::Blue));
        assert!(ConsoleCmd::parse("goal green").is_err());
    }

    #[test]
    fn parses_the_rest() {
        assert_eq!(ConsoleCmd::parse("restart").unwrap(), ConsoleCmd::Reset);
        assert_eq!(ConsoleCmd::parse("status").unwrap(), ConsoleCmd::Status);
        assert_eq!(ConsoleCmd::parse("quit").unwrap(), ConsoleCmd::Quit);
        assert!(ConsoleCmd::parse("dance").is_err());
    }
}
