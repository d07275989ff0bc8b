/// Which connected sessions a fanned-out frame is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    Client (u16),
    All,
    Other (u16),
}

impl Address {
    pub fn includes(self, session_id: u16) -> bool {
        match self {
            Address::Client (addressed) => session_id == addressed,
            Address::All => true,
            Address::Other (sender) => session_id != sender,
        }
    }
}

/// Already packed frame plus its audience.
#[derive(Debug, Clone)]
pub enum BroadcastMsg {
    Send (Address, Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_excludes_only_the_sender() {
        assert!(!Address::Other(3).includes(3));
        assert!(Address::Other(3).includes(4));
        assert!(Address::All.includes(3));
        assert!(Address::Client(3).includes(3));
        assert!(!Address::Client(3).includes(4));
    }
}
