
/// What a connection is allowed to do. Only the table, which runs the puck
/// physics and owns the goal triggers, may report goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientType {
    #[default]
    Spectator,
    Table,
}

impl ClientType {
    pub fn from_u32(index: u32) -> Option<ClientType> {
        match index {
            0 => Some(ClientType::Spectator),
            1 => Some(ClientType::Table),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            ClientType::Spectator => 0,
            ClientType::Table => 1,
        }
    }
}
