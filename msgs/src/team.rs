use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub fn from_u32(index: u32) -> Option<Team> {
        match index {
            0 => Some(Team::Blue),
            1 => Some(Team::Red),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            Team::Blue => 0,
            Team::Red => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Team::Blue => "Blue",
            Team::Red => "Red",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
