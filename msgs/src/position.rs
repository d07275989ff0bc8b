use std::io::Write;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Local position of the puck inside the table's frame of reference.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32, z: f32) -> Position {
        Position { x, y, z }
    }

    pub fn decode(rdr: &mut &[u8]) -> anyhow::Result<Position> {
        let x = rdr.read_f32::<LittleEndian>()?;
        let y = rdr.read_f32::<LittleEndian>()?;
        let z = rdr.read_f32::<LittleEndian>()?;
        Ok(Position { x, y, z })
    }

    pub fn pack(&self, wtr: &mut impl Write) -> std::io::Result<()> {
        wtr.write_f32::<LittleEndian>(self.x)?;
        wtr.write_f32::<LittleEndian>(self.y)?;
        wtr.write_f32::<LittleEndian>(self.z)
    }
}
