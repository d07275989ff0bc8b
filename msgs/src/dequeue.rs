use std::io::{Cursor, Write};

use anyhow::bail;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Upper bound on a single frame body. Score traffic is tiny, anything
/// larger is a broken or hostile peer.
pub const MAX_MSG_LEN: usize = 4096;

/// Returns the `(begin, end)` range of the first complete frame body in
/// `input_buffer`, or `None` while the frame is still incomplete.
pub fn dequeue_msg(input_buffer: &[u8]) -> anyhow::Result<Option<(usize, usize)>> {
    if input_buffer.len() < 4 {
        return Ok(None)
    }

    let mut rdr = Cursor::new(input_buffer);

    let msg_ln = rdr.read_u32::<LittleEndian>()? as usize;

    if msg_ln > MAX_MSG_LEN {
        bail!("message too long: {msg_ln}");
    }
    if msg_ln < 4 {
        bail!("message too short to carry a type: {msg_ln}");
    }

    let end = msg_ln + 4;

    if input_buffer.len() < end {
        return Ok(None)
    }

    Ok(Some((4, end)))
}

pub fn write_frame(wtr: &mut impl Write, body: &[u8]) -> std::io::Result<()> {
    wtr.write_u32::<LittleEndian>(body.len() as u32)?;
    wtr.write_all(body)
}
