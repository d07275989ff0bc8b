use std::io::Write;

use anyhow::bail;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::{dequeue::{dequeue_msg, write_frame}, score_msg::{MatchSnapshot, ScoreBroadcast}};

#[derive(Debug, Clone, PartialEq)]
pub enum ServerClientMsg {
    Hello {
        session_id: u16,
        snapshot: MatchSnapshot,
    },
    ClientConnected (u16),
    ClientDisconnected (u16),
    Score (ScoreBroadcast),
}

impl ServerClientMsg {
    pub fn dequeue_and_decode(input_buffer: &[u8]) -> anyhow::Result<Option<(usize, ServerClientMsg)>> {
        let Some((begin, end)) = dequeue_msg(input_buffer)? else { return Ok(None) };
        let msg = Self::decode(&input_buffer[begin..end])?;
        Ok(Some((end, msg)))
    }

    pub fn decode(input_buffer: &[u8]) -> anyhow::Result<ServerClientMsg> {
        let mut rdr = input_buffer;
        let msg_type_index = rdr.read_u32::<LittleEndian>()?;

        let msg = match msg_type_index {
            0 => {
                let session_id = rdr.read_u16::<LittleEndian>()?;
                let snapshot = MatchSnapshot::decode(&mut rdr)?;
                ServerClientMsg::Hello {
                    session_id,
                    snapshot,
                }
            }
            1 => {
                let session_id = rdr.read_u16::<LittleEndian>()?;
                ServerClientMsg::ClientConnected (session_id)
            }
            2 => {
                let session_id = rdr.read_u16::<LittleEndian>()?;
                ServerClientMsg::ClientDisconnected (session_id)
            }
            3 => {
                let broadcast = ScoreBroadcast::decode(&mut rdr)?;
                ServerClientMsg::Score (broadcast)
            }
            type_index => {
                bail!("unsupported msg type: {type_index}");
            }
        };

        Ok(msg)
    }

    pub fn pack(&self, wtr: &mut impl Write) -> std::io::Result<()> {
        let mut body = Vec::with_capacity(32);
        match self {
            ServerClientMsg::Hello { session_id, snapshot } => {
                body.write_u32::<LittleEndian>(0)?;
                body.write_u16::<LittleEndian>(*session_id)?;
                snapshot.pack(&mut body)?;
            }
            ServerClientMsg::ClientConnected (id) => {
                body.write_u32::<LittleEndian>(1)?;
                body.write_u16::<LittleEndian>(*id)?;
            }
            ServerClientMsg::ClientDisconnected (id) => {
                body.write_u32::<LittleEndian>(2)?;
                body.write_u16::<LittleEndian>(*id)?;
            }
            ServerClientMsg::Score (broadcast) => {
                body.write_u32::<LittleEndian>(3)?;
                broadcast.pack(&mut body)?;
            }
        }
        write_frame(wtr, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score_msg::ScoreEvent;

    #[test]
    fn hello_carries_snapshot_of_finished_match() {
        let msg = ServerClientMsg::Hello {
            session_id: 7,
            snapshot: MatchSnapshot {
                round: 2,
                blue: 5,
                red: 3,
                is_over: true,
                winner_message: "Player Blue IS THE WINNER !!!".into(),
            },
        };
        let mut bytes = Vec::new();
        msg.pack(&mut bytes).unwrap();

        let (end, decoded) = ServerClientMsg::dequeue_and_decode(&bytes).unwrap().unwrap();
        assert_eq!(end, bytes.len());
        assert_eq!(decoded, msg);
    }

    #[test]
    fn back_to_back_score_frames() {
        let mut bytes = Vec::new();
        let first = ServerClientMsg::Score(ScoreBroadcast { round: 0, event: ScoreEvent::PlayScoreSound });
        let second = ServerClientMsg::Score(ScoreBroadcast { round: 0, event: ScoreEvent::UpdateScoreBoard { blue: 1, red: 0 } });
        first.pack(&mut bytes).unwrap();
        second.pack(&mut bytes).unwrap();

        let (end, decoded) = ServerClientMsg::dequeue_and_decode(&bytes).unwrap().unwrap();
        assert_eq!(decoded, first);
        let (_, decoded) = ServerClientMsg::dequeue_and_decode(&bytes[end..]).unwrap().unwrap();
        assert_eq!(decoded, second);
    }

    #[test]
    fn truncated_hello_is_an_error() {
        let mut body = Vec::new();
        body.write_u32::<LittleEndian>(0).unwrap();
        body.write_u16::<LittleEndian>(1).unwrap();
        assert!(ServerClientMsg::decode(&body).is_err());
    }
}
