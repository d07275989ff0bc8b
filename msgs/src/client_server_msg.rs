use std::io::Write;

use anyhow::{bail, Context};
use byteorder::{LittleEndian, WriteBytesExt, ReadBytesExt};

use crate::{client_type::ClientType, dequeue::{dequeue_msg, write_frame}, team::Team};

#[derive(Debug, Clone, PartialEq)]
pub enum ClientServerMsg {
    Disconnect,
    SetClientType (ClientType),
    GoalEntered (Team),
}

impl ClientServerMsg {
    pub fn dequeue_and_decode(input_buffer: &[u8]) -> anyhow::Result<Option<(usize, ClientServerMsg)>> {
        let Some((begin, end)) = dequeue_msg(input_buffer)? else { return Ok(None) };
        let msg = Self::decode(&input_buffer[begin..end])?;
        Ok(Some((end, msg)))
    }

    pub fn decode(input_buffer: &[u8]) -> anyhow::Result<ClientServerMsg> {
        let mut rdr = input_buffer;
        let msg_type_index = rdr.read_u32::<LittleEndian>()?;

        let msg = match msg_type_index {
            0 => {
                ClientServerMsg::Disconnect
            }
            1 => {
                let client_type_index = rdr.read_u32::<LittleEndian>()?;
                let client_type = ClientType::from_u32(client_type_index).context("unsupported client type")?;
                ClientServerMsg::SetClientType (client_type)
            }
            2 => {
                let team_index = rdr.read_u32::<LittleEndian>()?;
                let team = Team::from_u32(team_index).with_context(|| format!("unsupported team: {team_index}"))?;
                ClientServerMsg::GoalEntered (team)
            }
            type_index => {
                bail!("unsupported msg type: {type_index}");
            }
        };

        Ok(msg)
    }

    pub fn pack(&self, wtr: &mut impl Write) -> std::io::Result<()> {
        let mut body = Vec::with_capacity(8);
        match self {
            ClientServerMsg::Disconnect => {
                body.write_u32::<LittleEndian>(0)?;
            }
            ClientServerMsg::SetClientType(client_type) => {
                body.write_u32::<LittleEndian>(1)?;
                body.write_u32::<LittleEndian>(client_type.as_u32())?;
            }
            ClientServerMsg::GoalEntered(team) => {
                body.write_u32::<LittleEndian>(2)?;
                body.write_u32::<LittleEndian>(team.as_u32())?;
            }
        }
        write_frame(wtr, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_frames_as_they_stream_in() {
        let mut stream = Vec::new();
        ClientServerMsg::SetClientType(ClientType::Table).pack(&mut stream).unwrap();
        ClientServerMsg::GoalEntered(Team::Red).pack(&mut stream).unwrap();

        let mut input_buffer = Vec::new();
        let mut decoded = Vec::new();
        for byte in stream {
            input_buffer.push(byte);
            while let Some((end, msg)) = ClientServerMsg::dequeue_and_decode(&input_buffer).unwrap() {
                decoded.push(msg);
                input_buffer.drain(..end);
            }
        }

        assert!(input_buffer.is_empty());
        assert_eq!(decoded, vec![
            ClientServerMsg::SetClientType(ClientType::Table),
            ClientServerMsg::GoalEntered(Team::Red),
        ]);
    }

    #[test]
    fn unknown_team_is_rejected() {
        let mut body = Vec::new();
        body.write_u32::<LittleEndian>(2).unwrap();
        body.write_u32::<LittleEndian>(9).unwrap();
        let err = ClientServerMsg::decode(&body).unwrap_err();
        assert!(err.to_string().contains("unsupported team"));
    }
}
