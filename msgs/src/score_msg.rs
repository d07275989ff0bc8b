use std::io::{Read, Write};

use anyhow::{bail, Context};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::position::Position;

/// One state change fanned out from the host to every participant. Each
/// event carries absolute state, so applying it twice or out of order with
/// its siblings converges to the same result.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreEvent {
    PlayScoreSound,
    SetIsOver (bool),
    SetGameOverMessage (Box<str>),
    UpdateScoreBoard {
        blue: u32,
        red: u32,
    },
    PlaceBall (Position),
}

/// A score event stamped with the match round it belongs to. The host bumps
/// the round on every reset; participants drop events from older rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBroadcast {
    pub round: u32,
    pub event: ScoreEvent,
}

/// Full match state handed to a participant when it joins.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct MatchSnapshot {
    pub round: u32,
    pub blue: u32,
    pub red: u32,
    pub is_over: bool,
    pub winner_message: Box<str>,
}

impl ScoreEvent {
    pub fn decode(rdr: &mut &[u8]) -> anyhow::Result<ScoreEvent> {
        let event_type_index = rdr.read_u32::<LittleEndian>()?;

        let event = match event_type_index {
            0 => ScoreEvent::PlayScoreSound,
            1 => ScoreEvent::SetIsOver (read_bool(rdr)?),
            2 => ScoreEvent::SetGameOverMessage (read_str(rdr)?),
            3 => {
                let blue = rdr.read_u32::<LittleEndian>()?;
                let red = rdr.read_u32::<LittleEndian>()?;
                ScoreEvent::UpdateScoreBoard { blue, red }
            }
            4 => ScoreEvent::PlaceBall (Position::decode(rdr)?),
            type_index => {
                bail!("unsupported score event type: {type_index}");
            }
        };

        Ok(event)
    }

    pub fn pack(&self, wtr: &mut impl Write) -> std::io::Result<()> {
        match self {
            ScoreEvent::PlayScoreSound => {
                wtr.write_u32::<LittleEndian>(0)?;
            }
            ScoreEvent::SetIsOver (is_over) => {
                wtr.write_u32::<LittleEndian>(1)?;
                write_bool(wtr, *is_over)?;
            }
            ScoreEvent::SetGameOverMessage (message) => {
                wtr.write_u32::<LittleEndian>(2)?;
                write_str(wtr, message)?;
            }
            ScoreEvent::UpdateScoreBoard { blue, red } => {
                wtr.write_u32::<LittleEndian>(3)?;
                wtr.write_u32::<LittleEndian>(*blue)?;
                wtr.write_u32::<LittleEndian>(*red)?;
            }
            ScoreEvent::PlaceBall (position) => {
                wtr.write_u32::<LittleEndian>(4)?;
                position.pack(wtr)?;
            }
        }
        Ok(())
    }
}

impl ScoreBroadcast {
    pub fn decode(rdr: &mut &[u8]) -> anyhow::Result<ScoreBroadcast> {
        let round = rdr.read_u32::<LittleEndian>()?;
        let event = ScoreEvent::decode(rdr)?;
        Ok(ScoreBroadcast { round, event })
    }

    pub fn pack(&self, wtr: &mut impl Write) -> std::io::Result<()> {
        wtr.write_u32::<LittleEndian>(self.round)?;
        self.event.pack(wtr)
    }
}

impl MatchSnapshot {
    pub fn decode(rdr: &mut &[u8]) -> anyhow::Result<MatchSnapshot> {
        let round = rdr.read_u32::<LittleEndian>()?;
        let blue = rdr.read_u32::<LittleEndian>()?;
        let red = rdr.read_u32::<LittleEndian>()?;
        let is_over = read_bool(rdr)?;
        let winner_message = read_str(rdr)?;
        Ok(MatchSnapshot { round, blue, red, is_over, winner_message })
    }

    pub fn pack(&self, wtr: &mut impl Write) -> std::io::Result<()> {
        wtr.write_u32::<LittleEndian>(self.round)?;
        wtr.write_u32::<LittleEndian>(self.blue)?;
        wtr.write_u32::<LittleEndian>(self.red)?;
        write_bool(wtr, self.is_over)?;
        write_str(wtr, &self.winner_message)
    }
}

fn read_bool(rdr: &mut &[u8]) -> anyhow::Result<bool> {
    let x = rdr.read_u8()?;
    Ok(x != 0)
}

fn write_bool(wtr: &mut impl Write, value: bool) -> std::io::Result<()> {
    wtr.write_u8(if value { 1 } else { 0 })
}

fn read_str(rdr: &mut &[u8]) -> anyhow::Result<Box<str>> {
    let len = rdr.read_u32::<LittleEndian>()? as usize;
    if rdr.len() < len {
        bail!("string length {len} exceeds remaining {} bytes", rdr.len());
    }
    let mut buf = vec![0u8; len];
    rdr.read_exact(&mut buf)?;
    let text = String::from_utf8(buf).context("string is not utf-8")?;
    Ok(text.into())
}

fn write_str(wtr: &mut impl Write, text: &str) -> std::io::Result<()> {
    wtr.write_u32::<LittleEndian>(text.len() as u32)?;
    wtr.write_all(text.as_bytes())
}
