//! The four frame kinds described in spec §6: CONNECT, CONNECT_ACK,
//! DISCONNECT, PLAY, BOARD. All multi-byte integers are four-byte
//! native-endian `i32`; the opcode is always a single byte.

use std::io::{Read, Write};

use crate::error::WireError;
use crate::framed_io::{read_full, write_full};
use crate::limits::MAX_PIPE_PATH_LENGTH;

pub const OP_CONNECT: u8 = 1;
pub const OP_CONNECT_ACK: u8 = 1;
pub const OP_DISCONNECT: u8 = 2;
pub const OP_PLAY: u8 = 3;
pub const OP_BOARD: u8 = 4;

/// One pending client connection, carried over the rendezvous channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub req_path: String,
    pub notif_path: String,
}

/// Read one opcode byte. Does not interpret it — callers dispatch on the
/// value, per spec §4.2's "unknown values are logged and skipped" rule.
pub fn read_opcode<R: Read>(reader: &mut R) -> Result<u8, WireError> {
    let mut byte = [0u8; 1];
    read_full(reader, &mut byte)?;
    Ok(byte[0])
}

pub fn write_opcode<W: Write>(writer: &mut W, opcode: u8) -> Result<(), WireError> {
    write_full(writer, &[opcode])
}

fn write_fixed_path<W: Write>(writer: &mut W, path: &str) -> Result<(), WireError> {
    if path.len() + 1 > MAX_PIPE_PATH_LENGTH {
        return Err(WireError::PathTooLong);
    }
    let mut slot = [0u8; MAX_PIPE_PATH_LENGTH];
    slot[..path.len()].copy_from_slice(path.as_bytes());
    write_full(writer, &slot)
}

fn read_fixed_path<R: Read>(reader: &mut R) -> Result<String, WireError> {
    let mut slot = [0u8; MAX_PIPE_PATH_LENGTH];
    read_full(reader, &mut slot)?;
    let nul = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    Ok(String::from_utf8_lossy(&slot[..nul]).into_owned())
}

/// Write a full CONNECT frame (opcode + both paths) to the rendezvous stream.
pub fn write_connect<W: Write>(writer: &mut W, req: &ConnectRequest) -> Result<(), WireError> {
    write_opcode(writer, OP_CONNECT)?;
    write_fixed_path(writer, &req.req_path)?;
    write_fixed_path(writer, &req.notif_path)?;
    Ok(())
}

/// Decode a CONNECT frame's payload (the opcode has already been consumed
/// by the caller to decide this is a CONNECT frame).
pub fn read_connect_payload<R: Read>(reader: &mut R) -> Result<ConnectRequest, WireError> {
    let req_path = read_fixed_path(reader)?;
    let notif_path = read_fixed_path(reader)?;
    Ok(ConnectRequest {
        req_path,
        notif_path,
    })
}

/// Write a CONNECT_ACK frame: opcode + one status byte (0 = ok).
pub fn write_connect_ack<W: Write>(writer: &mut W, status: u8) -> Result<(), WireError> {
    write_opcode(writer, OP_CONNECT_ACK)?;
    write_full(writer, &[status])
}

pub fn read_connect_ack_payload<R: Read>(reader: &mut R) -> Result<u8, WireError> {
    let mut status = [0u8; 1];
    read_full(reader, &mut status)?;
    Ok(status[0])
}

/// Write a bare DISCONNECT frame.
pub fn write_disconnect<W: Write>(writer: &mut W) -> Result<(), WireError> {
    write_opcode(writer, OP_DISCONNECT)
}

/// Write a PLAY frame: opcode + one command byte.
pub fn write_play<W: Write>(writer: &mut W, command: u8) -> Result<(), WireError> {
    write_opcode(writer, OP_PLAY)?;
    write_full(writer, &[command])
}

pub fn read_play_payload<R: Read>(reader: &mut R) -> Result<u8, WireError> {
    let mut cmd = [0u8; 1];
    read_full(reader, &mut cmd)?;
    Ok(cmd[0])
}

/// A BOARD frame: one board+score+status snapshot (spec §6/§4.4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardFrame {
    pub width: i32,
    pub height: i32,
    pub tempo: i32,
    pub victory: bool,
    pub game_over: bool,
    pub points: i32,
    pub cells: Vec<u8>,
}

fn write_i32<W: Write>(writer: &mut W, v: i32) -> Result<(), WireError> {
    write_full(writer, &v.to_ne_bytes())
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32, WireError> {
    let mut buf = [0u8; 4];
    read_full(reader, &mut buf)?;
    Ok(i32::from_ne_bytes(buf))
}

/// Write a full BOARD frame (opcode + header fields + cell payload). The
/// six header fields are written one at a time, in this order, matching
/// the reference server's framing (see original_source/src/server/server.c).
pub fn write_board<W: Write>(writer: &mut W, frame: &BoardFrame) -> Result<(), WireError> {
    debug_assert_eq!(frame.cells.len(), (frame.width * frame.height) as usize);
    write_opcode(writer, OP_BOARD)?;
    write_i32(writer, frame.width)?;
    write_i32(writer, frame.height)?;
    write_i32(writer, frame.tempo)?;
    write_i32(writer, frame.victory as i32)?;
    write_i32(writer, frame.game_over as i32)?;
    write_i32(writer, frame.points)?;
    write_full(writer, &frame.cells)?;
    Ok(())
}

/// Decode a BOARD frame's payload (the opcode has already been consumed).
pub fn read_board_payload<R: Read>(reader: &mut R) -> Result<BoardFrame, WireError> {
    let width = read_i32(reader)?;
    let height = read_i32(reader)?;
    let tempo = read_i32(reader)?;
    let victory = read_i32(reader)? != 0;
    let game_over = read_i32(reader)? != 0;
    let points = read_i32(reader)?;
    let mut cells = vec![0u8; (width * height) as usize];
    read_full(reader, &mut cells)?;
    Ok(BoardFrame {
        width,
        height,
        tempo,
        victory,
        game_over,
        points,
        cells,
    })
}

/// The cell byte alphabet a BOARD frame's payload is restricted to.
pub const CELL_ALPHABET: &[u8] = b"#CM.@ ";
