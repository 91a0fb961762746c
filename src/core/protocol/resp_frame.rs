// src/core/protocol/resp_frame.rs

//! The RESP frame type and the `tokio_util` codec that moves it over the wire.
//! Besides regular RESP arrays the decoder accepts inline commands
//! (`PING\r\n`), as typed into a telnet session.

use crate::core::KeyGateError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

const CRLF: &[u8] = b"\r\n";

// Protocol-level limits.
const MAX_ARRAY_LEN: i64 = 1024 * 1024;
const MAX_BULK_LEN: i64 = 512 * 1024 * 1024;
const MAX_INLINE_LEN: usize = 64 * 1024;
const MAX_DEPTH: usize = 32;

/// A single frame in the RESP protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum RespFrame {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Bytes),
    Null,
    NullArray,
    Array(Vec<RespFrame>),
}

impl RespFrame {
    /// Builds the array-of-bulk-strings frame a client sends for a command.
    pub fn command<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        RespFrame::Array(
            parts
                .into_iter()
                .map(|p| RespFrame::BulkString(Bytes::copy_from_slice(p.as_ref())))
                .collect(),
        )
    }

    /// Encodes the frame into a standalone byte vector.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, KeyGateError> {
        let mut buf = BytesMut::new();
        RespFrameCodec.encode(self.clone(), &mut buf)?;
        Ok(buf.to_vec())
    }
}

/// A `tokio_util::codec` implementation for `RespFrame`s.
#[derive(Debug, Default, Clone, Copy)]
pub struct RespFrameCodec;

impl Encoder<RespFrame> for RespFrameCodec {
    type Error = KeyGateError;

    fn encode(&mut self, item: RespFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write_frame(&item, dst);
        Ok(())
    }
}

fn write_frame(frame: &RespFrame, dst: &mut BytesMut) {
    match frame {
        RespFrame::SimpleString(s) => write_line(dst, b'+', s.as_bytes()),
        // Error and simple-string lines cannot carry CR or LF.
        RespFrame::Error(s) => write_line(dst, b'-', s.replace(['\r', '\n'], " ").as_bytes()),
        RespFrame::Integer(i) => write_line(dst, b':', i.to_string().as_bytes()),
        RespFrame::BulkString(b) => {
            write_line(dst, b'$', b.len().to_string().as_bytes());
            dst.reserve(b.len() + CRLF.len());
            dst.put_slice(b);
            dst.put_slice(CRLF);
        }
        RespFrame::Null => dst.put_slice(b"$-1\r\n"),
        RespFrame::NullArray => dst.put_slice(b"*-1\r\n"),
        RespFrame::Array(items) => {
            write_line(dst, b'*', items.len().to_string().as_bytes());
            for item in items {
                write_frame(item, dst);
            }
        }
    }
}

fn write_line(dst: &mut BytesMut, prefix: u8, body: &[u8]) {
    dst.reserve(1 + body.len() + CRLF.len());
    dst.put_u8(prefix);
    dst.put_slice(body);
    dst.put_slice(CRLF);
}

impl Decoder for RespFrameCodec {
    type Item = RespFrame;
    type Error = KeyGateError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let mut cursor: &[u8] = &src[..];
        let parsed = if is_type_byte(src[0]) {
            parse_frame(&mut cursor, 0)
        } else {
            parse_inline(&mut cursor)
        };
        match parsed {
            Ok(frame) => {
                let consumed = src.len() - cursor.len();
                src.advance(consumed);
                Ok(Some(frame))
            }
            Err(KeyGateError::IncompleteData) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn is_type_byte(b: u8) -> bool {
    matches!(b, b'+' | b'-' | b':' | b'$' | b'*')
}

fn parse_frame(cursor: &mut &[u8], depth: usize) -> Result<RespFrame, KeyGateError> {
    if depth > MAX_DEPTH {
        return Err(KeyGateError::InvalidRequest(
            "RESP nesting too deep".to_string(),
        ));
    }
    let (&type_byte, rest) = cursor.split_first().ok_or(KeyGateError::IncompleteData)?;
    *cursor = rest;
    match type_byte {
        b'+' => Ok(RespFrame::SimpleString(lossy(read_line(cursor)?))),
        b'-' => Ok(RespFrame::Error(lossy(read_line(cursor)?))),
        b':' => Ok(RespFrame::Integer(read_decimal(cursor)?)),
        b'$' => {
            let len = read_decimal(cursor)?;
            if len == -1 {
                return Ok(RespFrame::Null);
            }
            if !(0..=MAX_BULK_LEN).contains(&len) {
                return Err(KeyGateError::InvalidRequest(format!(
                    "invalid bulk length {len}"
                )));
            }
            let len = len as usize;
            if cursor.len() < len + CRLF.len() {
                return Err(KeyGateError::IncompleteData);
            }
            if &cursor[len..len + CRLF.len()] != CRLF {
                return Err(KeyGateError::SyntaxError);
            }
            let data = Bytes::copy_from_slice(&cursor[..len]);
            *cursor = &cursor[len + CRLF.len()..];
            Ok(RespFrame::BulkString(data))
        }
        b'*' => {
            let len = read_decimal(cursor)?;
            if len == -1 {
                return Ok(RespFrame::NullArray);
            }
            if !(0..=MAX_ARRAY_LEN).contains(&len) {
                return Err(KeyGateError::InvalidRequest(format!(
                    "invalid multibulk length {len}"
                )));
            }
            let mut items = Vec::with_capacity((len as usize).min(1024));
            for _ in 0..len {
                items.push(parse_frame(cursor, depth + 1)?);
            }
            Ok(RespFrame::Array(items))
        }
        _ => Err(KeyGateError::SyntaxError),
    }
}

/// Parses an inline command: whitespace-separated words terminated by a newline.
fn parse_inline(cursor: &mut &[u8]) -> Result<RespFrame, KeyGateError> {
    let Some(newline) = cursor.iter().position(|&b| b == b'\n') else {
        if cursor.len() > MAX_INLINE_LEN {
            return Err(KeyGateError::InvalidRequest(
                "inline request too long".to_string(),
            ));
        }
        return Err(KeyGateError::IncompleteData);
    };
    let line = &cursor[..newline];
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let words = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| RespFrame::BulkString(Bytes::copy_from_slice(w)))
        .collect();
    *cursor = &cursor[newline + 1..];
    Ok(RespFrame::Array(words))
}

fn read_line<'a>(cursor: &mut &'a [u8]) -> Result<&'a [u8], KeyGateError> {
    let pos = cursor
        .windows(CRLF.len())
        .position(|w| w == CRLF)
        .ok_or(KeyGateError::IncompleteData)?;
    let line = &cursor[..pos];
    *cursor = &cursor[pos + CRLF.len()..];
    Ok(line)
}

fn read_decimal(cursor: &mut &[u8]) -> Result<i64, KeyGateError> {
    let line = read_line(cursor)?;
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or(KeyGateError::SyntaxError)
}

fn lossy(line: &[u8]) -> String {
    String::from_utf8_lossy(line).into_owned()
}
