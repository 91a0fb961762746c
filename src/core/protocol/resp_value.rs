// src/core/protocol/resp_value.rs

//! Defines the value type returned by the command execution layer.

use super::RespFrame;
use bytes::Bytes;

/// The reply a command produces. Converted into a `RespFrame` right before
/// it is written to the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    BulkString(Bytes),
    Integer(i64),
    Array(Vec<RespValue>),
    Null,
    NullArray,
    Error(String),
}

impl RespValue {
    /// The `+OK` reply.
    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn bulk(value: impl Into<String>) -> Self {
        RespValue::BulkString(Bytes::from(value.into()))
    }

    /// An array of bulk strings.
    pub fn bulk_array<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RespValue::Array(values.into_iter().map(RespValue::bulk).collect())
    }
}

impl From<RespValue> for RespFrame {
    fn from(val: RespValue) -> Self {
        match val {
            RespValue::SimpleString(s) => RespFrame::SimpleString(s),
            RespValue::BulkString(b) => RespFrame::BulkString(b),
            RespValue::Integer(i) => RespFrame::Integer(i),
            RespValue::Array(arr) => RespFrame::Array(arr.into_iter().map(Into::into).collect()),
            RespValue::Null => RespFrame::Null,
            RespValue::NullArray => RespFrame::NullArray,
            RespValue::Error(s) => RespFrame::Error(s),
        }
    }
}

impl From<RespFrame> for RespValue {
    fn from(frame: RespFrame) -> Self {
        match frame {
            RespFrame::SimpleString(s) => RespValue::SimpleString(s),
            RespFrame::BulkString(b) => RespValue::BulkString(b),
            RespFrame::Integer(i) => RespValue::Integer(i),
            RespFrame::Array(arr) => RespValue::Array(arr.into_iter().map(Into::into).collect()),
            RespFrame::Null => RespValue::Null,
            RespFrame::NullArray => RespValue::NullArray,
            RespFrame::Error(s) => RespValue::Error(s),
        }
    }
}
