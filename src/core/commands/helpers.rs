// src/core/commands/helpers.rs

//! Provides helper functions for parsing command arguments from `RespFrame`s.
//! These helpers reduce boilerplate and ensure consistent error handling across commands.

use crate::core::KeyGateError;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// A helper struct to parse command arguments sequentially.
/// This simplifies parsing optional flags.
pub struct ArgParser<'a> {
    args: &'a [RespFrame],
    cursor: usize,
}

impl<'a> ArgParser<'a> {
    /// Creates a new parser over a slice of arguments.
    pub fn new(args: &'a [RespFrame]) -> Self {
        Self { args, cursor: 0 }
    }

    /// Checks if the next argument matches a specific flag (case-insensitively).
    /// If it matches, consumes the argument and returns true.
    pub fn match_flag(&mut self, flag_name: &str) -> bool {
        if let Some(arg_str) = self.peek_str()
            && arg_str.eq_ignore_ascii_case(flag_name)
        {
            self.cursor += 1;
            return true;
        }
        false
    }

    /// Returns the remaining arguments that have not been consumed.
    pub fn remaining_args(&self) -> &'a [RespFrame] {
        &self.args[self.cursor..]
    }

    /// Peeks at the next argument as a string without consuming it.
    fn peek_str(&self) -> Option<String> {
        self.args
            .get(self.cursor)
            .and_then(|frame| extract_string(frame).ok())
    }
}

/// Extracts a `String` from a `RespFrame::BulkString`.
/// Returns a `WrongType` error if the frame is not a BulkString or not valid UTF-8.
pub fn extract_string(frame: &RespFrame) -> Result<String, KeyGateError> {
    if let RespFrame::BulkString(bs) = frame {
        String::from_utf8(bs.to_vec()).map_err(|_| KeyGateError::WrongType)
    } else {
        Err(KeyGateError::WrongType)
    }
}

/// Extracts `Bytes` from a `RespFrame::BulkString`.
/// Returns a `WrongType` error if the frame is not a BulkString.
pub fn extract_bytes(frame: &RespFrame) -> Result<Bytes, KeyGateError> {
    match frame {
        RespFrame::BulkString(bs) => Ok(bs.clone()),
        _ => Err(KeyGateError::WrongType),
    }
}

/// Validates that the number of arguments matches an exact expected count.
pub fn validate_arg_count(
    args: &[RespFrame],
    expected: usize,
    cmd: &str,
) -> Result<(), KeyGateError> {
    if args.len() != expected {
        Err(KeyGateError::WrongArgumentCount(cmd.to_string()))
    } else {
        Ok(())
    }
}

/// Parses arguments for commands that follow the pattern `COMMAND key1 [key2 ...]`.
pub fn parse_keys(args: &[RespFrame], cmd: &str) -> Result<Vec<Bytes>, KeyGateError> {
    if args.is_empty() {
        return Err(KeyGateError::WrongArgumentCount(cmd.to_string()));
    }
    args.iter().map(extract_bytes).collect()
}
