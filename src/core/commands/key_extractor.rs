// src/core/commands/key_extractor.rs

//! Key and channel extraction functions referenced by the command table.
//! Each receives the arguments that follow the command (or subcommand) name.

use crate::core::KeyGateError;
use crate::core::commands::helpers::extract_bytes;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// For commands that touch no keys or channels.
pub fn no_args(_args: &[RespFrame]) -> Result<Vec<Bytes>, KeyGateError> {
    Ok(vec![])
}

/// The first argument is the only key (or channel).
pub fn first_arg(args: &[RespFrame]) -> Result<Vec<Bytes>, KeyGateError> {
    extract_n_keys(args, 1)
}

/// Every argument is a key. Used for variadic key commands.
pub fn all_args(args: &[RespFrame]) -> Result<Vec<Bytes>, KeyGateError> {
    extract_n_keys(args, args.len())
}

/// Extracts a fixed number of keys starting from the first argument.
fn extract_n_keys(args: &[RespFrame], num_keys: usize) -> Result<Vec<Bytes>, KeyGateError> {
    if args.len() < num_keys {
        return Err(KeyGateError::SyntaxError);
    }
    args[..num_keys].iter().map(extract_bytes).collect()
}
