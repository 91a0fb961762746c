// src/core/commands/string/mod.rs

pub mod get;
pub mod mget;
pub mod set;

pub use get::Get;
pub use mget::MGet;
pub use set::{Set, SetCondition};
