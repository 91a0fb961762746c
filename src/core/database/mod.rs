// src/core/database/mod.rs

//! The in-memory keyspace and the context commands execute in.

mod context;
mod core;

pub use context::ExecutionContext;
pub use core::Db;
