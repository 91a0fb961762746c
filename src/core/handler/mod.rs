// src/core/handler/mod.rs

mod pipeline;

pub mod command_router;
