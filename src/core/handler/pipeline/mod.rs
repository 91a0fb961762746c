// src/core/handler/pipeline/mod.rs

//! Contains individual, reusable steps of the command processing pipeline.

pub mod acl_check;
