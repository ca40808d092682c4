//! Command handlers for the `shotlist` binary.

pub mod columns;
pub mod config;
pub mod export;
pub mod interactive;
pub mod plan;
pub mod progress;
pub mod setup;
pub mod types;
