#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod leveling;
pub mod logging;
pub mod recipe;
pub mod store;
