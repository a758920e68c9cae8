//! careerctl - admin CLI for the careerd daemon.

pub mod cli;
pub mod client;
pub mod commands;
pub mod display;
