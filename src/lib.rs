//! Stat-block conversion toolkit: parse free-text monster stat blocks, convert them to a
//! profile's balanced targets, and score the result against the profile's tolerance bands.

pub mod cli;
pub mod config;
pub mod conversion;
pub mod data;
pub mod export;
pub mod parallel;
pub mod parser;
pub mod server;
