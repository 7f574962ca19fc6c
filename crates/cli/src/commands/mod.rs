//! CLI Commands

pub mod data;
pub mod results;
