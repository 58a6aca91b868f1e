//! CLI command implementations

pub mod check;
pub mod init;
pub mod lessons;
pub mod progress;
pub mod serve;
