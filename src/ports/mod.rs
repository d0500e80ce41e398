//! Port traits consumed by the domain and the CLI.

pub mod config_port;
pub mod data_port;
pub mod report_port;
