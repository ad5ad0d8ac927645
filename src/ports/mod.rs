//! Port trait definitions.

pub mod config_port;
pub mod data_port;
pub mod report_port;
