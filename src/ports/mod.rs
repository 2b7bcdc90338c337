//! Collaborator interfaces: price history, configuration, report output.

pub mod config_port;
pub mod data_port;
pub mod report_port;
