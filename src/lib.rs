//! orgchart: departments and employees as an arena-backed tree
//!
//! Layers:
//! - `domain`: chart engine and the flat text format (no I/O)
//! - `application`: chart persistence service
//! - `infrastructure`: filesystem boundary and service container
//! - `cli`: argument parsing, command dispatch, interactive menu

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
